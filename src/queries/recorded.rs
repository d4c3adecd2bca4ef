use sea_query::{Alias, Asterisk, Expr, Func, Order, Query};

use crate::dialect::Dialect;
use crate::model::NewRecorded;
use crate::schema::{SchemaDescriptor, TableName};

/// Column reference using the name the engine stored it under
fn column(dialect: Dialect, name: &str) -> Alias {
    Alias::new(dialect.fold_identifier(name))
}

/// id, programId as "programId", ... on case-folding engines; bare names elsewhere
pub fn render_column_projection(dialect: Dialect, schema: &SchemaDescriptor) -> String {
    schema
        .columns()
        .iter()
        .map(|c| {
            if dialect.needs_alias(c.name) {
                format!("{} as {}", c.name, dialect.quote_identifier(c.name))
            } else {
                c.name.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// INSERT INTO recorded (programId, channelId, ...) VALUES (?, ?, ...)
pub fn insert(dialect: Dialect, program: &NewRecorded) -> String {
    let values = program.column_values();
    let statement = Query::insert()
        .into_table(TableName::Recorded)
        .columns(values.iter().map(|(name, _)| column(dialect, name)))
        .values_panic(values.into_iter().map(|(_, value)| value.into()))
        .to_owned();
    dialect.build(&statement)
}

/// DELETE FROM recorded WHERE id = ?
pub fn delete(dialect: Dialect, id: i32) -> String {
    let statement = Query::delete()
        .from_table(TableName::Recorded)
        .and_where(Expr::col(column(dialect, "id")).eq(id))
        .to_owned();
    dialect.build(&statement)
}

/// UPDATE recorded SET thumbnailPath = ? WHERE id = ?
pub fn add_thumbnail(dialect: Dialect, id: i32, thumbnail_path: &str) -> String {
    let statement = Query::update()
        .table(TableName::Recorded)
        .value(column(dialect, "thumbnailPath"), thumbnail_path)
        .and_where(Expr::col(column(dialect, "id")).eq(id))
        .to_owned();
    dialect.build(&statement)
}

/// UPDATE recorded SET recording = FALSE WHERE id = ?
pub fn remove_recording(dialect: Dialect, id: i32) -> String {
    let statement = Query::update()
        .table(TableName::Recorded)
        .value(column(dialect, "recording"), false)
        .and_where(Expr::col(column(dialect, "id")).eq(id))
        .to_owned();
    dialect.build(&statement)
}

/// UPDATE recorded SET ruleId = NULL WHERE ruleId = ?
pub fn delete_rule_id(dialect: Dialect, rule_id: i32) -> String {
    let statement = Query::update()
        .table(TableName::Recorded)
        .value(column(dialect, "ruleId"), Option::<i32>::None)
        .and_where(Expr::col(column(dialect, "ruleId")).eq(rule_id))
        .to_owned();
    dialect.build(&statement)
}

/// SELECT <projection> FROM recorded WHERE id = ?
pub fn find_id(dialect: Dialect, projection: &str, id: i32) -> String {
    let statement = Query::select()
        .expr(Expr::cust(projection.to_owned()))
        .from(TableName::Recorded)
        .and_where(Expr::col(column(dialect, "id")).eq(id))
        .to_owned();
    dialect.build(&statement)
}

/// SELECT <projection> FROM recorded ORDER BY startAt DESC, id DESC [LIMIT ? OFFSET ?]
///
/// The offset is only applied together with a limit.
pub fn find_all(dialect: Dialect, projection: &str, limit: Option<u64>, offset: u64) -> String {
    let mut statement = Query::select()
        .expr(Expr::cust(projection.to_owned()))
        .from(TableName::Recorded)
        .order_by(column(dialect, "startAt"), Order::Desc)
        .order_by(column(dialect, "id"), Order::Desc)
        .to_owned();
    if let Some(limit) = limit {
        statement.limit(limit).offset(offset);
    }
    dialect.build(&statement)
}

/// SELECT <projection> FROM recorded ORDER BY startAt ASC, id ASC LIMIT 1
pub fn find_old(dialect: Dialect, projection: &str) -> String {
    let statement = Query::select()
        .expr(Expr::cust(projection.to_owned()))
        .from(TableName::Recorded)
        .order_by(column(dialect, "startAt"), Order::Asc)
        .order_by(column(dialect, "id"), Order::Asc)
        .limit(1)
        .to_owned();
    dialect.build(&statement)
}

/// SELECT COUNT(*) AS count FROM recorded
pub fn count(dialect: Dialect) -> String {
    let statement = Query::select()
        .expr_as(Func::count(Expr::col(Asterisk)), Alias::new("count"))
        .from(TableName::Recorded)
        .to_owned();
    dialect.build(&statement)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::ALL_DIALECTS;
    use crate::schema::RECORDED_SCHEMA;

    const POSTGRES_PROJECTION: &str = "id, programId as \"programId\", channelId as \"channelId\", \
channelType as \"channelType\", startAt as \"startAt\", endAt as \"endAt\", duration, name, \
description, extended, genre1, genre2, videoType as \"videoType\", videoResolution as \"videoResolution\", \
videoStreamContent as \"videoStreamContent\", videoComponentType as \"videoComponentType\", \
audioSamplingRate as \"audioSamplingRate\", audioComponentType as \"audioComponentType\", \
recPath as \"recPath\", ruleId as \"ruleId\", thumbnailPath as \"thumbnailPath\", recording";

    /// Strip `x as "x"` back to the declared column name
    fn projected_names(projection: &str) -> Vec<String> {
        projection
            .split(", ")
            .map(|entry| entry.split(" as ").next().unwrap_or(entry).to_string())
            .collect()
    }

    #[test]
    fn test_postgres_projection_literal() {
        assert_eq!(
            render_column_projection(Dialect::Postgres, &RECORDED_SCHEMA),
            POSTGRES_PROJECTION
        );
    }

    #[test]
    fn test_case_preserving_dialects_alias_nothing() {
        for dialect in [Dialect::Mysql, Dialect::Sqlite] {
            let projection = render_column_projection(dialect, &RECORDED_SCHEMA);
            assert!(!projection.contains(" as "), "{}: {}", dialect, projection);
        }
    }

    #[test]
    fn test_postgres_aliases_exactly_mixed_case_columns() {
        let projection = render_column_projection(Dialect::Postgres, &RECORDED_SCHEMA);
        for (entry, column) in projection.split(", ").zip(RECORDED_SCHEMA.columns()) {
            let has_upper = column.name.chars().any(|c| c.is_ascii_uppercase());
            assert_eq!(entry.contains(" as "), has_upper, "{}", entry);
        }
    }

    #[test]
    fn test_projection_lists_each_column_once_in_order() {
        let declared: Vec<_> = RECORDED_SCHEMA.columns().iter().map(|c| c.name).collect();
        for dialect in ALL_DIALECTS {
            let projection = render_column_projection(dialect, &RECORDED_SCHEMA);
            assert_eq!(projected_names(&projection), declared, "{}", dialect);
        }
    }

    #[test]
    fn test_postgres_statements_use_folded_identifiers() {
        let sql = delete_rule_id(Dialect::Postgres, 4);
        assert_eq!(sql, r#"UPDATE "recorded" SET "ruleid" = NULL WHERE "ruleid" = 4"#);

        let sql = add_thumbnail(Dialect::Postgres, 2, "/thumb/2.jpg");
        assert_eq!(sql, r#"UPDATE "recorded" SET "thumbnailpath" = '/thumb/2.jpg' WHERE "id" = 2"#);
    }

    #[test]
    fn test_mysql_statements_keep_declared_identifiers() {
        let sql = delete(Dialect::Mysql, 9);
        assert_eq!(sql, "DELETE FROM `recorded` WHERE `id` = 9");

        let sql = remove_recording(Dialect::Mysql, 9);
        assert_eq!(sql, "UPDATE `recorded` SET `recording` = FALSE WHERE `id` = 9");
    }

    #[test]
    fn test_find_all_paging() {
        let projection = render_column_projection(Dialect::Sqlite, &RECORDED_SCHEMA);
        let sql = find_all(Dialect::Sqlite, &projection, Some(10), 20);
        assert!(sql.starts_with(&format!("SELECT {} FROM \"recorded\"", projection)));
        assert!(sql.ends_with(r#"ORDER BY "startAt" DESC, "id" DESC LIMIT 10 OFFSET 20"#));

        let sql = find_all(Dialect::Sqlite, &projection, None, 20);
        assert!(!sql.contains("LIMIT"));
        assert!(!sql.contains("OFFSET"));
    }

    #[test]
    fn test_count() {
        assert_eq!(count(Dialect::Sqlite), r#"SELECT COUNT(*) AS "count" FROM "recorded""#);
    }
}
