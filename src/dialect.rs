//! SQL dialect strategy
//!
//! Every engine difference the recorded table cares about lives in this module:
//! type tokens, auto-increment key syntax, identifier quoting and case folding.
//! Adding an engine means adding a variant and extending the tables below.

use clap::ValueEnum;
use sea_query::{MysqlQueryBuilder, PostgresQueryBuilder, QueryStatementWriter, SqliteQueryBuilder};
use serde::Deserialize;
use std::fmt;

use crate::queries::{ddl, recorded};
use crate::schema::{LogicalType, SchemaDescriptor};
use crate::store::StoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// PostgreSQL (folds unquoted identifiers to lower case)
    Postgres,
    /// MySQL / MariaDB
    Mysql,
    /// SQLite (dynamically typed)
    Sqlite,
}

pub const ALL_DIALECTS: [Dialect; 3] = [Dialect::Postgres, Dialect::Mysql, Dialect::Sqlite];

/// logical type x dialect -> native type token
const TYPE_TOKENS: &[(Dialect, LogicalType, &str)] = &[
    (Dialect::Postgres, LogicalType::Int32, "integer"),
    (Dialect::Postgres, LogicalType::Int64, "bigint"),
    (Dialect::Postgres, LogicalType::Text, "text"),
    (Dialect::Postgres, LogicalType::Bool, "boolean"),
    (Dialect::Postgres, LogicalType::Uuid, "uuid"),
    (Dialect::Mysql, LogicalType::Int32, "integer"),
    (Dialect::Mysql, LogicalType::Int64, "bigint"),
    (Dialect::Mysql, LogicalType::Text, "text"),
    (Dialect::Mysql, LogicalType::Bool, "boolean"),
    (Dialect::Sqlite, LogicalType::Int32, "integer"),
    (Dialect::Sqlite, LogicalType::Int64, "integer"),
    (Dialect::Sqlite, LogicalType::Text, "text"),
    (Dialect::Sqlite, LogicalType::Bool, "integer"),
];

/// logical type x dialect -> auto-assigned primary key declaration
///
/// The recorded `id` is Int32, so MySQL gets `integer auto_increment` rather
/// than `bigint`; a 32-bit key decodes into the same row type as PostgreSQL `serial`.
const AUTO_INCREMENT_KEYS: &[(Dialect, LogicalType, &str)] = &[
    (Dialect::Postgres, LogicalType::Int32, "serial primary key"),
    (Dialect::Postgres, LogicalType::Int64, "bigserial primary key"),
    (Dialect::Mysql, LogicalType::Int32, "integer auto_increment primary key"),
    (Dialect::Mysql, LogicalType::Int64, "bigint auto_increment primary key"),
    (Dialect::Sqlite, LogicalType::Int32, "integer primary key autoincrement"),
    (Dialect::Sqlite, LogicalType::Int64, "integer primary key autoincrement"),
];

fn lookup(
    table: &[(Dialect, LogicalType, &'static str)],
    dialect: Dialect,
    logical_type: LogicalType,
) -> Option<&'static str> {
    table
        .iter()
        .find(|(d, t, _)| *d == dialect && *t == logical_type)
        .map(|(_, _, token)| *token)
}

impl Dialect {
    pub fn type_token(self, logical_type: LogicalType) -> Option<&'static str> {
        lookup(TYPE_TOKENS, self, logical_type)
    }

    pub fn auto_increment_key(self, logical_type: LogicalType) -> Option<&'static str> {
        lookup(AUTO_INCREMENT_KEYS, self, logical_type)
    }

    /// Whether unquoted identifiers are normalised by the engine
    pub fn folds_identifier_case(self) -> bool {
        match self {
            Dialect::Postgres => true,
            Dialect::Mysql | Dialect::Sqlite => false,
        }
    }

    /// The name the engine resolves an unquoted identifier to.
    ///
    /// PostgreSQL only downcases ASCII A-Z under multibyte encodings.
    pub fn fold_identifier(self, name: &str) -> String {
        if self.folds_identifier_case() {
            name.to_ascii_lowercase()
        } else {
            name.to_string()
        }
    }

    /// A column must be aliased iff folding would change its visible name
    pub fn needs_alias(self, name: &str) -> bool {
        self.fold_identifier(name) != name
    }

    pub fn quote_identifier(self, name: &str) -> String {
        match self {
            Dialect::Postgres | Dialect::Sqlite => format!("\"{}\"", name.replace('"', "\"\"")),
            Dialect::Mysql => format!("`{}`", name.replace('`', "``")),
        }
    }

    /// Render a sea-query statement with this dialect's backend
    pub fn build<S: QueryStatementWriter>(self, statement: &S) -> String {
        match self {
            Dialect::Postgres => statement.to_string(PostgresQueryBuilder),
            Dialect::Mysql => statement.to_string(MysqlQueryBuilder),
            Dialect::Sqlite => statement.to_string(SqliteQueryBuilder),
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Dialect::Postgres => "postgres",
            Dialect::Mysql => "mysql",
            Dialect::Sqlite => "sqlite",
        };
        f.write_str(name)
    }
}

/// A dialect paired with a schema it has been checked to support.
///
/// Both statements are rendered once here; the schema cannot change afterwards.
#[derive(Debug, Clone)]
pub struct DialectAdapter {
    dialect: Dialect,
    schema: SchemaDescriptor,
    create_table: String,
    projection: String,
}

impl DialectAdapter {
    pub fn new(dialect: Dialect, schema: SchemaDescriptor) -> Result<Self, StoreError> {
        if schema.columns().is_empty() {
            return Err(StoreError::InvalidSchema {
                table: schema.table_name(),
                reason: "no columns declared".to_string(),
            });
        }
        let keys = schema.columns().iter().filter(|c| c.is_primary_key()).count();
        if keys > 1 {
            return Err(StoreError::InvalidSchema {
                table: schema.table_name(),
                reason: format!("{} auto-increment primary keys declared, at most one allowed", keys),
            });
        }

        let create_table = ddl::render_create_table(dialect, &schema)?;
        let projection = recorded::render_column_projection(dialect, &schema);
        Ok(Self {
            dialect,
            schema,
            create_table,
            projection,
        })
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn schema(&self) -> &SchemaDescriptor {
        &self.schema
    }

    pub fn render_create_table(&self) -> &str {
        &self.create_table
    }

    pub fn render_column_projection(&self) -> &str {
        &self.projection
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ColumnSpec, TableName, RECORDED_SCHEMA};

    static UUID_COLUMNS: [ColumnSpec; 2] = [
        ColumnSpec::primary_key("id", LogicalType::Int32),
        ColumnSpec::not_null("externalId", LogicalType::Uuid),
    ];

    static TEXT_KEY_COLUMNS: [ColumnSpec; 1] = [ColumnSpec::primary_key("id", LogicalType::Text)];

    static NON_ASCII_COLUMNS: [ColumnSpec; 3] = [
        ColumnSpec::primary_key("id", LogicalType::Int32),
        ColumnSpec::null("Écho", LogicalType::Text),
        ColumnSpec::null("Éditeur", LogicalType::Text),
    ];

    static NO_COLUMNS: [ColumnSpec; 0] = [];

    static TWO_KEY_COLUMNS: [ColumnSpec; 2] = [
        ColumnSpec::primary_key("id", LogicalType::Int32),
        ColumnSpec::primary_key("legacyId", LogicalType::Int64),
    ];

    #[test]
    fn test_type_tokens() {
        assert_eq!(Dialect::Postgres.type_token(LogicalType::Int64), Some("bigint"));
        assert_eq!(Dialect::Mysql.type_token(LogicalType::Int64), Some("bigint"));
        assert_eq!(Dialect::Sqlite.type_token(LogicalType::Int64), Some("integer"));
        assert_eq!(Dialect::Sqlite.type_token(LogicalType::Bool), Some("integer"));
        assert_eq!(Dialect::Mysql.type_token(LogicalType::Uuid), None);
    }

    #[test]
    fn test_auto_increment_keys() {
        assert_eq!(Dialect::Postgres.auto_increment_key(LogicalType::Int32), Some("serial primary key"));
        assert_eq!(
            Dialect::Mysql.auto_increment_key(LogicalType::Int32),
            Some("integer auto_increment primary key")
        );
        assert_eq!(
            Dialect::Mysql.auto_increment_key(LogicalType::Int64),
            Some("bigint auto_increment primary key")
        );
        assert_eq!(
            Dialect::Sqlite.auto_increment_key(LogicalType::Int32),
            Some("integer primary key autoincrement")
        );
        assert_eq!(Dialect::Postgres.auto_increment_key(LogicalType::Text), None);
    }

    #[test]
    fn test_alias_rule() {
        assert!(Dialect::Postgres.needs_alias("programId"));
        assert!(!Dialect::Postgres.needs_alias("genre1"));
        assert!(!Dialect::Mysql.needs_alias("programId"));
        assert!(!Dialect::Sqlite.needs_alias("programId"));
        assert_eq!(Dialect::Postgres.fold_identifier("startAt"), "startat");
    }

    #[test]
    fn test_non_ascii_identifiers_are_not_folded() {
        assert!(!Dialect::Postgres.needs_alias("Écho"));
        assert_eq!(Dialect::Postgres.fold_identifier("Écho"), "Écho");
        assert_eq!(Dialect::Postgres.fold_identifier("ÉditeurId"), "Éditeurid");
        assert!(Dialect::Postgres.needs_alias("ÉditeurId"));

        let schema = SchemaDescriptor::new(TableName::Recorded, &NON_ASCII_COLUMNS);
        let adapter = DialectAdapter::new(Dialect::Postgres, schema).unwrap();
        assert_eq!(adapter.render_column_projection(), "id, Écho, Éditeur");
    }

    #[test]
    fn test_adapter_rejects_empty_schema() {
        let schema = SchemaDescriptor::new(TableName::Recorded, &NO_COLUMNS);
        for dialect in ALL_DIALECTS {
            match DialectAdapter::new(dialect, schema) {
                Err(StoreError::InvalidSchema { table, reason }) => {
                    assert_eq!(table, "recorded");
                    assert!(reason.contains("no columns"));
                }
                other => panic!("expected InvalidSchema, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_adapter_rejects_multiple_primary_keys() {
        let schema = SchemaDescriptor::new(TableName::Recorded, &TWO_KEY_COLUMNS);
        for dialect in ALL_DIALECTS {
            let err = DialectAdapter::new(dialect, schema).unwrap_err();
            assert!(matches!(err, StoreError::InvalidSchema { .. }));
            assert!(err.to_string().contains("2 auto-increment primary keys"));
        }
    }

    #[test]
    fn test_quote_identifier() {
        assert_eq!(Dialect::Postgres.quote_identifier("ruleId"), "\"ruleId\"");
        assert_eq!(Dialect::Mysql.quote_identifier("ruleId"), "`ruleId`");
    }

    #[test]
    fn test_adapter_accepts_recorded_schema_everywhere() {
        for dialect in ALL_DIALECTS {
            assert!(DialectAdapter::new(dialect, RECORDED_SCHEMA).is_ok());
        }
    }

    #[test]
    fn test_adapter_rejects_unsupported_type() {
        let schema = SchemaDescriptor::new(TableName::Recorded, &UUID_COLUMNS);
        assert!(DialectAdapter::new(Dialect::Postgres, schema).is_ok());

        match DialectAdapter::new(Dialect::Sqlite, schema) {
            Err(StoreError::SchemaTypeUnsupported { column, logical_type, dialect }) => {
                assert_eq!(column, "externalId");
                assert_eq!(logical_type, LogicalType::Uuid);
                assert_eq!(dialect, Dialect::Sqlite);
            }
            other => panic!("expected SchemaTypeUnsupported, got {:?}", other),
        }
    }

    #[test]
    fn test_adapter_rejects_unsupported_key_type() {
        let schema = SchemaDescriptor::new(TableName::Recorded, &TEXT_KEY_COLUMNS);
        for dialect in ALL_DIALECTS {
            assert!(matches!(
                DialectAdapter::new(dialect, schema),
                Err(StoreError::SchemaTypeUnsupported { .. })
            ));
        }
    }
}
