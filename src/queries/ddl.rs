use crate::dialect::Dialect;
use crate::schema::{ColumnSpec, Nullability, SchemaDescriptor};
use crate::store::StoreError;

/// `<name> <type>[ not null| null]` or `<name> <auto-increment key>`
pub fn column_definition(dialect: Dialect, column: &ColumnSpec) -> Result<String, StoreError> {
    let token = if column.is_primary_key() {
        dialect.auto_increment_key(column.logical_type)
    } else {
        dialect.type_token(column.logical_type)
    };
    let token = token.ok_or_else(|| StoreError::SchemaTypeUnsupported {
        column: column.name.to_string(),
        logical_type: column.logical_type,
        dialect,
    })?;

    if column.is_primary_key() {
        return Ok(format!("{} {}", column.name, token));
    }

    let nullability = match column.nullability {
        Nullability::NotNull => " not null",
        Nullability::Null => " null",
        Nullability::Implicit => "",
    };
    Ok(format!("{} {}{}", column.name, token, nullability))
}

/// create table if not exists <table> (
/// <column definition>,
/// ...
/// );
///
/// Identifiers are left unquoted so each engine applies its own resolution
/// rules, which the column projection then compensates for.
pub fn render_create_table(dialect: Dialect, schema: &SchemaDescriptor) -> Result<String, StoreError> {
    let columns = schema
        .columns()
        .iter()
        .map(|column| column_definition(dialect, column))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(format!(
        "create table if not exists {} (\n{}\n);",
        schema.table_name(),
        columns.join(",\n")
    ))
}
