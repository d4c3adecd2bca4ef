use sea_query::Iden;
use serde::Serialize;
use std::fmt;

/// Physical table names shared by every dialect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Iden)]
pub enum TableName {
    #[iden = "recorded"]
    Recorded,
}

/// Engine-independent column type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum LogicalType {
    Int32,
    Int64,
    Text,
    Bool,
    /// Only representable on engines with a native uuid type
    Uuid,
}

impl fmt::Display for LogicalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LogicalType::Int32 => "Int32",
            LogicalType::Int64 => "Int64",
            LogicalType::Text => "Text",
            LogicalType::Bool => "Bool",
            LogicalType::Uuid => "Uuid",
        };
        f.write_str(name)
    }
}

/// How a column's nullability is spelled in DDL.
///
/// `Implicit` columns are nullable but carry no `null` token, which is how the
/// later-added columns of the recorded table were declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Nullability {
    NotNull,
    Null,
    Implicit,
}

impl Nullability {
    pub fn is_nullable(self) -> bool {
        !matches!(self, Nullability::NotNull)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Constraint {
    PrimaryKeyAutoIncrement,
}

/// A single column declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColumnSpec {
    pub name: &'static str,
    pub logical_type: LogicalType,
    pub nullability: Nullability,
    pub constraint: Option<Constraint>,
}

impl ColumnSpec {
    pub const fn primary_key(name: &'static str, logical_type: LogicalType) -> Self {
        Self {
            name,
            logical_type,
            nullability: Nullability::NotNull,
            constraint: Some(Constraint::PrimaryKeyAutoIncrement),
        }
    }

    pub const fn not_null(name: &'static str, logical_type: LogicalType) -> Self {
        Self {
            name,
            logical_type,
            nullability: Nullability::NotNull,
            constraint: None,
        }
    }

    pub const fn null(name: &'static str, logical_type: LogicalType) -> Self {
        Self {
            name,
            logical_type,
            nullability: Nullability::Null,
            constraint: None,
        }
    }

    pub const fn implicit_null(name: &'static str, logical_type: LogicalType) -> Self {
        Self {
            name,
            logical_type,
            nullability: Nullability::Implicit,
            constraint: None,
        }
    }

    pub fn is_primary_key(&self) -> bool {
        self.constraint == Some(Constraint::PrimaryKeyAutoIncrement)
    }
}

/// Ordered column list for one table, shared by every dialect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaDescriptor {
    table: TableName,
    columns: &'static [ColumnSpec],
}

impl SchemaDescriptor {
    pub const fn new(table: TableName, columns: &'static [ColumnSpec]) -> Self {
        Self { table, columns }
    }

    pub fn table(&self) -> TableName {
        self.table
    }

    pub fn table_name(&self) -> String {
        self.table.to_string()
    }

    pub fn columns(&self) -> &'static [ColumnSpec] {
        self.columns
    }

    pub fn column(&self, name: &str) -> Option<&'static ColumnSpec> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Columns the application supplies on insert (everything except the generated key)
    pub fn insertable_columns(&self) -> impl Iterator<Item = &'static ColumnSpec> {
        self.columns.iter().filter(|c| !c.is_primary_key())
    }
}

use LogicalType::{Bool, Int32, Int64, Text};

static RECORDED_COLUMNS: [ColumnSpec; 22] = [
    ColumnSpec::primary_key("id", Int32),
    ColumnSpec::not_null("programId", Int64),
    ColumnSpec::not_null("channelId", Int64),
    ColumnSpec::not_null("channelType", Text),
    ColumnSpec::not_null("startAt", Int64),
    ColumnSpec::not_null("endAt", Int64),
    ColumnSpec::not_null("duration", Int64),
    ColumnSpec::not_null("name", Text),
    ColumnSpec::null("description", Text),
    ColumnSpec::null("extended", Text),
    ColumnSpec::null("genre1", Int32),
    ColumnSpec::null("genre2", Int32),
    ColumnSpec::null("videoType", Text),
    ColumnSpec::null("videoResolution", Text),
    ColumnSpec::null("videoStreamContent", Int32),
    ColumnSpec::null("videoComponentType", Int32),
    ColumnSpec::null("audioSamplingRate", Int32),
    ColumnSpec::null("audioComponentType", Int32),
    ColumnSpec::implicit_null("recPath", Text),
    ColumnSpec::implicit_null("ruleId", Int32),
    ColumnSpec::implicit_null("thumbnailPath", Text),
    ColumnSpec::implicit_null("recording", Bool),
];

/// The recorded-program table
pub static RECORDED_SCHEMA: SchemaDescriptor =
    SchemaDescriptor::new(TableName::Recorded, &RECORDED_COLUMNS);
