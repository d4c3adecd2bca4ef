//! SQL text builders, one module per statement family
pub mod ddl;
pub mod recorded;
