// Library interface for the binary and integration tests

pub mod config;
pub mod credentials;
pub mod db;
pub mod db_mysql;
pub mod db_postgres;
pub mod dialect;
pub mod model;
pub mod queries;
pub mod schema;
pub mod store;

pub use dialect::{Dialect, DialectAdapter};
pub use model::{NewRecorded, Recorded};
pub use schema::{SchemaDescriptor, TableName, RECORDED_SCHEMA};
pub use store::{DynError, QueryOperator, RecordedStore, StoreError};
