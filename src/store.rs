//! The recorded-program store application code programs against
//!
//! A store pairs a [`DialectAdapter`] with a [`QueryOperator`]. The adapter
//! renders engine-correct SQL; the operator owns the connection and runs it.

use log::{debug, info};
use std::future::Future;
use thiserror::Error;

use crate::dialect::{Dialect, DialectAdapter};
use crate::model::NewRecorded;
use crate::queries::recorded;
use crate::schema::{LogicalType, SchemaDescriptor, RECORDED_SCHEMA};

pub type DynError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("column '{column}' has logical type {logical_type}, which {dialect} cannot represent")]
    SchemaTypeUnsupported {
        column: String,
        logical_type: LogicalType,
        dialect: Dialect,
    },
    #[error("schema for table '{table}' is malformed: {reason}")]
    InvalidSchema { table: String, reason: String },
    #[error("query execution failed: {0}")]
    ExecutionFailed(#[source] DynError),
}

/// Runs a raw SQL statement and discards any result rows.
///
/// Timeouts, retries and pooling are the implementor's concern.
pub trait QueryOperator {
    fn run_query(&self, sql: &str) -> impl Future<Output = Result<(), DynError>> + Send;
}

pub struct RecordedStore<O> {
    adapter: DialectAdapter,
    operator: O,
}

impl<O: QueryOperator> RecordedStore<O> {
    /// Store for the recorded table on the given engine
    pub fn new(dialect: Dialect, operator: O) -> Result<Self, StoreError> {
        Self::with_schema(dialect, RECORDED_SCHEMA, operator)
    }

    /// The statement builders target the recorded table, so other schemas are
    /// only constructed inside the crate
    pub(crate) fn with_schema(
        dialect: Dialect,
        schema: SchemaDescriptor,
        operator: O,
    ) -> Result<Self, StoreError> {
        let adapter = DialectAdapter::new(dialect, schema)?;
        Ok(Self { adapter, operator })
    }

    pub fn dialect(&self) -> Dialect {
        self.adapter.dialect()
    }

    pub fn adapter(&self) -> &DialectAdapter {
        &self.adapter
    }

    pub fn operator(&self) -> &O {
        &self.operator
    }

    /// create table if not exists; safe to call on every startup
    pub async fn create(&self) -> Result<(), StoreError> {
        info!(
            "Ensuring table '{}' exists ({})",
            self.adapter.schema().table_name(),
            self.dialect()
        );
        self.execute(self.adapter.render_create_table()).await
    }

    /// Projection list for every select against the table
    pub fn get_all_columns(&self) -> String {
        self.adapter.render_column_projection().to_string()
    }

    pub async fn insert(&self, program: &NewRecorded) -> Result<(), StoreError> {
        self.execute(&recorded::insert(self.dialect(), program)).await
    }

    pub async fn delete(&self, id: i32) -> Result<(), StoreError> {
        self.execute(&recorded::delete(self.dialect(), id)).await
    }

    pub async fn add_thumbnail(&self, id: i32, thumbnail_path: &str) -> Result<(), StoreError> {
        self.execute(&recorded::add_thumbnail(self.dialect(), id, thumbnail_path))
            .await
    }

    /// Mark a program as no longer being recorded
    pub async fn remove_recording(&self, id: i32) -> Result<(), StoreError> {
        self.execute(&recorded::remove_recording(self.dialect(), id))
            .await
    }

    /// Detach every program from a deleted reservation rule
    pub async fn delete_rule_id(&self, rule_id: i32) -> Result<(), StoreError> {
        self.execute(&recorded::delete_rule_id(self.dialect(), rule_id))
            .await
    }

    pub fn find_id_sql(&self, id: i32) -> String {
        recorded::find_id(self.dialect(), self.adapter.render_column_projection(), id)
    }

    /// Newest first
    pub fn find_all_sql(&self, limit: Option<u64>, offset: u64) -> String {
        recorded::find_all(
            self.dialect(),
            self.adapter.render_column_projection(),
            limit,
            offset,
        )
    }

    pub fn find_old_sql(&self) -> String {
        recorded::find_old(self.dialect(), self.adapter.render_column_projection())
    }

    pub fn count_sql(&self) -> String {
        recorded::count(self.dialect())
    }

    async fn execute(&self, sql: &str) -> Result<(), StoreError> {
        debug!("Executing: {}", sql);
        self.operator
            .run_query(sql)
            .await
            .map_err(StoreError::ExecutionFailed)
    }
}
