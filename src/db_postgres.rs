//! PostgreSQL connection handling
//!
//! Mirrors the SQLite helpers in db.rs but connects through a PgPool and can
//! create the target database on first start.

use log::info;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use std::str::FromStr;

use crate::db::build_server_url;
use crate::store::{DynError, QueryOperator};

pub const DEFAULT_POSTGRES_PORT: u16 = 5432;

/// Open a PostgreSQL connection pool
pub async fn open_postgres_connection(
    base_url: &str,
    password: &str,
    database: &str,
    max_connections: u32,
) -> Result<PgPool, DynError> {
    let full_url = build_server_url(base_url, DEFAULT_POSTGRES_PORT, password, database)?;

    let options = PgConnectOptions::from_str(&full_url)?;

    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;

    Ok(pool)
}

/// Create a PostgreSQL database if it doesn't exist
pub async fn create_database_if_not_exists(
    base_url: &str,
    password: &str,
    database: &str,
) -> Result<(), DynError> {
    // Connect to the default 'postgres' database to create the target database
    let admin_pool = open_postgres_connection(base_url, password, "postgres", 1).await?;

    let exists: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
            .bind(database)
            .fetch_one(&admin_pool)
            .await?;

    if !exists {
        // CREATE DATABASE cannot be a prepared statement parameter
        let create_sql = format!("CREATE DATABASE \"{}\"", database.replace('"', "\"\""));
        if let Err(e) = sqlx::query(&create_sql).execute(&admin_pool).await {
            // 42P04 duplicate_database: another process won the race
            let err_str = e.to_string();
            if !err_str.contains("already exists") && !err_str.contains("42P04") {
                return Err(e.into());
            }
        } else {
            info!("Created PostgreSQL database '{}'", database);
        }
    }

    Ok(())
}

/// Open a PostgreSQL connection pool, creating the database if it doesn't exist
pub async fn open_postgres_connection_create_if_needed(
    base_url: &str,
    password: &str,
    database: &str,
    max_connections: u32,
) -> Result<PgPool, DynError> {
    create_database_if_not_exists(base_url, password, database).await?;
    open_postgres_connection(base_url, password, database, max_connections).await
}

impl QueryOperator for PgPool {
    async fn run_query(&self, sql: &str) -> Result<(), DynError> {
        sqlx::query(sql).execute(self).await?;
        Ok(())
    }
}
