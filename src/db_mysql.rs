//! MySQL connection handling

use log::info;
use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions};
use std::str::FromStr;

use crate::db::build_server_url;
use crate::store::{DynError, QueryOperator};

pub const DEFAULT_MYSQL_PORT: u16 = 3306;

/// Open a MySQL connection pool
pub async fn open_mysql_connection(
    base_url: &str,
    password: &str,
    database: &str,
    max_connections: u32,
) -> Result<MySqlPool, DynError> {
    let full_url = build_server_url(base_url, DEFAULT_MYSQL_PORT, password, database)?;

    let options = MySqlConnectOptions::from_str(&full_url)?;

    let pool = MySqlPoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;

    Ok(pool)
}

/// Open a MySQL connection pool, creating the database if it doesn't exist
pub async fn open_mysql_connection_create_if_needed(
    base_url: &str,
    password: &str,
    database: &str,
    max_connections: u32,
) -> Result<MySqlPool, DynError> {
    // An empty database name connects without selecting a schema
    let admin_pool = open_mysql_connection(base_url, password, "", 1).await?;
    let create_sql = format!(
        "CREATE DATABASE IF NOT EXISTS `{}`",
        database.replace('`', "``")
    );
    sqlx::query(&create_sql).execute(&admin_pool).await?;
    admin_pool.close().await;
    info!("MySQL database '{}' is ready", database);

    open_mysql_connection(base_url, password, database, max_connections).await
}

impl QueryOperator for MySqlPool {
    async fn run_query(&self, sql: &str) -> Result<(), DynError> {
        sqlx::query(sql).execute(self).await?;
        Ok(())
    }
}
