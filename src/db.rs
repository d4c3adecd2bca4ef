//! Connections for each supported engine and the [`QueryOperator`] they provide

use log::info;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::path::Path;

use crate::config::StoreConfig;
use crate::credentials::{get_password, CredentialType, Credentials};
use crate::db_mysql;
use crate::db_postgres;
use crate::dialect::Dialect;
use crate::store::{DynError, QueryOperator};

/// Open (creating if needed) a file-based SQLite database
/// Enables WAL mode and foreign keys
pub async fn open_sqlite_connection(db_path: &Path) -> Result<SqlitePool, DynError> {
    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    info!("SQLite database: {}", db_path.display());
    Ok(pool)
}

/// Create a SQLite database in a fresh temporary directory for testing
/// Keep the returned TempDir alive for as long as the pool is used
pub async fn create_test_connection_in_temporary_file(
) -> Result<(SqlitePool, tempfile::TempDir), DynError> {
    let temp_dir = tempfile::tempdir()?;
    let pool = open_sqlite_connection(&temp_dir.path().join("test.sqlite")).await?;
    Ok((pool, temp_dir))
}

/// Build a full server connection URL with password and database
///
/// Takes a base URL like `postgres://user@host:5432` and inserts the
/// url-encoded password and appends the database name.
pub fn build_server_url(
    base_url: &str,
    default_port: u16,
    password: &str,
    database: &str,
) -> Result<String, DynError> {
    let url = url::Url::parse(base_url)?;

    let user = url.username();
    let host = url
        .host_str()
        .ok_or_else(|| format!("Missing host in url: {}", base_url))?;
    let port = url.port().unwrap_or(default_port);

    Ok(format!(
        "{}://{}:{}@{}:{}/{}",
        url.scheme(),
        user,
        urlencoding::encode(password),
        host,
        port,
        database
    ))
}

impl QueryOperator for SqlitePool {
    async fn run_query(&self, sql: &str) -> Result<(), DynError> {
        sqlx::query(sql).execute(self).await?;
        Ok(())
    }
}

/// A connection to whichever engine the configuration selects
pub enum DbConnection {
    Sqlite(SqlitePool),
    Postgres(sqlx::PgPool),
    Mysql(sqlx::MySqlPool),
}

impl DbConnection {
    /// Connect to the configured engine, creating the database when the engine supports it
    pub async fn connect(
        config: &StoreConfig,
        credentials: &Option<Credentials>,
    ) -> Result<Self, DynError> {
        config.validate()?;

        match config.engine {
            Dialect::Sqlite => {
                let sqlite = config
                    .sqlite
                    .as_ref()
                    .ok_or("engine is sqlite but [sqlite] section is missing")?;
                Ok(DbConnection::Sqlite(open_sqlite_connection(&sqlite.path).await?))
            }
            Dialect::Postgres => {
                let server = config
                    .postgres
                    .as_ref()
                    .ok_or("engine is postgres but [postgres] section is missing")?;
                let password =
                    get_password(credentials, CredentialType::Postgres, &server.credential_profile)?;
                let pool = db_postgres::open_postgres_connection_create_if_needed(
                    &server.url,
                    &password,
                    &server.database,
                    server.max_connections,
                )
                .await?;
                Ok(DbConnection::Postgres(pool))
            }
            Dialect::Mysql => {
                let server = config
                    .mysql
                    .as_ref()
                    .ok_or("engine is mysql but [mysql] section is missing")?;
                let password =
                    get_password(credentials, CredentialType::Mysql, &server.credential_profile)?;
                let pool = db_mysql::open_mysql_connection_create_if_needed(
                    &server.url,
                    &password,
                    &server.database,
                    server.max_connections,
                )
                .await?;
                Ok(DbConnection::Mysql(pool))
            }
        }
    }

    pub fn dialect(&self) -> Dialect {
        match self {
            DbConnection::Sqlite(_) => Dialect::Sqlite,
            DbConnection::Postgres(_) => Dialect::Postgres,
            DbConnection::Mysql(_) => Dialect::Mysql,
        }
    }
}

impl QueryOperator for DbConnection {
    async fn run_query(&self, sql: &str) -> Result<(), DynError> {
        match self {
            DbConnection::Sqlite(pool) => pool.run_query(sql).await,
            DbConnection::Postgres(pool) => pool.run_query(sql).await,
            DbConnection::Mysql(pool) => pool.run_query(sql).await,
        }
    }
}
