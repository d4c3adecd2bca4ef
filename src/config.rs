use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::dialect::Dialect;
use crate::store::DynError;

fn default_max_connections() -> u32 {
    5
}

/// Store configuration file structure
#[derive(Debug, Deserialize)]
pub struct StoreConfig {
    /// Engine to persist recorded programs in: postgres, mysql, or sqlite
    pub engine: Dialect,
    /// SQLite settings (maps to [sqlite] section in TOML)
    pub sqlite: Option<SqliteConfig>,
    /// PostgreSQL settings (maps to [postgres] section in TOML)
    pub postgres: Option<ServerConfig>,
    /// MySQL settings (maps to [mysql] section in TOML)
    pub mysql: Option<ServerConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SqliteConfig {
    /// Database file, created on first start
    pub path: PathBuf,
}

/// Connection settings for a database server
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Base URL without password or database (e.g., postgres://user@host:5432)
    pub url: String,
    /// Database name, created if it does not exist
    pub database: String,
    /// Credential profile name to look up password from ~/.config/recorded_store/credentials.toml
    pub credential_profile: String,
    /// Pool size (default: 5)
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl StoreConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn load(path: &Path) -> Result<Self, DynError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config {}: {}", path.display(), e))?;
        Ok(Self::from_toml_str(&content)?)
    }

    /// Ensure the section for the selected engine is present
    pub fn validate(&self) -> Result<(), String> {
        let present = match self.engine {
            Dialect::Sqlite => self.sqlite.is_some(),
            Dialect::Postgres => self.postgres.is_some(),
            Dialect::Mysql => self.mysql.is_some(),
        };
        if !present {
            return Err(format!(
                "engine is {} but [{}] section is missing in config",
                self.engine, self.engine
            ));
        }

        for server in [&self.postgres, &self.mysql].into_iter().flatten() {
            if server.max_connections == 0 {
                return Err("max_connections must be at least 1".to_string());
            }
        }

        Ok(())
    }
}
