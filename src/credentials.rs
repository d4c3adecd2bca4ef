use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::store::DynError;

/// Credentials file structure
///
/// Format:
/// ```toml
/// [postgres.profile_name]
/// password = "your_postgres_password_here"
///
/// [mysql.profile_name]
/// password = "your_mysql_password_here"
/// ```
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Credentials {
    #[serde(default)]
    pub postgres: HashMap<String, CredentialProfile>,
    #[serde(default)]
    pub mysql: HashMap<String, CredentialProfile>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CredentialProfile {
    pub password: String,
}

/// Credential type for looking up passwords
#[derive(Debug, Clone, Copy)]
pub enum CredentialType {
    Postgres,
    Mysql,
}

/// Get the default credentials file path: ~/.config/recorded_store/credentials.toml
pub fn get_credentials_path() -> PathBuf {
    let home = std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    home.join(".config")
        .join("recorded_store")
        .join("credentials.toml")
}

/// Load credentials from the default location
/// Returns None if the file doesn't exist
pub fn load_credentials() -> Result<Option<Credentials>, DynError> {
    load_credentials_from(&get_credentials_path())
}

pub fn load_credentials_from(creds_path: &Path) -> Result<Option<Credentials>, DynError> {
    if !creds_path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(creds_path)?;
    let credentials: Credentials = toml::from_str(&content)?;

    Ok(Some(credentials))
}

/// Get password for a specific profile and credential type
pub fn get_password(
    credentials: &Option<Credentials>,
    cred_type: CredentialType,
    profile: &str,
) -> Result<String, String> {
    let section_name = match cred_type {
        CredentialType::Postgres => "postgres",
        CredentialType::Mysql => "mysql",
    };

    match credentials {
        Some(creds) => {
            let profiles = match cred_type {
                CredentialType::Postgres => &creds.postgres,
                CredentialType::Mysql => &creds.mysql,
            };
            profiles
                .get(profile)
                .map(|p| p.password.clone())
                .ok_or_else(|| {
                    format!(
                        "Credential profile '[{}.{}]' not found in credentials file",
                        section_name, profile
                    )
                })
        }
        None => Err(format!(
            "Credentials file not found. Expected at: {}",
            get_credentials_path().display()
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_and_lookup() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.toml");
        std::fs::write(
            &path,
            r#"
[postgres.default]
password = "pg-secret"

[mysql.replica]
password = "my-secret"
"#,
        )
        .unwrap();

        let credentials = load_credentials_from(&path).unwrap();
        assert_eq!(
            get_password(&credentials, CredentialType::Postgres, "default").unwrap(),
            "pg-secret"
        );
        assert_eq!(
            get_password(&credentials, CredentialType::Mysql, "replica").unwrap(),
            "my-secret"
        );

        let err = get_password(&credentials, CredentialType::Mysql, "default").unwrap_err();
        assert!(err.contains("[mysql.default]"));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let credentials = load_credentials_from(&dir.path().join("absent.toml")).unwrap();
        assert!(credentials.is_none());
        assert!(get_password(&credentials, CredentialType::Postgres, "default").is_err());
    }
}
