//! Configuration module
//!
//! Loads the control-plane connection settings from a TOML file:
//!
//! ```toml
//! [connection]
//! api_url = "api.example.com"
//! path_url = "/api/rest/v1/account-123"
//! username = "user@example.com"
//! password = "secret"
//! ```

use anyhow::{Context, Result, bail};
use atomrun_core::domain::credentials::Credentials;
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// File looked up next to the executable when no path is given
pub const CONFIG_FILE_NAME: &str = "atomrun.toml";

/// CLI configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub connection: ConnectionConfig,
}

/// `[connection]` table
#[derive(Clone, Deserialize)]
pub struct ConnectionConfig {
    /// Host of the control-plane API, with or without scheme
    pub api_url: String,
    /// Path prefix for every endpoint
    pub path_url: String,
    pub username: String,
    pub password: String,
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("api_url", &self.api_url)
            .field("path_url", &self.path_url)
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

impl Config {
    /// `atomrun.toml` in the directory of the running executable
    pub fn default_path() -> Result<PathBuf> {
        let exe = std::env::current_exe().context("Failed to locate the running executable")?;
        let dir = exe
            .parent()
            .context("Executable path has no parent directory")?;
        Ok(dir.join(CONFIG_FILE_NAME))
    }

    /// Read and validate a configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Reading configuration file {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Parsing configuration file {}", path.display()))?;

        config
            .validate()
            .with_context(|| format!("Invalid configuration file {}", path.display()))?;

        Ok(config)
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        let connection = &self.connection;

        for (key, value) in [
            ("api_url", &connection.api_url),
            ("path_url", &connection.path_url),
            ("username", &connection.username),
            ("password", &connection.password),
        ] {
            if value.trim().is_empty() {
                bail!("connection.{} cannot be empty", key);
            }
        }

        Ok(())
    }

    /// Credentials for the API client
    ///
    /// A bare host in `api_url` is assumed to be served over HTTPS.
    pub fn credentials(&self) -> Credentials {
        let connection = &self.connection;
        let api_url = connection.api_url.trim();
        let base_url = if api_url.starts_with("http://") || api_url.starts_with("https://") {
            api_url.to_string()
        } else {
            format!("https://{}", api_url)
        };

        let path_url = connection.path_url.trim();
        let path_prefix = if path_url.starts_with('/') {
            path_url.to_string()
        } else {
            format!("/{}", path_url)
        };

        Credentials::new(
            base_url,
            path_prefix,
            connection.username.clone(),
            connection.password.clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    const VALID: &str = r#"
[connection]
api_url = "api.example.com"
path_url = "api/rest/v1/account-123"
username = "user@example.com"
password = "secret"
"#;

    #[test]
    fn test_load_valid_config() {
        let file = write_config(VALID);
        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.connection.api_url, "api.example.com");
        assert_eq!(config.connection.username, "user@example.com");
    }

    #[test]
    fn test_credentials_normalize_urls() {
        let file = write_config(VALID);
        let credentials = Config::load(file.path()).unwrap().credentials();
        assert_eq!(
            credentials.url_for("/Atom/query"),
            "https://api.example.com/api/rest/v1/account-123/Atom/query"
        );
    }

    #[test]
    fn test_credentials_keep_explicit_scheme() {
        let file = write_config(&VALID.replace("api.example.com", "http://localhost:8080"));
        let credentials = Config::load(file.path()).unwrap().credentials();
        assert_eq!(credentials.base_url, "http://localhost:8080");
    }

    #[test]
    fn test_missing_key_fails() {
        let file = write_config(
            r#"
[connection]
api_url = "api.example.com"
path_url = "/v1"
username = "user"
"#,
        );
        let err = Config::load(file.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("password"));
    }

    #[test]
    fn test_blank_value_fails() {
        let file = write_config(&VALID.replace("\"secret\"", "\"  \""));
        let err = Config::load(file.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("connection.password cannot be empty"));
    }

    #[test]
    fn test_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(&dir.path().join(CONFIG_FILE_NAME)).unwrap_err();
        assert!(err.to_string().starts_with("Reading configuration file"));
    }

    #[test]
    fn test_debug_hides_password() {
        let file = write_config(VALID);
        let config = Config::load(file.path()).unwrap();
        assert!(!format!("{:?}", config).contains("secret"));
    }
}
