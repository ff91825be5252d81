//! Application configuration.
//!
//! Loaded from a TOML file; every key is optional:
//!
//! ```toml
//! listen = "0.0.0.0:8080"
//! title = "Tiger Reader"
//! bucket = "my-demo-bucket"
//! env_var = "TEST"
//!
//! [guestbook]
//! page_size = 10
//! ```

use std::net::SocketAddr;
use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Address the HTTP server binds to.
    pub listen: SocketAddr,
    /// Title shown on the home page.
    pub title: String,
    /// Bucket used by the storage demo.
    pub bucket: String,
    /// Environment variable echoed by `GET /env`.
    pub env_var: String,
    pub guestbook: GuestbookConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GuestbookConfig {
    /// Greetings shown per page, newest first.
    pub page_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen: SocketAddr::from(([127, 0, 0, 1], 8080)),
            title: "Tiger Reader".to_string(),
            bucket: "switchyard-demo".to_string(),
            env_var: "TEST".to_string(),
            guestbook: GuestbookConfig::default(),
        }
    }
}

impl Default for GuestbookConfig {
    fn default() -> Self {
        Self { page_size: 10 }
    }
}

impl Config {
    pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    /// Reads and parses the file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_gives_defaults() {
        assert_eq!(Config::from_toml("").unwrap(), Config::default());
    }

    #[test]
    fn test_partial_file() {
        let config = Config::from_toml(
            r#"
            listen = "0.0.0.0:3000"
            bucket = "notes-bucket"

            [guestbook]
            page_size = 3
            "#,
        )
        .unwrap();

        assert_eq!(config.listen.port(), 3000);
        assert_eq!(config.bucket, "notes-bucket");
        assert_eq!(config.guestbook.page_size, 3);
        assert_eq!(config.title, "Tiger Reader");
    }

    #[test]
    fn test_invalid_file() {
        assert!(matches!(
            Config::from_toml("listen = 12"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = Config::load(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
        assert!(err.to_string().contains("/definitely/not/here.toml"));
    }
}
