//! Error types for the demo services.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from the document and blob stores.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No entity of this kind with this id.
    #[error("{kind} {id} not found")]
    NotFound { kind: String, id: i64 },

    /// No object with this name in the bucket.
    #[error("object {bucket}/{name} not found")]
    ObjectNotFound { bucket: String, name: String },

    /// The backend refused the operation.
    #[error("backend unavailable: {0}")]
    Backend(String),

    /// An entity could not be encoded or decoded.
    #[error("codec error: {0}")]
    Codec(#[from] serde_json::Error),
}

impl StoreError {
    /// Returns whether the error means the requested item does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::ObjectNotFound { .. })
    }
}

/// Errors loading the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}
