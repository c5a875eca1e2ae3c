//! Cache error types
//!
//! Every backend translates its native failures into [`CacheError`] so callers
//! never see `std::io` or `redis` error types leaking through the storage contract.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CacheError {
    /// Missing or invalid backend parameters
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Remote backend unreachable or rejected the handshake
    #[error("Connection failed: {0}")]
    Connection(String),

    /// The storage medium refused to persist an entry
    #[error("Write failed for key '{key}': {reason}")]
    WriteFailed { key: String, reason: String },

    /// The cache is switched off and the call was not forced
    #[error("Cache is disabled")]
    Disabled,

    /// Redis operation error
    #[error("Redis error: {0}")]
    Redis(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CacheError {
    pub fn write_failed(key: &str, reason: impl std::fmt::Display) -> Self {
        CacheError::WriteFailed {
            key: key.to_string(),
            reason: reason.to_string(),
        }
    }

    /// True for failures raised while establishing a backend (config or connection)
    pub fn is_construction_error(&self) -> bool {
        matches!(
            self,
            CacheError::Configuration(_) | CacheError::Connection(_)
        )
    }
}
