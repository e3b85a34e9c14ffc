//! Error types for tickphys.
//!
//! The tick path itself never fails; errors only come out of configuration
//! loading/validation, driver setup and snapshot export.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TickError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unsupported: {0}")]
    Unsupported(String),
}

impl TickError {
    pub fn config(msg: impl Into<String>) -> Self {
        TickError::Config(msg.into())
    }

    pub fn unsupported(msg: impl Into<String>) -> Self {
        TickError::Unsupported(msg.into())
    }
}

pub type TickResult<T> = Result<T, TickError>;
