//! Core error types

use thiserror::Error;

/// Core error type for EcoLingua
#[derive(Debug, Error)]
pub enum CoreError {
    /// Configuration value rejected
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parse error
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Result alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
