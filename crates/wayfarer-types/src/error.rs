//! Error types for Wayfarer.

use std::io;

/// Errors produced by the Wayfarer crates.
#[derive(Debug, thiserror::Error)]
pub enum WayfarerError {
    #[error("blob store error: {0}")]
    Blob(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("snapshot error: {0}")]
    Snapshot(String),

    #[error("viewport error: {0}")]
    Viewport(String),

    #[error("command error: {0}")]
    Command(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, WayfarerError>;
