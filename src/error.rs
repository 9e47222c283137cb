//! Error types

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, HubError>;

#[derive(Debug, Error)]
pub enum HubError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("missing configuration: {0}")]
    MissingConfig(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("database not initialized at {} (run `hub init`)", .0.display())]
    NotInitialized(PathBuf),

    #[error("unknown filter: {0}")]
    UnknownFilter(String),

    #[error("access denied to the '{0}' listing")]
    AccessDenied(String),
}
