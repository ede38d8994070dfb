//! Crate-wide error types.

use std::path::PathBuf;

use thiserror::Error;

/// Failure reading or parsing a configuration document.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("parse error: {0}")]
    Syntax(#[from] toml_edit::TomlError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    /// `load` failed; the store has been reset to uninitialized.
    #[error("Load config error: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: DocumentError,
    },

    #[error("config not init")]
    NotInitialized,

    #[error("unmarshal error: {0}")]
    Unmarshal(#[from] toml::de::Error),
}

#[derive(Debug, Error)]
pub enum LogError {
    #[error("failed to open log file '{}': {source}", .path.display())]
    Sink {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unrecognised log level: '{0}'")]
    Level(String),
}
