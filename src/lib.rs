//! Process-wide service utilities: a section-scoped configuration store and
//! a leveled, size-rotated file logger.
//!
//! - **config** — load a TOML document once, read typed values with defaults.
//! - **logger** — install one file logger, emit records at six levels.
//! - **error** — error enums for both.
//!
//! Both facilities expose free functions over a process-wide instance and
//! the owned types ([`ConfigStore`], [`Logger`]) for callers that want their
//! own.

pub mod config;
pub mod error;
pub mod logger;

pub use config::ConfigStore;
pub use error::{ConfigError, DocumentError, LogError};
pub use logger::{Level, LogSettings, Logger};
