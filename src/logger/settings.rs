//! Logger settings, optionally read from a [`ConfigStore`] section.
//!
//! Keys read by [`LogSettings::from_store`]:
//!
//! ```toml
//! [log]
//! path = "~/.myapp/app.log"
//! level = "warn"
//! max_size_mb = 1
//! max_backups = 5
//! max_age_days = 30
//! ```
//!
//! Missing or non-positive values keep the built-in defaults.
//! `ZKIT_LOG_PATH` and `ZKIT_LOG_LEVEL` override path and level when read
//! through [`LogSettings::from_store_with_env`].

use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::ConfigStore;

use super::sink::{MEGABYTE, RotationPolicy};

pub const PATH_ENV: &str = "ZKIT_LOG_PATH";
pub const LEVEL_ENV: &str = "ZKIT_LOG_LEVEL";

const DEFAULT_PATH: &str = "logs/app.log";
const DEFAULT_LEVEL: &str = "info";
const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

#[derive(Debug, Clone, PartialEq)]
pub struct LogSettings {
    pub path: PathBuf,
    /// Level name, resolved with [`super::Level::resolve`].
    pub level: String,
    pub rotation: RotationPolicy,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_PATH),
            level: DEFAULT_LEVEL.to_string(),
            rotation: RotationPolicy::default(),
        }
    }
}

impl LogSettings {
    /// Settings for `path` at `level` with the default rotation policy.
    pub fn new(path: impl AsRef<Path>, level: &str) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            level: level.to_string(),
            rotation: RotationPolicy::default(),
        }
    }

    /// Read settings from `section` of `store`.
    pub fn from_store(store: &ConfigStore, section: &str) -> Self {
        let mut settings = Self::default();

        let path = store.get_string(section, "path");
        if !path.is_empty() {
            settings.path = expand_home(&path);
        }
        let level = store.get_string(section, "level");
        if !level.is_empty() {
            settings.level = level;
        }

        if let Some(mb) = positive(store.get_i64(section, "max_size_mb")) {
            settings.rotation.max_size = mb.saturating_mul(MEGABYTE);
        }
        if let Some(count) = positive(store.get_i64(section, "max_backups")) {
            settings.rotation.max_backups = usize::try_from(count).unwrap_or(usize::MAX);
        }
        if let Some(days) = positive(store.get_i64(section, "max_age_days")) {
            settings.rotation.max_age = Duration::from_secs(days.saturating_mul(SECONDS_PER_DAY));
        }
        settings
    }

    /// [`Self::from_store`], then apply `ZKIT_LOG_PATH` / `ZKIT_LOG_LEVEL`.
    pub fn from_store_with_env(store: &ConfigStore, section: &str) -> Self {
        let path_override = env::var(PATH_ENV).ok();
        let level_override = env::var(LEVEL_ENV).ok();
        Self::from_store(store, section)
            .with_overrides(path_override.as_deref(), level_override.as_deref())
    }

    /// Replace path and/or level. Tests pass overrides here directly instead
    /// of mutating env vars.
    pub fn with_overrides(mut self, path: Option<&str>, level: Option<&str>) -> Self {
        if let Some(path) = path {
            self.path = expand_home(path);
        }
        if let Some(level) = level {
            self.level = level.to_string();
        }
        self
    }
}

fn positive(value: i64) -> Option<u64> {
    u64::try_from(value).ok().filter(|v| *v > 0)
}

/// Expand a leading `~` to the user's home directory.
fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        (None, Some(home)) if path == "~" => home,
        _ => PathBuf::from(path),
    }
}
