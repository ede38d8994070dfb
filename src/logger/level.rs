use std::fmt;
use std::str::FromStr;

use crate::error::LogError;

/// Record severity, lowest first.
///
/// `Panic` and `Fatal` escalate after writing: the former unwinds the
/// current thread, the latter exits the process.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    Debug,
    #[default]
    Info,
    Warn,
    Error,
    Panic,
    Fatal,
}

impl Level {
    pub const ALL: [Level; 6] = [
        Level::Debug,
        Level::Info,
        Level::Warn,
        Level::Error,
        Level::Panic,
        Level::Fatal,
    ];

    /// Resolve a configured level name. Matching is case-sensitive and any
    /// unrecognised name, including `""`, resolves to [`Level::Info`].
    pub fn resolve(name: &str) -> Self {
        name.parse().unwrap_or_default()
    }

    /// Lower-case config name, e.g. `"warn"`.
    pub fn name(self) -> &'static str {
        match self {
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
            Level::Panic => "panic",
            Level::Fatal => "fatal",
        }
    }

    /// Capitalized label written into records, e.g. `"WARN"`.
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
            Level::Panic => "PANIC",
            Level::Fatal => "FATAL",
        }
    }

    pub fn escalates(self) -> bool {
        matches!(self, Level::Panic | Level::Fatal)
    }
}

impl FromStr for Level {
    type Err = LogError;

    /// Strict parse: only the exact lower-case names are accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Level::ALL
            .into_iter()
            .find(|level| level.name() == s)
            .ok_or_else(|| LogError::Level(s.to_owned()))
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
