//! A configured logger instance.

use std::fmt::{self, Display};
use std::io;
use std::panic::Location;
use std::path::{Path, PathBuf};

use tracing::Dispatch;
use tracing::level_filters::LevelFilter;

use crate::error::LogError;

use super::format::{Caller, RecordFormat};
use super::level::Level;
use super::settings::LogSettings;
use super::sink::SharedSink;

const TARGET: &str = "zkit";

/// Level threshold, record formatter and rotating file sink.
///
/// Each logger owns a private [`Dispatch`], so several loggers can coexist
/// and none of them touches the global tracing subscriber. Records below
/// [`Logger::min_level`] are dropped before they reach the formatter.
#[derive(Debug)]
pub struct Logger {
    min_level: Level,
    dispatch: Dispatch,
    sink: SharedSink,
}

impl Logger {
    /// Open `path` with the default rotation policy. `level` goes through
    /// [`Level::resolve`], so unknown names mean `info`.
    pub fn new(path: impl AsRef<Path>, level: &str) -> Result<Self, LogError> {
        Self::from_settings(&LogSettings::new(path, level))
    }

    pub fn from_settings(settings: &LogSettings) -> Result<Self, LogError> {
        let sink = SharedSink::open(&settings.path, settings.rotation).map_err(|source| {
            LogError::Sink {
                path: settings.path.clone(),
                source,
            }
        })?;

        let subscriber = tracing_subscriber::fmt()
            .event_format(RecordFormat)
            .with_writer(sink.clone())
            .with_max_level(LevelFilter::TRACE)
            .finish();

        let logger = Self {
            min_level: Level::resolve(&settings.level),
            dispatch: Dispatch::new(subscriber),
            sink,
        };
        logger.flush().map_err(|source| LogError::Sink {
            path: settings.path.clone(),
            source,
        })?;
        Ok(logger)
    }

    pub fn min_level(&self) -> Level {
        self.min_level
    }

    pub fn enabled(&self, level: Level) -> bool {
        level >= self.min_level
    }

    pub fn path(&self) -> PathBuf {
        self.sink.path().to_path_buf()
    }

    pub fn flush(&self) -> io::Result<()> {
        self.sink.flush()
    }

    /// Write one record attributed to `caller`. Escalating levels are
    /// flushed immediately but do not escalate here.
    pub fn log(&self, level: Level, caller: &Location<'_>, message: &dyn Display) {
        if !self.enabled(level) {
            return;
        }
        tracing::dispatcher::with_default(&self.dispatch, || emit(level, caller, message));
        if level.escalates() {
            let _ = self.flush();
        }
    }

    #[track_caller]
    pub fn debug(&self, message: impl Display) {
        self.log(Level::Debug, Location::caller(), &message);
    }

    #[track_caller]
    pub fn debugf(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Debug, Location::caller(), &args);
    }

    #[track_caller]
    pub fn info(&self, message: impl Display) {
        self.log(Level::Info, Location::caller(), &message);
    }

    #[track_caller]
    pub fn infof(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Info, Location::caller(), &args);
    }

    #[track_caller]
    pub fn warn(&self, message: impl Display) {
        self.log(Level::Warn, Location::caller(), &message);
    }

    #[track_caller]
    pub fn warnf(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Warn, Location::caller(), &args);
    }

    #[track_caller]
    pub fn error(&self, message: impl Display) {
        self.log(Level::Error, Location::caller(), &message);
    }

    #[track_caller]
    pub fn errorf(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Error, Location::caller(), &args);
    }

    /// Write a `PANIC` record, then panic with the same message.
    #[track_caller]
    pub fn panic(&self, message: impl Display) -> ! {
        self.log(Level::Panic, Location::caller(), &message);
        escalate_panic(&message)
    }

    #[track_caller]
    pub fn panicf(&self, args: fmt::Arguments<'_>) -> ! {
        self.log(Level::Panic, Location::caller(), &args);
        escalate_panic(&args)
    }

    /// Write a `FATAL` record, then exit the process with status 1.
    #[track_caller]
    pub fn fatal(&self, message: impl Display) -> ! {
        self.log(Level::Fatal, Location::caller(), &message);
        escalate_fatal()
    }

    #[track_caller]
    pub fn fatalf(&self, args: fmt::Arguments<'_>) -> ! {
        self.log(Level::Fatal, Location::caller(), &args);
        escalate_fatal()
    }
}

/// Send one event to the current tracing dispatcher.
///
/// The field names must match `SEVERITY_FIELD` and `CALLER_FIELD` in `format`.
pub(crate) fn emit(level: Level, caller: &Location<'_>, message: &dyn Display) {
    let severity = level.as_str();
    let caller = Caller(caller);
    match level {
        Level::Debug => tracing::debug!(target: TARGET, severity, caller = %caller, "{message}"),
        Level::Info => tracing::info!(target: TARGET, severity, caller = %caller, "{message}"),
        Level::Warn => tracing::warn!(target: TARGET, severity, caller = %caller, "{message}"),
        Level::Error | Level::Panic | Level::Fatal => {
            tracing::error!(target: TARGET, severity, caller = %caller, "{message}")
        }
    }
}

#[track_caller]
pub(crate) fn escalate_panic(message: &dyn Display) -> ! {
    panic!("{message}")
}

pub(crate) fn escalate_fatal() -> ! {
    std::process::exit(1)
}
