//! Leveled file logging behind one process-wide logger.
//!
//! Call [`init_logger`] once at startup, then emit records with the level
//! functions or the matching macros:
//!
//! ```no_run
//! zkit::logger::init_logger("logs/app.log", "warn")?;
//! zkit::warn!("disk usage", 91, "%");
//! zkit::errorf!("upstream {} unreachable after {} tries", "db-1", 3);
//! # Ok::<(), zkit::error::LogError>(())
//! ```
//!
//! Records carry an ISO-8601 timestamp, a capitalized level, the caller's
//! `file:line` and the message. `log_panic!`/`panic` unwind after writing;
//! `fatal!`/`fatal` exit the process with status 1.
//!
//! Before `init_logger` the records go to whatever tracing subscriber the
//! host installed globally (none means they are discarded). The escalating
//! levels escalate either way.
//!
//! # Module layout
//!
//! - **level** — [`Level`] and name resolution.
//! - **sink** — [`SharedSink`], the size-rotated file writer (`file-rotate`).
//! - **format** — the tracing event formatter producing the record line.
//! - **handle** — [`Logger`], one configured instance.
//! - **settings** — [`LogSettings`], optionally read from a config section.

mod format;
mod handle;
mod level;
mod settings;
pub mod sink;

use std::fmt::{self, Display};
use std::io;
use std::panic::Location;
use std::path::Path;
use std::sync::{Arc, LazyLock};

use arc_swap::ArcSwapOption;

use crate::error::LogError;

pub use handle::Logger;
pub use level::Level;
pub use settings::{LEVEL_ENV, LogSettings, PATH_ENV};
pub use sink::{RotationPolicy, SharedSink};

static ACTIVE: LazyLock<ArcSwapOption<Logger>> = LazyLock::new(ArcSwapOption::empty);

/// Install a logger writing to `path` at `level`, replacing any previous one.
///
/// Unknown level names resolve to `info`. On error the previous logger stays.
pub fn init_logger(path: impl AsRef<Path>, level: &str) -> Result<(), LogError> {
    init_with(&LogSettings::new(path, level))
}

pub fn init_with(settings: &LogSettings) -> Result<(), LogError> {
    let logger = Logger::from_settings(settings)?;
    ACTIVE.store(Some(Arc::new(logger)));
    Ok(())
}

/// The installed logger, if any.
pub fn active() -> Option<Arc<Logger>> {
    ACTIVE.load_full()
}

pub fn flush() -> io::Result<()> {
    match ACTIVE.load().as_deref() {
        Some(logger) => logger.flush(),
        None => Ok(()),
    }
}

fn dispatch_record(level: Level, caller: &Location<'_>, message: &dyn Display) {
    match ACTIVE.load().as_deref() {
        Some(logger) => logger.log(level, caller, message),
        None => handle::emit(level, caller, message),
    }
}

#[track_caller]
pub fn debug(message: impl Display) {
    dispatch_record(Level::Debug, Location::caller(), &message);
}

#[track_caller]
pub fn debugf(args: fmt::Arguments<'_>) {
    dispatch_record(Level::Debug, Location::caller(), &args);
}

#[track_caller]
pub fn info(message: impl Display) {
    dispatch_record(Level::Info, Location::caller(), &message);
}

#[track_caller]
pub fn infof(args: fmt::Arguments<'_>) {
    dispatch_record(Level::Info, Location::caller(), &args);
}

#[track_caller]
pub fn warn(message: impl Display) {
    dispatch_record(Level::Warn, Location::caller(), &message);
}

#[track_caller]
pub fn warnf(args: fmt::Arguments<'_>) {
    dispatch_record(Level::Warn, Location::caller(), &args);
}

#[track_caller]
pub fn error(message: impl Display) {
    dispatch_record(Level::Error, Location::caller(), &message);
}

#[track_caller]
pub fn errorf(args: fmt::Arguments<'_>) {
    dispatch_record(Level::Error, Location::caller(), &args);
}

/// Write a `PANIC` record, then panic with the same message. Never returns.
#[track_caller]
pub fn panic(message: impl Display) -> ! {
    dispatch_record(Level::Panic, Location::caller(), &message);
    handle::escalate_panic(&message)
}

#[track_caller]
pub fn panicf(args: fmt::Arguments<'_>) -> ! {
    dispatch_record(Level::Panic, Location::caller(), &args);
    handle::escalate_panic(&args)
}

/// Write a `FATAL` record, then exit the process with status 1. Never returns.
#[track_caller]
pub fn fatal(message: impl Display) -> ! {
    dispatch_record(Level::Fatal, Location::caller(), &message);
    handle::escalate_fatal()
}

#[track_caller]
pub fn fatalf(args: fmt::Arguments<'_>) -> ! {
    dispatch_record(Level::Fatal, Location::caller(), &args);
    handle::escalate_fatal()
}

/// Space-joined display of several values; what the non-template macros log.
pub struct Values<'a>(pub &'a [&'a dyn Display]);

impl Display for Values<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, value) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{value}")?;
        }
        Ok(())
    }
}

/// `debug!(a, b, ..)` logs the values joined by spaces.
#[macro_export]
macro_rules! debug {
    ($($value:expr),+ $(,)?) => {
        $crate::logger::debug($crate::logger::Values(&[$(&$value as &dyn ::core::fmt::Display),+]))
    };
}

/// `debugf!("template {}", x)` logs a formatted message.
#[macro_export]
macro_rules! debugf {
    ($($arg:tt)+) => {
        $crate::logger::debugf(::core::format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! info {
    ($($value:expr),+ $(,)?) => {
        $crate::logger::info($crate::logger::Values(&[$(&$value as &dyn ::core::fmt::Display),+]))
    };
}

#[macro_export]
macro_rules! infof {
    ($($arg:tt)+) => {
        $crate::logger::infof(::core::format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! warn {
    ($($value:expr),+ $(,)?) => {
        $crate::logger::warn($crate::logger::Values(&[$(&$value as &dyn ::core::fmt::Display),+]))
    };
}

#[macro_export]
macro_rules! warnf {
    ($($arg:tt)+) => {
        $crate::logger::warnf(::core::format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! error {
    ($($value:expr),+ $(,)?) => {
        $crate::logger::error($crate::logger::Values(&[$(&$value as &dyn ::core::fmt::Display),+]))
    };
}

#[macro_export]
macro_rules! errorf {
    ($($arg:tt)+) => {
        $crate::logger::errorf(::core::format_args!($($arg)+))
    };
}

/// Logs at `PANIC`, then panics.
#[macro_export]
macro_rules! log_panic {
    ($($value:expr),+ $(,)?) => {
        $crate::logger::panic($crate::logger::Values(&[$(&$value as &dyn ::core::fmt::Display),+]))
    };
}

#[macro_export]
macro_rules! log_panicf {
    ($($arg:tt)+) => {
        $crate::logger::panicf(::core::format_args!($($arg)+))
    };
}

/// Logs at `FATAL`, then exits with status 1.
#[macro_export]
macro_rules! fatal {
    ($($value:expr),+ $(,)?) => {
        $crate::logger::fatal($crate::logger::Values(&[$(&$value as &dyn ::core::fmt::Display),+]))
    };
}

#[macro_export]
macro_rules! fatalf {
    ($($arg:tt)+) => {
        $crate::logger::fatalf(::core::format_args!($($arg)+))
    };
}
