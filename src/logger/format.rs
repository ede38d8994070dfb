//! Console-style record layout:
//!
//! ```text
//! 2024-03-05T06:07:08.009+0000	WARN	src/server.rs:42	disk almost full	free_mb=12
//! ```
//!
//! Timestamp, level label, call site and message are tab separated; any other
//! event fields follow as `name=value`.

use std::fmt;
use std::panic::Location;

use chrono::Local;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

pub(crate) const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f%z";

/// Event field carrying the facade's level label (tracing has no PANIC/FATAL).
pub(crate) const SEVERITY_FIELD: &str = "severity";
/// Event field carrying the caller's `file:line`.
pub(crate) const CALLER_FIELD: &str = "caller";

#[derive(Debug, Default, Clone, Copy)]
pub struct RecordFormat;

impl<S, N> FormatEvent<S, N> for RecordFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let meta = event.metadata();
        let mut record = RecordFields::default();
        event.record(&mut record);

        write!(writer, "{}\t", Local::now().format(TIMESTAMP_FORMAT))?;
        match &record.severity {
            Some(label) => write!(writer, "{label}\t")?,
            None => write!(writer, "{}\t", meta.level())?,
        }
        match (&record.caller, meta.file(), meta.line()) {
            (Some(caller), _, _) => write!(writer, "{caller}\t")?,
            (None, Some(file), Some(line)) => write!(writer, "{}:{line}\t", short_path(file))?,
            _ => {}
        }
        write!(writer, "{}", record.message)?;
        for (name, value) in &record.fields {
            write!(writer, "\t{name}={value}")?;
        }
        writeln!(writer)
    }
}

#[derive(Default)]
struct RecordFields {
    severity: Option<String>,
    caller: Option<String>,
    message: String,
    fields: Vec<(&'static str, String)>,
}

impl RecordFields {
    fn put(&mut self, field: &Field, value: String) {
        match field.name() {
            "message" => self.message = value,
            SEVERITY_FIELD => self.severity = Some(value),
            CALLER_FIELD => self.caller = Some(value),
            name => self.fields.push((name, value)),
        }
    }
}

impl Visit for RecordFields {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.put(field, value.to_owned());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.put(field, format!("{value:?}"));
    }
}

/// Call site rendered as `dir/file.rs:line`.
pub(crate) struct Caller<'a>(pub &'a Location<'a>);

impl fmt::Display for Caller<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", short_path(self.0.file()), self.0.line())
    }
}

/// Keep only the last directory and the file name.
pub(crate) fn short_path(file: &str) -> &str {
    let mut seps = file.rmatch_indices(|c: char| c == '/' || c == '\\');
    match (seps.next(), seps.next()) {
        (Some(_), Some((idx, _))) => &file[idx + 1..],
        _ => file,
    }
}
