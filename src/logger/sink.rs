//! Size-rotated log file, backed by `file-rotate`.
//!
//! Once the active file has grown past [`RotationPolicy::max_size`] the next
//! record goes to a fresh file and the old one is moved aside as
//! `<name>.<local timestamp>`. Backups are pruned by count and by age.

use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use file_rotate::compression::Compression;
use file_rotate::suffix::{AppendTimestamp, FileLimit, SuffixScheme, TimestampSuffix};
use file_rotate::{ContentLimit, FileRotate};
use tracing_subscriber::fmt::MakeWriter;

pub const MEGABYTE: u64 = 1024 * 1024;

/// Rollover thresholds. A zero value disables that limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationPolicy {
    /// Bytes the active file may hold before the next record rotates it.
    pub max_size: u64,
    /// Backups kept after rotation, newest first.
    pub max_backups: usize,
    /// Backups older than this are removed.
    pub max_age: Duration,
}

impl Default for RotationPolicy {
    fn default() -> Self {
        Self {
            max_size: MEGABYTE,
            max_backups: 5,
            max_age: Duration::from_secs(30 * 24 * 60 * 60),
        }
    }
}

impl RotationPolicy {
    fn content_limit(&self) -> ContentLimit {
        match usize::try_from(self.max_size) {
            Ok(0) => ContentLimit::None,
            Ok(bytes) => ContentLimit::BytesSurpassed(bytes),
            Err(_) => ContentLimit::None,
        }
    }

    fn count_limit(&self) -> FileLimit {
        match self.max_backups {
            0 => FileLimit::Unlimited,
            n => FileLimit::MaxFiles(n),
        }
    }

    fn age_limit(&self) -> FileLimit {
        match chrono::Duration::from_std(self.max_age) {
            Ok(age) if !self.max_age.is_zero() => FileLimit::Age(age),
            _ => FileLimit::Unlimited,
        }
    }
}

/// Timestamped backups that expire on either limit: too many newer
/// backups, or too old.
struct Retention {
    by_count: AppendTimestamp,
    by_age: AppendTimestamp,
}

impl Retention {
    fn new(policy: &RotationPolicy) -> Self {
        Self {
            by_count: AppendTimestamp::default(policy.count_limit()),
            by_age: AppendTimestamp::default(policy.age_limit()),
        }
    }
}

impl SuffixScheme for Retention {
    type Repr = TimestampSuffix;

    fn rotate_file(
        &mut self,
        basepath: &Path,
        newest_suffix: Option<&TimestampSuffix>,
        suffix: &Option<TimestampSuffix>,
    ) -> io::Result<TimestampSuffix> {
        self.by_count.rotate_file(basepath, newest_suffix, suffix)
    }

    fn parse(&self, suffix: &str) -> Option<TimestampSuffix> {
        self.by_count.parse(suffix)
    }

    fn too_old(&self, suffix: &TimestampSuffix, file_number: usize) -> bool {
        self.by_count.too_old(suffix, file_number) || self.by_age.too_old(suffix, file_number)
    }
}

type RotatingFile = FileRotate<Retention>;

/// Cloneable, thread-safe handle to the rotating log file; the writer handed
/// to the tracing formatter.
#[derive(Clone)]
pub struct SharedSink {
    path: PathBuf,
    file: Arc<Mutex<RotatingFile>>,
}

impl SharedSink {
    /// Open (or create) the file at `path` in append mode, creating missing
    /// parent directories.
    ///
    /// The file is opened once up front so an unwritable path is reported
    /// here rather than dropped on the first record.
    pub fn open(path: impl Into<PathBuf>, policy: RotationPolicy) -> io::Result<Self> {
        let path = path.into();
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        OpenOptions::new().create(true).append(true).open(&path)?;

        let file = FileRotate::new(
            &path,
            Retention::new(&policy),
            policy.content_limit(),
            Compression::None,
            #[cfg(unix)]
            None,
        );
        Ok(Self {
            path,
            file: Arc::new(Mutex::new(file)),
        })
    }

    pub fn flush(&self) -> io::Result<()> {
        self.lock().flush()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> MutexGuard<'_, RotatingFile> {
        self.file.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for SharedSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedSink").field("path", &self.path).finish()
    }
}

/// Exclusive write access to the sink for one record.
pub struct SinkWriter<'a>(MutexGuard<'a, RotatingFile>);

impl Write for SinkWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0.flush()
    }
}

impl<'a> MakeWriter<'a> for SharedSink {
    type Writer = SinkWriter<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        SinkWriter(self.lock())
    }
}
