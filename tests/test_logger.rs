//! Process-wide logger: installation, level filtering and re-initialisation.

use std::fs;
use std::panic::catch_unwind;

use tempfile::TempDir;
use zkit::logger;
use zkit::{Level, LogError};

fn read(path: &std::path::Path) -> String {
    logger::flush().unwrap();
    fs::read_to_string(path).unwrap_or_default()
}

// Single test: the active logger is process-wide.
#[test]
fn global_logger_lifecycle() {
    let dir = TempDir::new().unwrap();

    // before init: nothing installed, emission is harmless
    assert!(logger::active().is_none());
    zkit::info!("before init");
    logger::flush().unwrap();

    let warn_log = dir.path().join("warn.log");
    logger::init_logger(&warn_log, "warn").unwrap();
    assert_eq!(logger::active().unwrap().min_level(), Level::Warn);
    assert!(warn_log.exists());

    zkit::debug!("debug record");
    zkit::info!("info record");
    zkit::warn!("disk usage", 91, "%");
    let warn_line = line!() - 1;
    zkit::errorf!("upstream {} unreachable after {} tries", "db-1", 3);

    let text = read(&warn_log);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2, "unexpected records:\n{text}");
    assert!(!text.contains("debug record"));
    assert!(!text.contains("info record"));

    let fields: Vec<&str> = lines[0].split('\t').collect();
    assert_eq!(fields[1], "WARN");
    assert_eq!(fields[2], format!("tests/test_logger.rs:{warn_line}"));
    assert_eq!(fields[3], "disk usage 91 %");
    assert!(lines[1].contains("\tERROR\t"));
    assert!(lines[1].ends_with("upstream db-1 unreachable after 3 tries"));

    // re-init replaces the logger; an unknown level means info
    let info_log = dir.path().join("info.log");
    logger::init_logger(&info_log, "verbose").unwrap();
    assert_eq!(logger::active().unwrap().min_level(), Level::Info);
    logger::debug("still hidden");
    logger::info("now visible");
    logger::infof(format_args!("{}-{}", "a", 1));

    let text = read(&info_log);
    assert!(!text.contains("still hidden"));
    assert!(text.contains("\tINFO\t"));
    assert!(text.contains("now visible"));
    assert!(text.contains("a-1"));
    assert!(!read(&warn_log).contains("now visible"));

    // panic writes, flushes, then unwinds
    let result = catch_unwind(|| {
        zkit::log_panicf!("bad state {}", 42);
    });
    assert!(result.is_err());
    let text = read(&info_log);
    assert!(text.contains("\tPANIC\t"));
    assert!(text.contains("bad state 42"));

    // a failed init keeps the previous logger
    let blocker = dir.path().join("not-a-dir");
    fs::write(&blocker, "x").unwrap();
    let err = logger::init_logger(blocker.join("app.log"), "debug").unwrap_err();
    assert!(matches!(err, LogError::Sink { .. }));
    assert_eq!(logger::active().unwrap().path(), info_log);
}

#[test]
fn settings_from_config_section() {
    let dir = TempDir::new().unwrap();
    let log_path = dir.path().join("svc.log");
    let doc = format!(
        "[log]\npath = {:?}\nlevel = \"error\"\nmax_backups = 2\n",
        log_path.to_string_lossy()
    );
    let store = zkit::ConfigStore::with_document(zkit::config::Document::parse(&doc).unwrap());

    let settings = zkit::LogSettings::from_store(&store, "log");
    assert_eq!(settings.path, log_path);
    assert_eq!(settings.rotation.max_backups, 2);

    let log = zkit::Logger::from_settings(&settings).unwrap();
    log.warn("dropped");
    log.error("kept");
    log.flush().unwrap();
    let text = fs::read_to_string(&log_path).unwrap();
    assert!(!text.contains("dropped"));
    assert!(text.contains("kept"));
}
