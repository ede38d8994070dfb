//! Process-wide config functions, exercised end to end through temp files.

use std::io::Write;
use std::sync::Mutex;

use serde::Deserialize;
use tempfile::NamedTempFile;
use zkit::config;
use zkit::error::ConfigError;

// The free functions share one store; tests touching it run one at a time.
static SERIAL: Mutex<()> = Mutex::new(());

const DOC: &str = r#"
app = "orders"

[s]
n = "42"
bad = "abc"
csv = "1,2,,3"
on = "Yes"
off = "no"
odd = "maybe"

[db]
host = "db.internal"
port = 5432
pool = { max = 16 }
"#;

fn write_toml(content: &str) -> NamedTempFile {
    let mut f = NamedTempFile::new().unwrap();
    f.write_all(content.as_bytes()).unwrap();
    f
}

#[derive(Debug, Deserialize, PartialEq)]
struct Pool {
    max: u32,
}

#[derive(Debug, Deserialize, PartialEq)]
struct Db {
    host: String,
    port: u16,
    pool: Pool,
}

#[test]
fn global_store_lifecycle() {
    let _serial = SERIAL.lock().unwrap_or_else(|e| e.into_inner());

    // never loaded in this process yet
    assert_eq!(config::get_string("s", "n"), "");
    assert_eq!(config::get_i32("s", "n"), 0);
    assert_eq!(config::get_i64("s", "n"), 0);
    assert_eq!(config::get_f64("s", "n"), 0.0);
    assert!(!config::get_bool("s", "n"));
    assert_eq!(config::get_string_list("s", "n", ","), vec![""]);
    assert!(config::raw_document().is_none());
    assert!(matches!(config::unmarshal::<toml::Table>(), Err(ConfigError::NotInitialized)));

    let f = write_toml(DOC);
    config::load(f.path()).unwrap();

    assert_eq!(config::get_i32("s", "n"), 42);
    assert_eq!(config::get_i64("s", "n"), 42);
    assert_eq!(config::get_i32("s", "bad"), 0);
    assert_eq!(config::get_string("s", "bad"), "abc");
    assert_eq!(config::get_string_list("s", "csv", ","), vec!["1", "2", "", "3"]);
    assert_eq!(config::get_i64_list("s", "csv", ","), vec![1, 2, 3]);
    assert_eq!(config::get_f64_list("s", "csv", ","), vec![1.0, 2.0, 3.0]);
    assert!(config::get_bool("s", "on"));
    assert!(!config::get_bool("s", "off"));
    assert!(!config::get_bool("s", "odd"));
    assert_eq!(config::get_string("", "app"), "orders");
    assert_eq!(config::get_i64("db.pool", "max"), 16);

    let db: Db = config::unmarshal_section("db").unwrap();
    assert_eq!(db.host, "db.internal");
    assert_eq!(db.pool, Pool { max: 16 });

    let mut pool = Pool { max: 0 };
    config::unmarshal_section_into("db.pool", &mut pool).unwrap();
    assert_eq!(pool.max, 16);

    let doc = config::raw_document().unwrap();
    assert!(doc.has_section("db"));

    // a failed load wipes the earlier document
    let err = config::load("/nonexistent/zkit/config.toml").unwrap_err();
    assert!(matches!(err, ConfigError::Load { .. }));
    assert_eq!(config::get_i32("s", "n"), 0);
    assert_eq!(config::get_string_list("s", "csv", ","), vec![""]);
    assert!(matches!(config::unmarshal::<toml::Table>(), Err(ConfigError::NotInitialized)));
    assert!(matches!(
        config::unmarshal_into(&mut pool),
        Err(ConfigError::NotInitialized)
    ));
    assert!(config::raw_document().is_none());
}

#[test]
fn isolated_stores_do_not_share_state() {
    let f = write_toml(DOC);
    let a = zkit::ConfigStore::new();
    let b = zkit::ConfigStore::new();
    a.load(f.path()).unwrap();
    assert_eq!(a.get_i64("db", "port"), 5432);
    assert_eq!(b.get_i64("db", "port"), 0);
}

#[test]
fn bool_token_table() {
    let f = write_toml(
        r#"
[b]
t1 = "true"
t2 = "1"
t3 = "yes"
t4 = "TRUE"
t5 = "Yes"
f1 = "false"
f2 = "0"
f3 = "no"
f4 = "NO"
x1 = "enabled"
x2 = ""
"#,
    );
    let store = zkit::ConfigStore::new();
    store.load(f.path()).unwrap();
    for key in ["t1", "t2", "t3", "t4", "t5"] {
        assert!(store.get_bool("b", key), "{key} should be true");
    }
    for key in ["f1", "f2", "f3", "f4", "x1", "x2", "missing"] {
        assert!(!store.get_bool("b", key), "{key} should be false");
    }
}
