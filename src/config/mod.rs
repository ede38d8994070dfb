//! Section-scoped configuration lookups with safe defaults.
//!
//! Load a document once with [`load`], then read typed values with the
//! `get_*` functions. Reads never fail: before a successful load, or when a
//! key is missing or unparseable, each getter returns its zero value.
//!
//! # Module layout
//!
//! - **document** — the parsed TOML document as sections of values kept as written.
//! - **parse** — integer/float/bool/list parsing and the parse-or-default rule.
//! - **store** — [`ConfigStore`], the owned state object behind the getters.
//!
//! The free functions here operate on one process-wide store. Code that wants
//! isolation (tests, embedded use) constructs its own [`ConfigStore`].

mod document;
pub mod parse;
mod store;

use std::path::Path;
use std::sync::{Arc, LazyLock};

use serde::de::DeserializeOwned;

use crate::error::ConfigError;

pub use document::{DEFAULT_SECTION, Document, Section};
pub use store::ConfigStore;

static GLOBAL: LazyLock<ConfigStore> = LazyLock::new(ConfigStore::new);

/// The process-wide store used by the free functions in this module.
pub fn global() -> &'static ConfigStore {
    &GLOBAL
}

/// Load the process-wide document. A failed load clears any earlier one.
pub fn load(path: impl AsRef<Path>) -> Result<(), ConfigError> {
    GLOBAL.load(path)
}

pub fn get_string(section: &str, key: &str) -> String {
    GLOBAL.get_string(section, key)
}

/// Out-of-range values yield 0, see [`ConfigStore::get_i32`].
pub fn get_i32(section: &str, key: &str) -> i32 {
    GLOBAL.get_i32(section, key)
}

pub fn get_i64(section: &str, key: &str) -> i64 {
    GLOBAL.get_i64(section, key)
}

pub fn get_f64(section: &str, key: &str) -> f64 {
    GLOBAL.get_f64(section, key)
}

pub fn get_bool(section: &str, key: &str) -> bool {
    GLOBAL.get_bool(section, key)
}

pub fn get_string_list(section: &str, key: &str, sep: &str) -> Vec<String> {
    GLOBAL.get_string_list(section, key, sep)
}

pub fn get_i64_list(section: &str, key: &str, sep: &str) -> Vec<i64> {
    GLOBAL.get_i64_list(section, key, sep)
}

pub fn get_f64_list(section: &str, key: &str, sep: &str) -> Vec<f64> {
    GLOBAL.get_f64_list(section, key, sep)
}

pub fn unmarshal<T: DeserializeOwned>() -> Result<T, ConfigError> {
    GLOBAL.unmarshal()
}

pub fn unmarshal_section<T: DeserializeOwned>(section: &str) -> Result<T, ConfigError> {
    GLOBAL.unmarshal_section(section)
}

pub fn unmarshal_into<T: DeserializeOwned>(target: &mut T) -> Result<(), ConfigError> {
    GLOBAL.unmarshal_into(target)
}

pub fn unmarshal_section_into<T: DeserializeOwned>(
    section: &str,
    target: &mut T,
) -> Result<(), ConfigError> {
    GLOBAL.unmarshal_section_into(section, target)
}

pub fn raw_document() -> Option<Arc<Document>> {
    GLOBAL.raw_document()
}
