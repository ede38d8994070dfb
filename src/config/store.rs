//! The configuration store: one optional document plus typed accessors.

use std::path::Path;
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use serde::de::DeserializeOwned;
use toml::{Table, Value};

use crate::error::ConfigError;

use super::document::Document;
use super::parse::{self, parse_or_default};

/// Holds the currently loaded [`Document`], if any.
///
/// Every getter succeeds in every state: an unloaded store, a missing
/// section or key, and an unparseable value all yield the type's zero value.
/// Only the unmarshal operations report [`ConfigError::NotInitialized`].
///
/// The document sits behind an [`ArcSwapOption`], so `load` may race with
/// readers; each read sees either the old or the new document, never a mix.
#[derive(Default)]
pub struct ConfigStore {
    document: ArcSwapOption<Document>,
}

impl ConfigStore {
    /// An uninitialized store.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store already holding `document`.
    pub fn with_document(document: Document) -> Self {
        Self {
            document: ArcSwapOption::from_pointee(document),
        }
    }

    /// Read and parse the document at `path`.
    ///
    /// On failure any previously loaded document is dropped and the store
    /// returns to the uninitialized state.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        match Document::from_path(path) {
            Ok(document) => {
                tracing::debug!(
                    path = %path.display(),
                    sections = document.sections().count(),
                    "config loaded"
                );
                self.document.store(Some(Arc::new(document)));
                Ok(())
            }
            Err(source) => {
                tracing::warn!(path = %path.display(), error = %source, "config load failed");
                self.document.store(None);
                Err(ConfigError::Load {
                    path: path.to_path_buf(),
                    source,
                })
            }
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.document.load().is_some()
    }

    /// Shared handle to the loaded document, for lookups the getters don't cover.
    pub fn raw_document(&self) -> Option<Arc<Document>> {
        self.document.load_full()
    }

    fn lookup<T, F>(&self, section: &str, key: &str, parser: F) -> T
    where
        T: Default,
        F: FnOnce(&str) -> Option<T>,
    {
        let guard = self.document.load();
        parse_or_default(guard.as_deref().and_then(|doc| doc.get(section, key)), parser)
    }

    pub fn get_string(&self, section: &str, key: &str) -> String {
        self.lookup(section, key, |raw| Some(raw.to_owned()))
    }

    /// A value outside the `i32` range counts as unparseable and yields 0;
    /// it is never truncated.
    pub fn get_i32(&self, section: &str, key: &str) -> i32 {
        self.lookup(section, key, parse::parse_i32)
    }

    pub fn get_i64(&self, section: &str, key: &str) -> i64 {
        self.lookup(section, key, parse::parse_i64)
    }

    pub fn get_f64(&self, section: &str, key: &str) -> f64 {
        self.lookup(section, key, parse::parse_f64)
    }

    pub fn get_bool(&self, section: &str, key: &str) -> bool {
        self.lookup(section, key, parse::parse_bool)
    }

    /// Split the raw value on `sep`. An absent value still yields `[""]`.
    pub fn get_string_list(&self, section: &str, key: &str, sep: &str) -> Vec<String> {
        parse::split_list(&self.get_string(section, key), sep)
    }

    /// Split then parse each field as an integer; bad fields are dropped.
    pub fn get_i64_list(&self, section: &str, key: &str, sep: &str) -> Vec<i64> {
        parse::parse_list(&self.get_string(section, key), sep, parse::parse_i64)
    }

    pub fn get_f64_list(&self, section: &str, key: &str, sep: &str) -> Vec<f64> {
        parse::parse_list(&self.get_string(section, key), sep, parse::parse_f64)
    }

    /// Deserialize the whole document into `T`.
    pub fn unmarshal<T: DeserializeOwned>(&self) -> Result<T, ConfigError> {
        let document = self.raw_document().ok_or(ConfigError::NotInitialized)?;
        deserialize(document.root().clone())
    }

    /// Deserialize one section into `T`. An absent section deserializes as an
    /// empty table.
    pub fn unmarshal_section<T: DeserializeOwned>(&self, section: &str) -> Result<T, ConfigError> {
        let document = self.raw_document().ok_or(ConfigError::NotInitialized)?;
        deserialize(document.section_table(section))
    }

    /// Like [`Self::unmarshal`], writing into `target`. `target` is left as-is on error.
    pub fn unmarshal_into<T: DeserializeOwned>(&self, target: &mut T) -> Result<(), ConfigError> {
        *target = self.unmarshal()?;
        Ok(())
    }

    pub fn unmarshal_section_into<T: DeserializeOwned>(
        &self,
        section: &str,
        target: &mut T,
    ) -> Result<(), ConfigError> {
        *target = self.unmarshal_section(section)?;
        Ok(())
    }
}

fn deserialize<T: DeserializeOwned>(table: Table) -> Result<T, ConfigError> {
    Ok(Value::Table(table).try_into()?)
}
