//! Parsed configuration document: named sections of string-valued keys.
//!
//! The on-disk format is TOML. Each table is a section and each scalar in it
//! is a key; nested tables (inline or not) become dotted child sections
//! (`[db.replica]` is section `"db.replica"`). Top-level scalars live in
//! [`DEFAULT_SECTION`].
//!
//! Values keep the text they were written with: `0x10`, `1_000` and `1.0`
//! come back exactly so, and are only interpreted by the typed getters.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use toml::{Table, Value};
use toml_edit::{DocumentMut, Item};

use crate::error::DocumentError;

/// Name of the section holding top-level keys. `""` is accepted as an alias.
pub const DEFAULT_SECTION: &str = "DEFAULT";

/// One named group of keys. Values are kept in their raw string form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Section {
    name: String,
    keys: BTreeMap<String, String>,
    table: Table,
}

impl Section {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw string value for `key`, if present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.keys.get(key).map(String::as_str)
    }

    pub fn has_key(&self, key: &str) -> bool {
        self.keys.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keys.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.keys.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// The typed TOML table this section was built from.
    pub fn table(&self) -> &Table {
        &self.table
    }
}

/// A loaded configuration document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    sections: BTreeMap<String, Section>,
    root: Table,
}

impl Document {
    /// Parse a document from TOML text.
    pub fn parse(source: &str) -> Result<Self, DocumentError> {
        let root: Table = toml::from_str(source)?;
        let layout: DocumentMut = source.parse()?;

        let mut sections = BTreeMap::new();
        collect_sections(DEFAULT_SECTION, layout.as_table(), &root, true, &mut sections);
        Ok(Self { sections, root })
    }

    /// Read and parse the document at `path`.
    pub fn from_path(path: &Path) -> Result<Self, DocumentError> {
        let raw = fs::read_to_string(path)?;
        Self::parse(&raw)
    }

    /// Look up a section. Missing sections return `None`.
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.get(normalize(name))
    }

    pub fn has_section(&self, name: &str) -> bool {
        self.sections.contains_key(normalize(name))
    }

    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.sections.values()
    }

    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }

    /// Raw string value of `key` in `section`.
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.section(section).and_then(|s| s.get(key))
    }

    /// The whole document as a typed TOML table.
    pub fn root(&self) -> &Table {
        &self.root
    }

    /// Typed table for `section`; an absent section yields an empty table.
    pub(crate) fn section_table(&self, name: &str) -> Table {
        self.section(name).map(|s| s.table.clone()).unwrap_or_default()
    }
}

fn normalize(name: &str) -> &str {
    if name.is_empty() { DEFAULT_SECTION } else { name }
}

/// Walk the layout tree for key text and the typed tree for unmarshalling,
/// side by side.
fn collect_sections(
    name: &str,
    layout: &toml_edit::Table,
    typed: &Table,
    is_root: bool,
    out: &mut BTreeMap<String, Section>,
) {
    let mut section = Section {
        name: name.to_owned(),
        keys: BTreeMap::new(),
        table: typed.clone(),
    };

    for (key, item) in layout.iter() {
        let child = match item {
            Item::Table(child) => Some(child.clone()),
            Item::Value(toml_edit::Value::InlineTable(inline)) => Some(inline.clone().into_table()),
            Item::Value(value) => {
                if let Some(raw) = raw_text(value) {
                    section.keys.insert(key.to_owned(), raw);
                }
                None
            }
            Item::ArrayOfTables(_) | Item::None => None,
        };

        if let Some(child) = child {
            let child_name = if is_root {
                key.to_owned()
            } else {
                format!("{name}.{key}")
            };
            let child_typed = typed
                .get(key)
                .and_then(Value::as_table)
                .cloned()
                .unwrap_or_default();
            collect_sections(&child_name, &child, &child_typed, false, out);
        }
    }

    // An explicit `[DEFAULT]` table was collected during the walk; its keys
    // win over top-level scalars with the same name.
    if let Some(existing) = out.get_mut(name) {
        for (key, raw) in section.keys {
            existing.keys.entry(key).or_insert(raw);
        }
        return;
    }
    out.insert(name.to_owned(), section);
}

/// Value text as written in the source. Strings lose their quotes; arrays
/// join their elements with `,`. Inline tables (and arrays holding them)
/// have none.
fn raw_text(value: &toml_edit::Value) -> Option<String> {
    use toml_edit::Value as V;

    match value {
        V::String(s) => Some(s.value().clone()),
        V::Integer(i) => Some(i.display_repr().into_owned()),
        V::Float(f) => Some(f.display_repr().into_owned()),
        V::Boolean(b) => Some(b.display_repr().into_owned()),
        V::Datetime(d) => Some(d.display_repr().into_owned()),
        V::Array(items) => items
            .iter()
            .map(raw_text)
            .collect::<Option<Vec<_>>>()
            .map(|fields| fields.join(",")),
        V::InlineTable(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
name = "svc"
debug = true

[server]
port = 8080
host = "0.0.0.0"
ratio = 0.75
tags = ["a", "b", 3]

[server.tls]
enabled = false

[[upstreams]]
addr = "10.0.0.1"
"#;

    #[test]
    fn top_level_keys_live_in_default_section() {
        let doc = Document::parse(SAMPLE).unwrap();
        assert_eq!(doc.get(DEFAULT_SECTION, "name"), Some("svc"));
        assert_eq!(doc.get("", "debug"), Some("true"));
    }

    #[test]
    fn scalars_render_as_raw_strings() {
        let doc = Document::parse(SAMPLE).unwrap();
        assert_eq!(doc.get("server", "port"), Some("8080"));
        assert_eq!(doc.get("server", "host"), Some("0.0.0.0"));
        assert_eq!(doc.get("server", "ratio"), Some("0.75"));
        assert_eq!(doc.get("server", "tags"), Some("a,b,3"));
    }

    #[test]
    fn numeric_text_is_kept_verbatim() {
        let doc = Document::parse(
            "[s]\nratio = 1.0\nhex = 0x10\nbig = 1_000\nexp = 1e3\nwhen = 1979-05-27T07:32:00Z\nmix = [ 0x1 , 2.0 ]\n",
        )
        .unwrap();
        assert_eq!(doc.get("s", "ratio"), Some("1.0"));
        assert_eq!(doc.get("s", "hex"), Some("0x10"));
        assert_eq!(doc.get("s", "big"), Some("1_000"));
        assert_eq!(doc.get("s", "exp"), Some("1e3"));
        assert_eq!(doc.get("s", "when"), Some("1979-05-27T07:32:00Z"));
        assert_eq!(doc.get("s", "mix"), Some("0x1,2.0"));
        // the typed view still has the interpreted values
        let typed = doc.section("s").unwrap().table();
        assert_eq!(typed.get("hex").and_then(Value::as_integer), Some(16));
        assert_eq!(typed.get("big").and_then(Value::as_integer), Some(1000));
    }

    #[test]
    fn inline_tables_become_dotted_sections() {
        let doc = Document::parse("[db]\nname = \"orders\"\npool = { max = 0x10 }\n").unwrap();
        assert_eq!(doc.get("db.pool", "max"), Some("0x10"));
        assert!(!doc.section("db").unwrap().has_key("pool"));
        assert_eq!(doc.section_table("db.pool").get("max").and_then(Value::as_integer), Some(16));
    }

    #[test]
    fn nested_tables_become_dotted_sections() {
        let doc = Document::parse(SAMPLE).unwrap();
        assert!(doc.has_section("server.tls"));
        assert_eq!(doc.get("server.tls", "enabled"), Some("false"));
        // the child table is not a key of its parent
        assert!(!doc.section("server").unwrap().has_key("tls"));
    }

    #[test]
    fn arrays_of_tables_are_not_keys() {
        let doc = Document::parse(SAMPLE).unwrap();
        assert_eq!(doc.get(DEFAULT_SECTION, "upstreams"), None);
    }

    #[test]
    fn missing_lookups_are_none() {
        let doc = Document::parse(SAMPLE).unwrap();
        assert!(doc.section("nope").is_none());
        assert_eq!(doc.get("server", "nope"), None);
        assert_eq!(doc.get("nope", "port"), None);
        assert!(doc.section_table("nope").is_empty());
    }

    #[test]
    fn explicit_default_table_merges() {
        let doc = Document::parse("a = \"top\"\nb = \"top\"\n[DEFAULT]\nb = \"explicit\"\n").unwrap();
        assert_eq!(doc.get("", "a"), Some("top"));
        assert_eq!(doc.get("", "b"), Some("explicit"));
    }

    #[test]
    fn section_iteration() {
        let doc = Document::parse(SAMPLE).unwrap();
        let names: Vec<&str> = doc.section_names().collect();
        assert_eq!(names, vec![DEFAULT_SECTION, "server", "server.tls"]);
        let server = doc.section("server").unwrap();
        assert_eq!(server.len(), 4);
        assert_eq!(server.keys().collect::<Vec<_>>(), vec!["host", "port", "ratio", "tags"]);
    }

    #[test]
    fn parse_error_surfaces() {
        assert!(matches!(
            Document::parse("[unterminated"),
            Err(DocumentError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        assert!(matches!(
            Document::from_path(Path::new("/nonexistent/zkit.toml")),
            Err(DocumentError::Io(_))
        ));
    }
}
