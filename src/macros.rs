//! Macro substitution for user-facing text fields
//!
//! Templated fields (`url`, `hover_url`, `label_text`) may reference entity
//! attributes through bracketed tokens such as `[host_name]` or `[output]`.
//! Each field is resolved against a [`MacroTable`] built for the entity's
//! object type.
//!
//! A token is replaced at its first occurrence only. A field that mentions
//! the same token twice keeps the second occurrence literally:
//!
//! ```rust
//! use status_map::macros::MacroTable;
//!
//! let mut table = MacroTable::new();
//! table.insert("host_name", Some("web01"));
//! assert_eq!(table.apply("[host_name]/[host_name]"), "web01/[host_name]");
//! ```

use crate::entity::EntityConfig;
use crate::object::ObjectType;

/// Ordered token to value table
///
/// Entries are applied in insertion order, so a value that itself contains a
/// token can be picked up by a later entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MacroTable {
    entries: Vec<(String, String)>,
}

impl MacroTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `[name]`; a missing value resolves to empty text
    pub fn insert(&mut self, name: &str, value: Option<&str>) {
        self.entries
            .push((format!("[{}]", name), value.unwrap_or_default().to_string()));
    }

    /// Look up the value registered for a token name
    pub fn get(&self, name: &str) -> Option<&str> {
        let token = format!("[{}]", name);
        self.entries
            .iter()
            .find(|(t, _)| *t == token)
            .map(|(_, v)| v.as_str())
    }

    /// Number of registered tokens
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no tokens are registered
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Substitute the first occurrence of every registered token
    pub fn apply(&self, template: &str) -> String {
        let mut out = template.to_string();
        for (token, value) in &self.entries {
            if let Some(pos) = out.find(token.as_str()) {
                out.replace_range(pos..pos + token.len(), value);
            }
        }
        out
    }
}

/// Table used for `url` and `hover_url`
pub fn link_table(kind: ObjectType, conf: &EntityConfig) -> MacroTable {
    let mut table = MacroTable::new();
    table.insert(kind.name_token(), conf.name.as_deref());
    if kind == ObjectType::Service {
        table.insert("service_description", conf.service_description.as_deref());
    }
    table
}

/// Table used for `label_text`
pub fn label_table(kind: ObjectType, conf: &EntityConfig) -> MacroTable {
    let mut table = MacroTable::new();
    table.insert("name", conf.name.as_deref());
    table.insert("output", conf.output.as_deref());
    if kind.has_perfdata() {
        table.insert("perfdata", conf.perfdata.as_deref());
    }

    // Maps are labelled with their alias instead of the raw map name
    let label_token = kind.label_name_token();
    if kind == ObjectType::Map {
        table.insert(label_token, conf.alias.as_deref());
    } else {
        table.insert(label_token, conf.name.as_deref());
    }

    if kind == ObjectType::Service {
        table.insert("service_description", conf.service_description.as_deref());
    }
    table
}

/// Return a copy of `conf` with all templated fields resolved
///
/// The input snapshot is left untouched so repeated rendering of the same
/// snapshot always yields the same text.
pub fn substitute(kind: ObjectType, conf: &EntityConfig) -> EntityConfig {
    let links = link_table(kind, conf);
    let labels = label_table(kind, conf);

    let mut resolved = conf.clone();
    resolved.url = resolve_field(&links, conf.url.as_deref());
    resolved.hover_url = resolve_field(&links, conf.hover_url.as_deref());
    resolved.label_text = resolve_field(&labels, conf.label_text.as_deref());
    resolved
}

fn resolve_field(table: &MacroTable, field: Option<&str>) -> Option<String> {
    match field {
        Some(text) if !text.is_empty() => Some(table.apply(text)),
        other => other.map(str::to_string),
    }
}
