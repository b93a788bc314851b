//! Resource store: the live collections dynamic completion reads from
//!
//! The completion engine never owns application data. It reads named
//! collections through the [`ResourceStore`] trait, so tests can hand it a
//! fixture snapshot and the terminal front end can hand it whatever the
//! fixture loader produced last.
//!
//! - [`StoreSnapshot`]: immutable map of collection name to records
//! - [`SharedStore`]: refreshable handle with copy-on-read snapshots
//! - [`DirectorySource`]: asynchronous loader for `data/<collection>.json`

mod fixtures;
mod shared;

use std::borrow::Cow;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub use fixtures::{DirectorySource, SnapshotSource, parse_collection, refresh};
pub use shared::{Generation, SharedStore};

/// A single record of a resource collection
///
/// Records are free-form JSON objects; only `id` is required. Everything else
/// is kept as-is so any attribute can serve as a display field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    /// Stable identifier, used as the completion path segment
    pub id: String,

    /// Remaining attributes
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Resource {
    /// Create a record with no attributes besides its id
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fields: Map::new(),
        }
    }

    /// Builder-style attribute setter
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Raw attribute value, `id` included
    pub fn value(&self, name: &str) -> Option<Cow<'_, Value>> {
        if name == "id" {
            return Some(Cow::Owned(Value::String(self.id.clone())));
        }
        self.fields.get(name).map(Cow::Borrowed)
    }

    /// Text shown for this record when `name` is its display field
    ///
    /// Strings are used verbatim, other scalars through their JSON text.
    /// Missing and null attributes have no display text.
    pub fn display_text(&self, name: &str) -> Option<Cow<'_, str>> {
        if name == "id" {
            return Some(Cow::Borrowed(&self.id));
        }
        match self.fields.get(name)? {
            Value::Null => None,
            Value::String(text) => Some(Cow::Borrowed(text)),
            other => Some(Cow::Owned(other.to_string())),
        }
    }
}

/// Read access to named resource collections
///
/// Implementations must behave as an immutable snapshot for the duration of
/// one call into the resolver.
pub trait ResourceStore: Send + Sync {
    /// Records of the named collection in their stored order
    ///
    /// Unknown collections are empty.
    fn collection(&self, name: &str) -> &[Resource];
}

/// Immutable set of collections
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreSnapshot {
    collections: HashMap<String, Vec<Resource>>,
}

impl StoreSnapshot {
    /// Create an empty snapshot
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style collection setter
    pub fn with_collection(mut self, name: impl Into<String>, records: Vec<Resource>) -> Self {
        self.insert(name, records);
        self
    }

    /// Insert or replace a collection
    pub fn insert(&mut self, name: impl Into<String>, records: Vec<Resource>) {
        self.collections.insert(name.into(), records);
    }

    /// Names of all collections, sorted
    pub fn collection_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.collections.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Total number of records across collections
    pub fn record_count(&self) -> usize {
        self.collections.values().map(Vec::len).sum()
    }

    /// Check if no collection holds any record
    pub fn is_empty(&self) -> bool {
        self.record_count() == 0
    }
}

impl ResourceStore for StoreSnapshot {
    fn collection(&self, name: &str) -> &[Resource] {
        self.collections.get(name).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_display_text_string_field() {
        let card = Resource::new("c1").with_field("title", "Abstract Notes");
        assert_eq!(card.display_text("title").as_deref(), Some("Abstract Notes"));
    }

    #[test]
    fn test_display_text_non_string_field() {
        let collection = Resource::new("col-1").with_field("card_count", 12);
        assert_eq!(collection.display_text("card_count").as_deref(), Some("12"));
    }

    #[test]
    fn test_display_text_missing_and_null() {
        let tag = Resource::new("t1").with_field("name", Value::Null);
        assert_eq!(tag.display_text("name"), None);
        assert_eq!(tag.display_text("color"), None);
    }

    #[test]
    fn test_display_text_id() {
        let agent = Resource::new("agent-7");
        assert_eq!(agent.display_text("id").as_deref(), Some("agent-7"));
    }

    #[test]
    fn test_resource_deserializes_extra_fields() {
        let card: Resource = serde_json::from_value(json!({
            "id": "card-001",
            "title": "Weekly Report",
            "type": "draft"
        }))
        .unwrap();

        assert_eq!(card.id, "card-001");
        assert_eq!(card.value("type").as_deref(), Some(&json!("draft")));
        assert!(!card.fields.contains_key("id"));
    }

    #[test]
    fn test_snapshot_unknown_collection_is_empty() {
        let snapshot = StoreSnapshot::new().with_collection("cards", vec![Resource::new("c1")]);
        assert_eq!(snapshot.collection("cards").len(), 1);
        assert!(snapshot.collection("agents").is_empty());
        assert_eq!(snapshot.record_count(), 1);
        assert_eq!(snapshot.collection_names(), vec!["cards"]);
    }
}
