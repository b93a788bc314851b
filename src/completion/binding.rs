//! Resource type bindings
//!
//! A dynamic schema segment names a resource type tag. The binding table maps
//! each tag to the collection that backs it and to how its records are
//! filtered and displayed.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::store::Resource;

/// Membership predicate applied to a collection before search filtering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Predicate {
    /// Keep records whose `field` equals `value`
    FieldEquals { field: String, value: Value },
}

impl Predicate {
    /// Shorthand for [`Predicate::FieldEquals`]
    pub fn field_equals(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Predicate::FieldEquals {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Check if a record satisfies the predicate
    pub fn matches(&self, resource: &Resource) -> bool {
        match self {
            Predicate::FieldEquals { field, value } => {
                resource.value(field).is_some_and(|actual| actual.as_ref() == value)
            }
        }
    }
}

/// How one dynamic tag is resolved against the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceTypeBinding {
    /// Backing collection name
    pub collection: String,

    /// Optional membership predicate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<Predicate>,

    /// Attribute used as display text and for search filtering
    pub display_field: String,

    /// Decorative glyph shown before the record id
    pub glyph: String,
}

impl ResourceTypeBinding {
    pub fn new(
        collection: impl Into<String>,
        display_field: impl Into<String>,
        glyph: impl Into<String>,
    ) -> Self {
        Self {
            collection: collection.into(),
            filter: None,
            display_field: display_field.into(),
            glyph: glyph.into(),
        }
    }

    /// Builder-style predicate setter
    pub fn with_filter(mut self, filter: Predicate) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Check if a record belongs to this resource type
    pub fn admits(&self, resource: &Resource) -> bool {
        self.filter.as_ref().is_none_or(|filter| filter.matches(resource))
    }
}

/// Tag to binding table, in declaration order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BindingTable {
    bindings: IndexMap<String, ResourceTypeBinding>,
}

impl BindingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bindings for the built-in navigation schema
    pub fn builtin() -> Self {
        let mut table = Self::new();
        table.insert("cards", ResourceTypeBinding::new("cards", "title", "📄"));
        table.insert(
            "drafts",
            ResourceTypeBinding::new("cards", "title", "✏️")
                .with_filter(Predicate::field_equals("type", "draft")),
        );
        table.insert("schemas", ResourceTypeBinding::new("schemas", "name", "📐"));
        table.insert("tags", ResourceTypeBinding::new("tags", "name", "🏷️"));
        table.insert(
            "collections",
            ResourceTypeBinding::new("collections", "name", "📁"),
        );
        table.insert("agents", ResourceTypeBinding::new("agents", "name", "🤖"));
        table.insert(
            "sources",
            ResourceTypeBinding::new("scheduler-sources", "name", "📥"),
        );
        table.insert(
            "queries",
            ResourceTypeBinding::new("scheduler-queries", "name", "🔄"),
        );
        table.insert(
            "outputs",
            ResourceTypeBinding::new("scheduler-outputs", "name", "📤"),
        );
        table.insert(
            "cleanups",
            ResourceTypeBinding::new("scheduler-cleanups", "name", "🧹"),
        );
        table.insert(
            "integrations",
            ResourceTypeBinding::new("integrations", "name", "🔌"),
        );
        table.insert(
            "subscriptions",
            ResourceTypeBinding::new("subscriptions", "name", "📡"),
        );
        table.insert(
            "organizations",
            ResourceTypeBinding::new("organizations", "name", "🏢"),
        );
        table
    }

    /// Insert or replace the binding for `tag`
    pub fn insert(&mut self, tag: impl Into<String>, binding: ResourceTypeBinding) {
        self.bindings.insert(tag.into(), binding);
    }

    pub fn get(&self, tag: &str) -> Option<&ResourceTypeBinding> {
        self.bindings.get(tag)
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.bindings.contains_key(tag)
    }

    /// Merge `other` over this table; its bindings win
    pub fn extend(&mut self, other: BindingTable) {
        self.bindings.extend(other.bindings);
    }

    /// Distinct backing collection names, first use first
    pub fn collection_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for binding in self.bindings.values() {
            if !names.contains(&binding.collection) {
                names.push(binding.collection.clone());
            }
        }
        names
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ResourceTypeBinding)> {
        self.bindings.iter().map(|(tag, binding)| (tag.as_str(), binding))
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
