//! Navigation schema
//!
//! The schema is a tree per namespace prefix. Each node is one of three kinds:
//! a branch with ordered children, a dynamic segment whose matches come from a
//! resource collection, or a terminal path. Keys ending in `/` continue a path;
//! keys without one are usually terminal.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

use super::binding::BindingTable;
use crate::error::SchemaError;

/// Namespace prefix of a command path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Prefix {
    /// `@/` target-context paths
    Target,
    /// `#/` operation paths
    Operation,
}

impl Prefix {
    pub const ALL: [Prefix; 2] = [Prefix::Target, Prefix::Operation];

    /// Literal prefix text
    pub fn as_str(&self) -> &'static str {
        match self {
            Prefix::Target => "@/",
            Prefix::Operation => "#/",
        }
    }

    /// Label of the namespace root
    pub fn label(&self) -> &'static str {
        match self {
            Prefix::Target => "Target Context",
            Prefix::Operation => "Operation",
        }
    }

    /// Split a command token like `@/library/sch` into prefix and raw path
    pub fn split(token: &str) -> Option<(Prefix, &str)> {
        Prefix::ALL.into_iter().find_map(|prefix| {
            token
                .strip_prefix(prefix.as_str())
                .map(|rest| (prefix, rest))
        })
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Prefix {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "@/" => Ok(Prefix::Target),
            "#/" => Ok(Prefix::Operation),
            other => Err(SchemaError::UnknownPrefix(other.to_string())),
        }
    }
}

/// Resolution mode of a segment
#[derive(Debug, Clone, PartialEq)]
pub enum SegmentKind {
    /// Static children in declaration order; empty means dead end
    Branch(IndexMap<String, PathSegment>),
    /// Matches are live records of the resource type with this tag
    Dynamic(String),
    /// Fully resolved path
    Terminal,
}

/// One node of the navigation tree
#[derive(Debug, Clone, PartialEq)]
pub struct PathSegment {
    pub label: String,
    pub kind: SegmentKind,
}

impl PathSegment {
    pub fn branch<K, I>(label: impl Into<String>, children: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, PathSegment)>,
    {
        Self {
            label: label.into(),
            kind: SegmentKind::Branch(
                children
                    .into_iter()
                    .map(|(key, child)| (key.into(), child))
                    .collect(),
            ),
        }
    }

    pub fn dynamic(label: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            kind: SegmentKind::Dynamic(tag.into()),
        }
    }

    pub fn terminal(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            kind: SegmentKind::Terminal,
        }
    }

    /// Children of a branch; other kinds have none
    pub fn children(&self) -> Option<&IndexMap<String, PathSegment>> {
        match &self.kind {
            SegmentKind::Branch(children) => Some(children),
            _ => None,
        }
    }

    /// Child with the exact key
    pub fn child(&self, key: &str) -> Option<&PathSegment> {
        self.children()?.get(key)
    }

    pub fn dynamic_tag(&self) -> Option<&str> {
        match &self.kind {
            SegmentKind::Dynamic(tag) => Some(tag),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.kind, SegmentKind::Terminal)
    }

    /// Short name of the resolution mode
    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            SegmentKind::Branch(_) => "branch",
            SegmentKind::Dynamic(_) => "dynamic",
            SegmentKind::Terminal => "terminal",
        }
    }
}

/// Both namespace trees
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationSchema {
    target: PathSegment,
    operation: PathSegment,
}

impl NavigationSchema {
    /// Create a schema from the two namespace roots
    pub fn new(target: PathSegment, operation: PathSegment) -> Self {
        Self { target, operation }
    }

    /// Root segment of a namespace
    pub fn root(&self, prefix: Prefix) -> &PathSegment {
        match prefix {
            Prefix::Target => &self.target,
            Prefix::Operation => &self.operation,
        }
    }

    /// Root segment for a literal prefix; `None` for anything but `@/` and `#/`
    pub fn root_for(&self, prefix: &str) -> Option<&PathSegment> {
        prefix.parse::<Prefix>().ok().map(|prefix| self.root(prefix))
    }

    /// Check that every dynamic tag has a binding
    ///
    /// # Returns
    /// * `Result<(), SchemaError>` - The first unbound tag found, in
    ///   declaration order
    pub fn validate(&self, bindings: &BindingTable) -> Result<(), SchemaError> {
        for prefix in Prefix::ALL {
            for (path, segment) in self.entries(prefix) {
                if let Some(tag) = segment.dynamic_tag()
                    && !bindings.contains(tag)
                {
                    return Err(SchemaError::UnboundDynamicTag {
                        tag: tag.to_string(),
                        path: format!("{prefix}{path}"),
                    });
                }
            }
        }
        Ok(())
    }

    /// Every reachable prefix-relative path with its segment
    ///
    /// Only keys ending in `/` are descended into, matching how resolution
    /// walks typed segments.
    pub fn entries(&self, prefix: Prefix) -> Vec<(String, &PathSegment)> {
        let mut out = Vec::new();
        collect_entries(self.root(prefix), "", &mut out);
        out
    }

    /// Every reachable prefix-relative path
    pub fn paths(&self, prefix: Prefix) -> Vec<String> {
        self.entries(prefix)
            .into_iter()
            .map(|(path, _)| path)
            .collect()
    }

    /// Load the namespace trees from a JSON document
    ///
    /// The document maps `"@/"` and `"#/"` to nodes of the form
    /// `{ "label", "children"?, "dynamic"?, "final"? }`.
    pub fn from_json(text: &str) -> Result<Self, SchemaError> {
        let namespaces: IndexMap<String, RawNode> =
            serde_json::from_str(text).map_err(|e| SchemaError::InvalidDocument(e.to_string()))?;
        Self::from_namespaces(namespaces)
    }

    fn from_namespaces(namespaces: IndexMap<String, RawNode>) -> Result<Self, SchemaError> {
        let mut target = None;
        let mut operation = None;

        for (key, node) in namespaces {
            let prefix: Prefix = key.parse()?;
            let root = node.into_segment(prefix.as_str())?;
            match prefix {
                Prefix::Target => target = Some(root),
                Prefix::Operation => operation = Some(root),
            }
        }

        Ok(Self {
            target: target.ok_or_else(|| SchemaError::MissingNamespace("@/".to_string()))?,
            operation: operation.ok_or_else(|| SchemaError::MissingNamespace("#/".to_string()))?,
        })
    }

    /// The built-in Symposium navigation tree
    pub fn builtin() -> Self {
        let target = PathSegment::branch(
            Prefix::Target.label(),
            [
                (
                    "library/",
                    PathSegment::branch(
                        "Library",
                        [
                            ("schemas", PathSegment::terminal("Schema definitions")),
                            ("tags", PathSegment::terminal("Tag definitions")),
                            ("cards", PathSegment::terminal("All cards")),
                            ("drafts", PathSegment::terminal("All drafts")),
                        ],
                    ),
                ),
                ("cards/", PathSegment::dynamic("Specific card", "cards")),
                ("drafts/", PathSegment::dynamic("Specific draft", "drafts")),
                (
                    "collections/",
                    PathSegment::dynamic("Specific collection", "collections"),
                ),
                ("schemas/", PathSegment::dynamic("Specific schema", "schemas")),
                ("tags/", PathSegment::dynamic("Specific tag", "tags")),
                ("agents/", PathSegment::dynamic("Specific agent", "agents")),
                (
                    "scheduler/",
                    PathSegment::branch(
                        "Scheduler",
                        [
                            ("sources", PathSegment::terminal("All sources")),
                            ("sources/", PathSegment::dynamic("Specific source", "sources")),
                            ("queries", PathSegment::terminal("All queries")),
                            ("queries/", PathSegment::dynamic("Specific query", "queries")),
                            ("outputs", PathSegment::terminal("All outputs")),
                            ("outputs/", PathSegment::dynamic("Specific output", "outputs")),
                            ("cleanups", PathSegment::terminal("All cleanups")),
                            (
                                "cleanups/",
                                PathSegment::dynamic("Specific cleanup", "cleanups"),
                            ),
                            ("agents", PathSegment::terminal("All scheduled agents")),
                            ("agents/", PathSegment::dynamic("Specific agent", "agents")),
                        ],
                    ),
                ),
                ("integrations", PathSegment::terminal("All integrations")),
                (
                    "integrations/",
                    PathSegment::dynamic("Specific integration", "integrations"),
                ),
                ("subscriptions", PathSegment::terminal("All subscriptions")),
                (
                    "subscriptions/",
                    PathSegment::dynamic("Specific subscription", "subscriptions"),
                ),
                ("organizations", PathSegment::terminal("All organizations")),
                (
                    "organizations/",
                    PathSegment::dynamic("Specific organization", "organizations"),
                ),
            ],
        );

        let operation = PathSegment::branch(
            Prefix::Operation.label(),
            [
                (
                    "create/",
                    PathSegment::branch(
                        "Create new",
                        [
                            ("card", PathSegment::terminal("Create new card")),
                            ("collection", PathSegment::terminal("Create new collection")),
                            ("schema", PathSegment::terminal("Create new schema")),
                            ("tag", PathSegment::terminal("Create new tag")),
                            ("agent", PathSegment::terminal("Create new agent")),
                        ],
                    ),
                ),
                (
                    "edit/",
                    PathSegment::branch(
                        "Edit existing",
                        [
                            ("card", PathSegment::dynamic("Edit card", "cards")),
                            ("card/", PathSegment::dynamic("Select card to edit", "cards")),
                            (
                                "collection",
                                PathSegment::dynamic("Edit collection", "collections"),
                            ),
                            (
                                "collection/",
                                PathSegment::dynamic("Select collection to edit", "collections"),
                            ),
                            ("schema", PathSegment::dynamic("Edit schema", "schemas")),
                            (
                                "schema/",
                                PathSegment::dynamic("Select schema to edit", "schemas"),
                            ),
                            ("tag", PathSegment::dynamic("Edit tag", "tags")),
                            ("tag/", PathSegment::dynamic("Select tag to edit", "tags")),
                            ("agent", PathSegment::dynamic("Edit agent", "agents")),
                            (
                                "agent/",
                                PathSegment::dynamic("Select agent to edit", "agents"),
                            ),
                        ],
                    ),
                ),
                (
                    "duplicate/",
                    PathSegment::branch(
                        "Duplicate",
                        [
                            ("card", PathSegment::dynamic("Duplicate card", "cards")),
                            (
                                "card/",
                                PathSegment::dynamic("Select card to duplicate", "cards"),
                            ),
                            ("agent", PathSegment::dynamic("Duplicate agent", "agents")),
                            (
                                "agent/",
                                PathSegment::dynamic("Select agent to duplicate", "agents"),
                            ),
                        ],
                    ),
                ),
                (
                    "publish/",
                    PathSegment::branch(
                        "Publish",
                        [
                            (
                                "collection",
                                PathSegment::dynamic("Publish collection", "collections"),
                            ),
                            (
                                "collection/",
                                PathSegment::dynamic("Select collection to publish", "collections"),
                            ),
                        ],
                    ),
                ),
            ],
        );

        Self::new(target, operation)
    }
}

fn collect_entries<'a>(
    segment: &'a PathSegment,
    base: &str,
    out: &mut Vec<(String, &'a PathSegment)>,
) {
    let Some(children) = segment.children() else {
        return;
    };
    for (key, child) in children {
        let path = format!("{base}{key}");
        out.push((path.clone(), child));
        if key.ends_with('/') {
            collect_entries(child, &path, out);
        }
    }
}

/// Schema document plus optional binding overrides
///
/// Accepts either a bare namespace map or
/// `{ "namespaces": { ... }, "bindings": { ... } }`.
#[derive(Debug, Clone)]
pub struct SchemaDocument {
    pub schema: NavigationSchema,
    pub bindings: BindingTable,
}

impl SchemaDocument {
    /// The built-in tree with the built-in bindings
    pub fn builtin() -> Self {
        Self {
            schema: NavigationSchema::builtin(),
            bindings: BindingTable::builtin(),
        }
    }

    /// Parse a document; its bindings are merged over the built-in table
    pub fn from_json(text: &str) -> Result<Self, SchemaError> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| SchemaError::InvalidDocument(e.to_string()))?;

        let (namespaces, overrides) = match value {
            Value::Object(mut map) if map.contains_key("namespaces") => {
                let namespaces = map.remove("namespaces").unwrap_or_default();
                let bindings = map.remove("bindings").unwrap_or_default();
                (namespaces, bindings)
            }
            other => (other, Value::Null),
        };

        let namespaces: IndexMap<String, RawNode> = serde_json::from_value(namespaces)
            .map_err(|e| SchemaError::InvalidDocument(e.to_string()))?;
        let schema = NavigationSchema::from_namespaces(namespaces)?;

        let mut bindings = BindingTable::builtin();
        if !overrides.is_null() {
            let overrides: BindingTable = serde_json::from_value(overrides)
                .map_err(|e| SchemaError::InvalidDocument(format!("bindings: {e}")))?;
            bindings.extend(overrides);
        }

        Ok(Self { schema, bindings })
    }
}

/// Untyped node as written in a schema document
#[derive(Debug, Deserialize)]
struct RawNode {
    #[serde(default)]
    label: String,
    #[serde(default)]
    children: Option<IndexMap<String, RawNode>>,
    #[serde(default)]
    dynamic: Option<String>,
    #[serde(default, rename = "final")]
    is_final: bool,
}

impl RawNode {
    fn into_segment(self, path: &str) -> Result<PathSegment, SchemaError> {
        let modes = [self.children.is_some(), self.dynamic.is_some(), self.is_final]
            .into_iter()
            .filter(|set| *set)
            .count();
        if modes > 1 {
            return Err(SchemaError::ConflictingModes {
                path: path.to_string(),
            });
        }

        let kind = match (self.children, self.dynamic) {
            (Some(children), _) => {
                let mut converted = IndexMap::with_capacity(children.len());
                for (key, child) in children {
                    let child_path = format!("{path}{key}");
                    converted.insert(key, child.into_segment(&child_path)?);
                }
                SegmentKind::Branch(converted)
            }
            (None, Some(tag)) => SegmentKind::Dynamic(tag),
            (None, None) if self.is_final => SegmentKind::Terminal,
            (None, None) => SegmentKind::Branch(IndexMap::new()),
        };

        Ok(PathSegment {
            label: self.label,
            kind,
        })
    }
}
