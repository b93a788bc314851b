//! Path resolution
//!
//! Turns a typed command path into at most [`MAX_SUGGESTIONS`] completion
//! items. Resolution walks the schema over the fully typed segments, then
//! either lists matching static children or switches to the live records of a
//! dynamic segment.
//!
//! Static children match the filter term as a case-insensitive prefix.
//! Dynamic records match it as a case-sensitive substring of their display
//! field. The filter term is the in-progress token unless a non-empty search
//! query overrides it.

use indexmap::IndexMap;
use serde::Serialize;
use tracing::{debug, warn};

use super::binding::BindingTable;
use super::schema::{NavigationSchema, PathSegment, Prefix, SegmentKind};
use crate::store::ResourceStore;

/// Upper bound on the number of items a resolution returns
pub const MAX_SUGGESTIONS: usize = 5;

/// One suggestion
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletionItem {
    /// Full prefix-relative path, reused verbatim on accept
    pub path: String,

    /// Human-readable description
    pub label: String,

    /// Whether the path is fully resolved
    pub is_terminal: bool,
}

impl CompletionItem {
    /// Accepting a branch item keeps the completion open
    pub fn is_branch(&self) -> bool {
        self.path.ends_with('/')
    }
}

/// What the user typed after a trigger prefix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    pub prefix: Prefix,

    /// Path text after the prefix, possibly mid-segment
    pub raw_path: String,

    /// Explicit search box value; replaces the in-progress token when non-empty
    pub search_query: Option<String>,
}

impl CompletionRequest {
    pub fn new(prefix: Prefix, raw_path: impl Into<String>) -> Self {
        Self {
            prefix,
            raw_path: raw_path.into(),
            search_query: None,
        }
    }

    /// Builder-style search override
    pub fn with_search(mut self, query: impl Into<String>) -> Self {
        self.search_query = Some(query.into());
        self
    }
}

/// Where a raw path leads in the schema
#[derive(Debug)]
enum Location<'s, 'p> {
    /// A typed segment matched nothing
    Invalid,

    /// List children of a branch filtered by `term`
    Static {
        children: &'s IndexMap<String, PathSegment>,
        base_path: String,
        term: &'p str,
    },

    /// List records of the resource type `tag` filtered by `term`
    Dynamic {
        tag: &'s str,
        base_path: String,
        term: &'p str,
    },
}

/// Split a raw path into fully typed segments and the in-progress term
///
/// Empty segments are dropped. A path ending in `/` has no in-progress term.
fn split_path(raw_path: &str) -> (Vec<&str>, &str) {
    let mut segments: Vec<&str> = raw_path.split('/').filter(|s| !s.is_empty()).collect();
    if raw_path.ends_with('/') {
        return (segments, "");
    }
    let term = segments.pop().unwrap_or("");
    (segments, term)
}

/// Stateless resolver over a schema and its bindings
#[derive(Debug, Clone, Copy)]
pub struct CompletionResolver<'s> {
    schema: &'s NavigationSchema,
    bindings: &'s BindingTable,
}

impl<'s> CompletionResolver<'s> {
    pub fn new(schema: &'s NavigationSchema, bindings: &'s BindingTable) -> Self {
        Self { schema, bindings }
    }

    /// Resolve a request against a store snapshot
    ///
    /// # Arguments
    /// * `request` - Prefix, raw path and optional search override
    /// * `store` - Snapshot read for dynamic segments
    ///
    /// # Returns
    /// * `Vec<CompletionItem>` - Between 0 and [`MAX_SUGGESTIONS`] items in
    ///   display order
    pub fn resolve(
        &self,
        request: &CompletionRequest,
        store: &dyn ResourceStore,
    ) -> Vec<CompletionItem> {
        let search = request.search_query.as_deref().filter(|query| !query.is_empty());

        let items = match self.locate(request.prefix, &request.raw_path) {
            Location::Invalid => {
                debug!("No schema path for {}{}", request.prefix, request.raw_path);
                Vec::new()
            }
            Location::Static {
                children,
                base_path,
                term,
            } => Self::static_items(children, &base_path, search.unwrap_or(term)),
            Location::Dynamic {
                tag,
                base_path,
                term,
            } => self.dynamic_items(tag, &base_path, search.unwrap_or(term), store),
        };

        debug!(
            "Resolved {}{} to {} items",
            request.prefix,
            request.raw_path,
            items.len()
        );
        items
    }

    /// Whether completion at this path should offer a search box
    ///
    /// True when any typed segment names a dynamic segment, or when the
    /// position reached has a dynamic child. Segments that match nothing are
    /// skipped rather than ending the walk.
    pub fn needs_search(&self, prefix: Prefix, raw_path: &str) -> bool {
        let mut current = self.schema.root(prefix);

        for segment in raw_path.split('/').filter(|s| !s.is_empty()) {
            let Some(child) = current.child(&format!("{segment}/")) else {
                continue;
            };
            match child.kind {
                SegmentKind::Dynamic(_) => return true,
                SegmentKind::Branch(_) => current = child,
                SegmentKind::Terminal => return false,
            }
        }

        current
            .children()
            .is_some_and(|children| children.values().any(|c| c.dynamic_tag().is_some()))
    }

    fn locate<'p>(&self, prefix: Prefix, raw_path: &'p str) -> Location<'s, 'p> {
        let (typed, term) = split_path(raw_path);
        let mut current = self.schema.root(prefix);
        let mut base_path = String::new();

        for segment in typed {
            let key = format!("{segment}/");
            let Some(child) = current.child(&key) else {
                return Location::Invalid;
            };
            base_path.push_str(&key);

            match &child.kind {
                SegmentKind::Branch(_) => current = child,
                SegmentKind::Dynamic(tag) => {
                    return Location::Dynamic {
                        tag: tag.as_str(),
                        base_path,
                        term,
                    };
                }
                SegmentKind::Terminal => return Location::Invalid,
            }
        }

        let Some(children) = current.children() else {
            return Location::Invalid;
        };

        // A finished keyword like `cards` switches to its records and still
        // filters them by the keyword
        if !term.is_empty()
            && let Some(tag) = children
                .get(&format!("{term}/"))
                .and_then(PathSegment::dynamic_tag)
        {
            base_path.push_str(term);
            base_path.push('/');
            return Location::Dynamic {
                tag,
                base_path,
                term,
            };
        }

        Location::Static {
            children,
            base_path,
            term,
        }
    }

    fn static_items(
        children: &IndexMap<String, PathSegment>,
        base_path: &str,
        term: &str,
    ) -> Vec<CompletionItem> {
        let term = term.to_lowercase();
        children
            .iter()
            .filter(|(key, _)| key.to_lowercase().starts_with(&term))
            .take(MAX_SUGGESTIONS)
            .map(|(key, child)| CompletionItem {
                path: format!("{base_path}{key}"),
                label: child.label.clone(),
                is_terminal: child.is_terminal(),
            })
            .collect()
    }

    fn dynamic_items(
        &self,
        tag: &str,
        base_path: &str,
        term: &str,
        store: &dyn ResourceStore,
    ) -> Vec<CompletionItem> {
        let Some(binding) = self.bindings.get(tag) else {
            warn!("Dynamic segment references unbound resource type '{}'", tag);
            return Vec::new();
        };

        store
            .collection(&binding.collection)
            .iter()
            .filter(|resource| binding.admits(resource))
            .filter(|resource| {
                term.is_empty()
                    || resource
                        .display_text(&binding.display_field)
                        .is_some_and(|text| text.contains(term))
            })
            .take(MAX_SUGGESTIONS)
            .map(|resource| CompletionItem {
                path: format!("{base_path}{}", resource.id),
                label: format!(
                    "{} {} - {}",
                    binding.glyph,
                    resource.id,
                    resource
                        .display_text(&binding.display_field)
                        .unwrap_or_default()
                ),
                is_terminal: true,
            })
            .collect()
    }
}
