//! Completion engine - the entry point front ends use
//!
//! Bundles the schema, its bindings and a shared resource store. Every
//! resolution reads one store snapshot, so a refresh running meanwhile never
//! mixes two collection states into one item list.

use std::sync::Arc;

use super::binding::BindingTable;
use super::resolver::{CompletionItem, CompletionRequest, CompletionResolver};
use super::schema::{NavigationSchema, Prefix};
use super::session::CompletionSession;
use super::splice::{self, Splice};
use super::trigger::Trigger;
use crate::error::SchemaError;
use crate::store::SharedStore;

/// Main completion engine
#[derive(Debug, Clone)]
pub struct CompletionEngine {
    schema: Arc<NavigationSchema>,
    bindings: Arc<BindingTable>,
    store: SharedStore,
}

impl CompletionEngine {
    /// Create a new completion engine
    ///
    /// # Arguments
    /// * `schema` - Navigation tree
    /// * `bindings` - Resource type bindings for its dynamic segments
    /// * `store` - Store dynamic segments read from
    ///
    /// # Returns
    /// * `Result<Self, SchemaError>` - Fails if a dynamic tag has no binding
    pub fn new(
        schema: NavigationSchema,
        bindings: BindingTable,
        store: SharedStore,
    ) -> Result<Self, SchemaError> {
        schema.validate(&bindings)?;
        Ok(Self {
            schema: Arc::new(schema),
            bindings: Arc::new(bindings),
            store,
        })
    }

    pub fn schema(&self) -> &NavigationSchema {
        &self.schema
    }

    pub fn bindings(&self) -> &BindingTable {
        &self.bindings
    }

    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    fn resolver(&self) -> CompletionResolver<'_> {
        CompletionResolver::new(&self.schema, &self.bindings)
    }

    /// Resolve a typed path
    ///
    /// # Arguments
    /// * `prefix` - Namespace prefix
    /// * `raw_path` - Text typed after the prefix
    /// * `search_query` - Search box value, used once in dynamic mode
    pub fn resolve(
        &self,
        prefix: Prefix,
        raw_path: &str,
        search_query: Option<&str>,
    ) -> Vec<CompletionItem> {
        let mut request = CompletionRequest::new(prefix, raw_path);
        request.search_query = search_query.map(str::to_string);
        self.resolve_request(&request)
    }

    /// Resolve a prepared request against the current snapshot
    pub fn resolve_request(&self, request: &CompletionRequest) -> Vec<CompletionItem> {
        let snapshot = self.store.snapshot();
        self.resolver().resolve(request, snapshot.as_ref())
    }

    /// Whether the path should offer a search box
    pub fn needs_search(&self, prefix: Prefix, raw_path: &str) -> bool {
        self.resolver().needs_search(prefix, raw_path)
    }

    /// Splice an accepted item into the buffer
    pub fn apply_selection(
        &self,
        buffer: &str,
        cursor: usize,
        prefix: Prefix,
        item: &CompletionItem,
    ) -> Splice {
        splice::apply(buffer, cursor, prefix, &item.path)
    }

    /// Detect the command token at the cursor and resolve it
    ///
    /// # Returns
    /// * `Option<(Trigger, Vec<CompletionItem>)>` - `None` when the cursor is
    ///   not in a command token
    pub fn complete_at(&self, buffer: &str, cursor: usize) -> Option<(Trigger, Vec<CompletionItem>)> {
        let trigger = Trigger::detect(buffer, cursor)?;
        let items = self.resolve(trigger.prefix, &trigger.path, None);
        Some((trigger, items))
    }

    /// Start a closed session; drive it with [`CompletionSession::dispatch`]
    pub fn session(&self) -> CompletionSession {
        CompletionSession::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Resource, StoreSnapshot};

    fn create_test_engine() -> CompletionEngine {
        let store = SharedStore::new(StoreSnapshot::new().with_collection(
            "tags",
            vec![Resource::new("t1").with_field("name", "research")],
        ));
        CompletionEngine::new(NavigationSchema::builtin(), BindingTable::builtin(), store).unwrap()
    }

    #[test]
    fn test_new_rejects_unbound_tag() {
        let err = CompletionEngine::new(
            NavigationSchema::builtin(),
            BindingTable::new(),
            SharedStore::default(),
        )
        .unwrap_err();
        assert!(matches!(err, SchemaError::UnboundDynamicTag { .. }));
    }

    #[test]
    fn test_complete_at() {
        let engine = create_test_engine();
        let (trigger, items) = engine.complete_at("see @/tags/re", 13).unwrap();

        assert_eq!(trigger.start, 4);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].path, "tags/t1");
        assert!(engine.complete_at("no trigger", 10).is_none());
    }

    #[test]
    fn test_resolve_reads_latest_snapshot() {
        let engine = create_test_engine();
        assert_eq!(engine.resolve(Prefix::Target, "tags/", None).len(), 1);

        let generation = engine.store().begin_refresh();
        engine.store().install(generation, StoreSnapshot::new());
        assert!(engine.resolve(Prefix::Target, "tags/", None).is_empty());
    }

    #[test]
    fn test_apply_selection() {
        let engine = create_test_engine();
        let items = engine.resolve(Prefix::Target, "tags/", None);
        let splice = engine.apply_selection("@/tags/", 7, Prefix::Target, &items[0]);
        assert_eq!(splice.buffer, "@/tags/t1 ");
    }
}
