//! Command-path completion
//!
//! Users address things with `@/` target paths (`@/library/schemas`,
//! `@/cards/c1`) and act on them with `#/` operation paths (`#/create/card`).
//! This module completes both kinds of path as they are typed.
//!
//! # Architecture
//!
//! - **Schema**: static tree per prefix, with branch, dynamic and terminal nodes
//! - **Bindings**: map dynamic tags to resource collections
//! - **Resolver**: walks a typed path and lists up to five matches
//! - **Splice**: writes an accepted match back into the input buffer
//! - **Trigger**: finds the command token at the cursor
//! - **Session**: selection state machine driven by intents
//! - **Engine**: owns schema, bindings and store; the entry point
//!
//! # Examples
//!
//! ```
//! use symposium::completion::{BindingTable, CompletionEngine, NavigationSchema, Prefix};
//! use symposium::store::SharedStore;
//!
//! let engine = CompletionEngine::new(
//!     NavigationSchema::builtin(),
//!     BindingTable::builtin(),
//!     SharedStore::default(),
//! )
//! .unwrap();
//!
//! let items = engine.resolve(Prefix::Operation, "create/", None);
//! assert_eq!(items[0].path, "create/card");
//! ```

mod binding;
mod engine;
mod resolver;
mod schema;
mod session;
mod splice;
mod trigger;

pub use binding::{BindingTable, Predicate, ResourceTypeBinding};
pub use engine::CompletionEngine;
pub use resolver::{CompletionItem, CompletionRequest, CompletionResolver, MAX_SUGGESTIONS};
pub use schema::{NavigationSchema, PathSegment, Prefix, SchemaDocument, SegmentKind};
pub use session::{CompletionSession, Direction, Effect, Intent};
pub use splice::{Splice, apply as apply_selection};
pub use trigger::Trigger;

#[cfg(test)]
mod tests;
