//! Symposium Library
//!
//! Command-path completion for a conversational workspace. Users reference
//! workspace objects with `@/` target paths and invoke actions with `#/`
//! operation paths; this library resolves partially typed paths into ranked
//! suggestions and splices accepted ones back into the input.
//!
//! # Modules
//!
//! - `chat`: Input modes, message submission and generated forms
//! - `cli`: Command-line interface and argument parsing
//! - `completion`: Navigation schema, resolver, splicer and selection session
//! - `config`: Configuration management
//! - `error`: Error types and handling
//! - `formatter`: Output formatting and display
//! - `repl`: Interactive REPL engine
//! - `store`: Resource collections and fixture loading
//!
//! # Example
//!
//! ```
//! use symposium::completion::{BindingTable, CompletionEngine, NavigationSchema, Prefix};
//! use symposium::store::{Resource, SharedStore, StoreSnapshot};
//!
//! let store = SharedStore::new(StoreSnapshot::new().with_collection(
//!     "cards",
//!     vec![Resource::new("c1").with_field("title", "Weekly Report")],
//! ));
//! let engine =
//!     CompletionEngine::new(NavigationSchema::builtin(), BindingTable::builtin(), store)?;
//!
//! let items = engine.resolve(Prefix::Target, "cards/Week", None);
//! assert_eq!(items[0].path, "cards/c1");
//! # Ok::<(), symposium::error::SchemaError>(())
//! ```

pub mod chat;
pub mod cli;
pub mod completion;
pub mod config;
pub mod error;
pub mod formatter;
pub mod repl;
pub mod store;

// Re-export commonly used types
pub use completion::{CompletionEngine, CompletionItem, NavigationSchema, Prefix};
pub use config::Config;
pub use error::{Result, SymposiumError};
pub use formatter::Formatter;
pub use repl::ReplEngine;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get library version string
pub fn version() -> &'static str {
    VERSION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
