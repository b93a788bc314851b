//! Error handling for symposium.
//!
//! Completion itself never fails: an unknown path, an unbound resource tag or an
//! empty collection all degrade to "no suggestions". The types in this module
//! cover the places that can legitimately fail:
//! - Building and validating the navigation schema (aborts startup)
//! - Loading fixture collections into the resource store
//! - Reading and validating configuration
//! - Submitting input in manage mode
//!
//! # Example
//!
//! ```rust
//! use symposium::completion::{BindingTable, NavigationSchema};
//! use symposium::error::Result;
//!
//! fn build() -> Result<NavigationSchema> {
//!     let schema = NavigationSchema::builtin();
//!     schema.validate(&BindingTable::builtin())?;
//!     Ok(schema)
//! }
//! ```

pub mod kinds;

// Re-export commonly used types
pub use kinds::{ConfigError, Result, SchemaError, StoreError, SubmitError, SymposiumError};
