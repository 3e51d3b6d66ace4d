//! Path navigation and the expansion façade for the Spyglass inspection
//! cache.
//!
//! Given an entity or packet id and a dot-delimited path, this crate walks
//! the live object graph (preferred) or the static snapshot tree (fallback)
//! to the addressed value and hands it to the deep-serializer. Every public
//! operation is total: bad ids, bad paths, and vanished live objects all
//! answer not-found.
//!
//! # Modules
//!
//! - [`path`] -- Tokenization and generic dot-path traversal over [`Value`]
//! - [`dialect`] -- Entity and packet leading-segment conventions
//! - [`serialize`] -- The [`DeepSerialize`] seam and default JSON serializer
//! - [`inspector`] -- The [`Inspector`] façade exposed to the control layer
//! - [`error`] -- Internal traversal error taxonomy
//!
//! [`Value`]: spyglass_types::Value

pub mod dialect;
pub mod error;
pub mod inspector;
pub mod path;
pub mod serialize;

// Re-export primary types at crate root.
pub use error::ResolveError;
pub use inspector::Inspector;
pub use serialize::{DeepSerialize, JsonSerializer};
