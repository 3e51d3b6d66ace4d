//! Error types for the `spyglass-inspect` crate.
//!
//! Every variant here is internal taxonomy: the façade catches all of them
//! at its boundary, logs, and answers not-found. Nothing in this crate is
//! fatal to the host.

/// Errors that can occur while resolving a dotted path.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// The id's root object (snapshot, live row, or packet) does not exist.
    #[error("no root object for path expansion")]
    MissingRoot,

    /// A path token matched no key in an associative container.
    #[error("no key matching token `{token}`")]
    UnknownKey {
        /// The unmatched token.
        token: String,
    },

    /// A token addressed a sequence but was not a non-negative integer.
    #[error("token `{token}` is not a valid sequence index")]
    MalformedIndex {
        /// The offending token.
        token: String,
    },

    /// A parsed index fell outside the sequence.
    #[error("index {index} out of range for sequence of length {len}")]
    IndexOutOfRange {
        /// The parsed index.
        index: usize,
        /// The sequence length.
        len: usize,
    },

    /// A live object had no field of the requested name, its ancestors
    /// included.
    #[error("type `{type_name}` has no field `{field}`")]
    UnknownField {
        /// The object's concrete type name.
        type_name: String,
        /// The requested field.
        field: String,
    },

    /// Traversal reached a scalar with tokens still unconsumed.
    #[error("cannot traverse into a scalar at token `{token}`")]
    NotTraversable {
        /// The token that could not be applied.
        token: String,
    },

    /// The live handle's object has been reclaimed by the simulation.
    #[error("live object is gone")]
    DanglingHandle,

    /// The path does not follow its dialect's leading-segment convention.
    #[error("path `{path}` does not match the expected dialect")]
    BadDialect {
        /// The full offending path.
        path: String,
    },
}
