//! Generic dot-path traversal over the value union.
//!
//! A path is the token sequence from splitting a dot-delimited string; there
//! is no escaping, so a literal dot inside a key is unrepresentable. The
//! walk is left to right and all-or-nothing: the first token that fails to
//! resolve aborts the whole traversal, never yielding a partial result.

use spyglass_types::Value;

use crate::error::ResolveError;

/// Split a dotted path into tokens. The empty path has no tokens and
/// resolves to the root itself.
pub fn tokenize(path: &str) -> Vec<&str> {
    if path.is_empty() {
        return Vec::new();
    }
    path.split('.').collect()
}

/// Walk `tokens` into `root`, one container hop per token.
///
/// Container rules:
/// - mapping: exact string-key match first; on miss, a linear scan compares
///   each key's string form to the token (covers non-string keys)
/// - sequence (lists and fixed-size arrays alike): the token must parse as
///   a non-negative integer index within range
/// - opaque live object: named-field lookup through [`Inspect`], which
///   walks the concrete type and its ancestors outward
/// - scalars cannot be traversed into
///
/// # Errors
///
/// Returns the [`ResolveError`] describing the first token that failed.
///
/// [`Inspect`]: spyglass_types::Inspect
pub fn resolve(root: Value, tokens: &[&str]) -> Result<Value, ResolveError> {
    let mut current = root;
    for token in tokens {
        current = step(current, token)?;
    }
    Ok(current)
}

fn step(current: Value, token: &str) -> Result<Value, ResolveError> {
    match current {
        Value::Mapping(pairs) => {
            if let Some((_, value)) = pairs
                .iter()
                .find(|(key, _)| matches!(key, Value::String(s) if s.as_str() == token))
            {
                return Ok(value.clone());
            }
            // Non-string keys match through their string form.
            pairs
                .into_iter()
                .find(|(key, _)| key.key_form() == token)
                .map(|(_, value)| value)
                .ok_or_else(|| ResolveError::UnknownKey {
                    token: token.to_owned(),
                })
        }
        Value::Sequence(items) => {
            let Ok(index) = token.parse::<usize>() else {
                return Err(ResolveError::MalformedIndex {
                    token: token.to_owned(),
                });
            };
            let len = items.len();
            items
                .into_iter()
                .nth(index)
                .ok_or(ResolveError::IndexOutOfRange { index, len })
        }
        Value::Opaque(object) => {
            object
                .lookup(token)
                .ok_or_else(|| ResolveError::UnknownField {
                    type_name: object.type_name().to_owned(),
                    field: token.to_owned(),
                })
        }
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {
            Err(ResolveError::NotTraversable {
                token: token.to_owned(),
            })
        }
    }
}
