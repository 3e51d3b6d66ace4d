//! The closed value union produced by path navigation, and the capability
//! trait that stands in for reflection over live objects.
//!
//! Resolved path results are never raw object references: everything a
//! traversal can land on is one of the [`Value`] variants. Captured snapshot
//! data enters the union through `From<serde_json::Value>`; live simulation
//! objects enter it as [`Value::Opaque`] capability handles.

use std::fmt;
use std::sync::{Arc, Weak};

/// Shared, non-owning-friendly handle to a live inspectable object.
pub type OpaqueRef = Arc<dyn Inspect>;

/// Weak counterpart of [`OpaqueRef`]; upgrading after the producer dropped
/// its strong reference yields `None`.
pub type WeakRef = Weak<dyn Inspect>;

/// Named-field lookup over a live object of otherwise unknown shape.
///
/// Each concrete producer type implements this instead of the cache relying
/// on reflection. An implementation that wraps a base/parent object should
/// try its own fields first and then delegate to the parent's `lookup`,
/// which reproduces the outward walk over ancestor types.
pub trait Inspect: Send + Sync {
    /// The concrete type name, used in logs and serialized output.
    fn type_name(&self) -> &str;

    /// Look up a field by exact name. `None` means the field does not exist
    /// anywhere on this type or its ancestors.
    fn lookup(&self, field: &str) -> Option<Value>;

    /// All field names reachable through [`Inspect::lookup`], ancestors
    /// included. Drives deep serialization of opaque nodes.
    fn field_names(&self) -> Vec<String>;
}

/// A resolved path result.
///
/// `Mapping` preserves insertion order and permits non-string keys, which
/// matters for the navigator's fallback of comparing a key's string form
/// against a path token.
#[derive(Clone)]
pub enum Value {
    /// Absent or explicitly null.
    Null,
    /// Boolean.
    Bool(bool),
    /// Integer or float, kept in JSON number representation.
    Number(serde_json::Number),
    /// UTF-8 string.
    String(String),
    /// Ordered sequence, addressed by integer index.
    Sequence(Vec<Value>),
    /// Ordered key/value pairs, addressed by key.
    Mapping(Vec<(Value, Value)>),
    /// Live object behind a capability handle.
    Opaque(OpaqueRef),
}

impl Value {
    /// Convenience constructor for a string value.
    pub fn string(s: impl Into<String>) -> Self {
        Self::String(s.into())
    }

    /// Convenience constructor for an integer value.
    pub fn int(n: i64) -> Self {
        Self::Number(serde_json::Number::from(n))
    }

    /// The string form used when matching mapping keys against path tokens.
    ///
    /// Scalars render as their natural text; containers and opaques render
    /// as bracketed markers and will never match a token.
    pub fn key_form(&self) -> String {
        match self {
            Self::Null => String::from("null"),
            Self::Bool(b) => b.to_string(),
            Self::Number(n) => n.to_string(),
            Self::String(s) => s.clone(),
            Self::Sequence(_) => String::from("<sequence>"),
            Self::Mapping(_) => String::from("<mapping>"),
            Self::Opaque(o) => format!("<{}>", o.type_name()),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "Null"),
            Self::Bool(b) => write!(f, "Bool({b})"),
            Self::Number(n) => write!(f, "Number({n})"),
            Self::String(s) => write!(f, "String({s:?})"),
            Self::Sequence(items) => f.debug_tuple("Sequence").field(items).finish(),
            Self::Mapping(pairs) => f.debug_tuple("Mapping").field(pairs).finish(),
            Self::Opaque(o) => write!(f, "Opaque(<{}>)", o.type_name()),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Sequence(a), Self::Sequence(b)) => a == b,
            (Self::Mapping(a), Self::Mapping(b)) => a == b,
            // Opaques compare by identity: two handles are equal only when
            // they point at the same live object.
            (Self::Opaque(a), Self::Opaque(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => Self::Number(n),
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Array(items) => {
                Self::Sequence(items.into_iter().map(Self::from).collect())
            }
            serde_json::Value::Object(map) => Self::Mapping(
                map.into_iter()
                    .map(|(k, v)| (Self::String(k), Self::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<&serde_json::Value> for Value {
    fn from(json: &serde_json::Value) -> Self {
        Self::from(json.clone())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::panic)]

    use super::*;

    struct Probe;

    impl Inspect for Probe {
        fn type_name(&self) -> &str {
            "Probe"
        }

        fn lookup(&self, field: &str) -> Option<Value> {
            (field == "answer").then(|| Value::int(42))
        }

        fn field_names(&self) -> Vec<String> {
            vec![String::from("answer")]
        }
    }

    #[test]
    fn json_conversion_preserves_shape() {
        let json = serde_json::json!({
            "name": "guard",
            "hp": 20,
            "tags": ["hostile", "armored"],
        });
        let value = Value::from(json);
        let Value::Mapping(pairs) = value else {
            panic!("expected mapping");
        };
        assert_eq!(pairs.len(), 3);
        assert!(pairs.contains(&(Value::string("hp"), Value::int(20))));
    }

    #[test]
    fn key_form_renders_scalars() {
        assert_eq!(Value::int(7).key_form(), "7");
        assert_eq!(Value::Bool(true).key_form(), "true");
        assert_eq!(Value::string("uuid").key_form(), "uuid");
        assert_eq!(Value::Null.key_form(), "null");
    }

    #[test]
    fn opaque_equality_is_identity() {
        let a: OpaqueRef = Arc::new(Probe);
        let b: OpaqueRef = Arc::new(Probe);
        assert_eq!(Value::Opaque(Arc::clone(&a)), Value::Opaque(a));
        let c: OpaqueRef = Arc::new(Probe);
        assert_ne!(Value::Opaque(b), Value::Opaque(c));
    }
}
