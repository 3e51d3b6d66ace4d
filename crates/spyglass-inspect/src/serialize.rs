//! The deep-serializer seam and its default JSON implementation.
//!
//! The façade never hands a resolved [`Value`] to a caller directly; it goes
//! through [`DeepSerialize`] first, so live references stay inside the
//! subsystem. The transport layer can plug its own implementation; the
//! shipped [`JsonSerializer`] renders depth-limited JSON suitable for the
//! debugging client.

use spyglass_types::Value;

/// Turns a resolved value into its client-facing serialized form.
pub trait DeepSerialize: Send + Sync {
    /// Serialize `value`, expanding nested containers and opaque live
    /// objects. Must not fail: unserializable corners degrade to markers.
    fn serialize_deep(&self, value: &Value) -> serde_json::Value;
}

/// Depth-limited recursive JSON serializer.
///
/// Opaque nodes expand through the object's [`Inspect`] surface into a JSON
/// object tagged with the concrete type name. Anything past the depth limit
/// collapses to a `"<truncated>"` marker, which keeps cyclic object graphs
/// from hanging the serializer.
///
/// [`Inspect`]: spyglass_types::Inspect
#[derive(Debug, Clone, Copy)]
pub struct JsonSerializer {
    max_depth: usize,
}

/// Marker emitted in place of nodes beyond the depth limit.
const TRUNCATED: &str = "<truncated>";

/// Key carrying an opaque object's concrete type name.
const TYPE_KEY: &str = "__type";

impl JsonSerializer {
    /// Default nesting depth.
    pub const DEFAULT_MAX_DEPTH: usize = 8;

    /// Create a serializer that stops expanding at `max_depth` levels.
    pub const fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    fn render(&self, value: &Value, depth: usize) -> serde_json::Value {
        if depth >= self.max_depth {
            return serde_json::Value::String(String::from(TRUNCATED));
        }
        let next = depth.saturating_add(1);
        match value {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => serde_json::Value::Number(n.clone()),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Sequence(items) => serde_json::Value::Array(
                items.iter().map(|item| self.render(item, next)).collect(),
            ),
            Value::Mapping(pairs) => serde_json::Value::Object(
                pairs
                    .iter()
                    .map(|(key, item)| (key.key_form(), self.render(item, next)))
                    .collect(),
            ),
            Value::Opaque(object) => {
                let mut rendered = serde_json::Map::new();
                rendered.insert(
                    String::from(TYPE_KEY),
                    serde_json::Value::String(object.type_name().to_owned()),
                );
                for field in object.field_names() {
                    let field_value = object
                        .lookup(&field)
                        .map_or(serde_json::Value::Null, |v| self.render(&v, next));
                    rendered.insert(field, field_value);
                }
                serde_json::Value::Object(rendered)
            }
        }
    }
}

impl Default for JsonSerializer {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_DEPTH)
    }
}

impl DeepSerialize for JsonSerializer {
    fn serialize_deep(&self, value: &Value) -> serde_json::Value {
        self.render(value, 0)
    }
}
