//! Point-in-time entity snapshot records.
//!
//! A [`Snapshot`] is captured by the simulation engine at put time and is
//! immutable from then on: updates replace the whole value. Component field
//! values are stored as already-captured [`serde_json::Value`] data, so a
//! snapshot can always be navigated and served even after the live entity
//! is gone.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::ids::EntityId;

/// World-space position of an entity at capture time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Position {
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
    /// Z coordinate.
    pub z: f64,
}

/// Two-axis view orientation of an entity at capture time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Orientation {
    /// Rotation around the vertical axis, degrees.
    pub yaw: f32,
    /// Rotation around the lateral axis, degrees.
    pub pitch: f32,
}

/// Captured state of one component on an entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ComponentData {
    /// The component's concrete type name.
    pub type_name: String,
    /// Captured field values, ordered by field name.
    pub fields: BTreeMap<String, serde_json::Value>,
}

impl ComponentData {
    /// Build component data from a type name and captured fields.
    pub fn new(
        type_name: impl Into<String>,
        fields: BTreeMap<String, serde_json::Value>,
    ) -> Self {
        Self {
            type_name: type_name.into(),
            fields,
        }
    }
}

/// Immutable point-in-time capture of one entity.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Snapshot {
    /// Engine-assigned entity handle.
    pub entity_id: EntityId,
    /// Stable identity of the entity across runs.
    pub uuid: Uuid,
    /// Model/type classification string (e.g. `"npc:villager"`).
    pub entity_type: String,
    /// Position at capture time.
    pub position: Position,
    /// Orientation at capture time.
    pub orientation: Orientation,
    /// Captured components, ordered by component name.
    pub components: BTreeMap<String, ComponentData>,
    /// When the snapshot was captured.
    pub captured_at: DateTime<Utc>,
}

impl Snapshot {
    /// Build a snapshot captured at the current instant.
    pub fn new(
        entity_id: EntityId,
        uuid: Uuid,
        entity_type: impl Into<String>,
        position: Position,
        orientation: Orientation,
        components: BTreeMap<String, ComponentData>,
    ) -> Self {
        Self {
            entity_id,
            uuid,
            entity_type: entity_type.into(),
            position,
            orientation,
            components,
            captured_at: Utc::now(),
        }
    }

    /// Captured data for one component, by name.
    pub fn component(&self, name: &str) -> Option<&ComponentData> {
        self.components.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Snapshot {
        let mut fields = BTreeMap::new();
        fields.insert(String::from("role"), serde_json::json!("merchant"));
        let mut components = BTreeMap::new();
        components.insert(
            String::from("NPCEntity"),
            ComponentData::new("NPCEntity", fields),
        );
        Snapshot::new(
            EntityId::from_raw(7),
            Uuid::new_v4(),
            "npc:villager",
            Position { x: 1.0, y: 64.0, z: -3.5 },
            Orientation { yaw: 90.0, pitch: 0.0 },
            components,
        )
    }

    #[test]
    fn component_lookup_by_name() {
        let snap = sample();
        let comp = snap.component("NPCEntity");
        assert!(comp.is_some());
        assert!(snap.component("Missing").is_none());
    }

    #[test]
    fn snapshot_serializes_to_json() {
        let snap = sample();
        let json = serde_json::to_value(&snap).unwrap_or_default();
        assert_eq!(
            json.pointer("/components/NPCEntity/fields/role"),
            Some(&serde_json::json!("merchant"))
        );
    }
}
