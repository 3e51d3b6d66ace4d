//! The expansion façade: the one surface the control and transport layers
//! call into.
//!
//! Every public operation here is total. Internal traversal errors are
//! caught at this boundary, logged, and downgraded to not-found: a
//! debugging aid must never crash its host.

use std::collections::BTreeMap;
use std::sync::Arc;

use spyglass_cache::{CacheConfig, PacketStore, SnapshotStore};
use spyglass_types::{
    EntityId, OpaqueRef, PacketDirection, PacketEntry, PacketId, PacketSequence, Snapshot, Value,
    WeakRef,
};

use crate::dialect::{entity_dialect, packet_dialect};
use crate::error::ResolveError;
use crate::path::{resolve, tokenize};
use crate::serialize::{DeepSerialize, JsonSerializer};

/// Owned façade over the snapshot and packet stores.
///
/// Constructed once at startup, passed by reference to the producer
/// (simulation tick, packet logger) and the consumers (request handlers),
/// torn down by [`Inspector::clear`] or drop. Not ambient global state.
pub struct Inspector {
    snapshots: Arc<SnapshotStore>,
    packets: Arc<PacketStore>,
    serializer: Box<dyn DeepSerialize>,
    sequence: PacketSequence,
}

impl Inspector {
    /// Create an inspector with the given limits and the default JSON
    /// deep-serializer.
    pub fn new(config: CacheConfig) -> Self {
        Self::with_serializer(config, Box::new(JsonSerializer::default()))
    }

    /// Create an inspector with a custom deep-serializer implementation.
    pub fn with_serializer(config: CacheConfig, serializer: Box<dyn DeepSerialize>) -> Self {
        Self {
            snapshots: Arc::new(SnapshotStore::new(config.max_entities)),
            packets: Arc::new(PacketStore::new(config.max_packets)),
            serializer,
            sequence: PacketSequence::new(),
        }
    }

    // -------------------------------------------------------------------
    // Producer surface (simulation tick, packet logger)
    // -------------------------------------------------------------------

    /// Store a fresh entity snapshot together with its live component
    /// handles. The entity id is taken from the snapshot itself.
    pub fn put_entity(&self, snapshot: Snapshot, live_refs: BTreeMap<String, WeakRef>) {
        self.snapshots.put(snapshot.entity_id, snapshot, live_refs);
    }

    /// Overwrite one component's live handle without touching its siblings.
    pub fn put_live_component(&self, id: EntityId, component: &str, handle: WeakRef) {
        self.snapshots.put_live_component(id, component, handle);
    }

    /// Log a packet: stamps a fresh sequence id and timestamp, then stores
    /// the entry and the live packet object. Returns the assigned id.
    ///
    /// A `None` object is a rejected write (logged, dropped); the id is
    /// still consumed, keeping the sequence strictly increasing.
    pub fn log_packet(
        &self,
        direction: PacketDirection,
        packet_type: impl Into<String>,
        type_id: i32,
        handler: impl Into<String>,
        fields: BTreeMap<String, serde_json::Value>,
        object: Option<OpaqueRef>,
    ) -> PacketId {
        let id = self.sequence.next_id();
        let entry = PacketEntry::new(id, direction, packet_type, type_id, handler, fields);
        self.packets.put(entry, object);
        id
    }

    /// Store an already-built packet entry. Prefer [`Inspector::log_packet`]
    /// unless the caller manages its own ids.
    pub fn put_packet(&self, entry: PacketEntry, object: Option<OpaqueRef>) {
        self.packets.put(entry, object);
    }

    // -------------------------------------------------------------------
    // Consumer surface (request handlers)
    // -------------------------------------------------------------------

    /// The stored snapshot for an entity.
    pub fn entity_snapshot(&self, id: EntityId) -> Option<Snapshot> {
        self.snapshots.get(id)
    }

    /// A point-in-time copy of every stored snapshot.
    pub fn all_entities(&self) -> Vec<Snapshot> {
        self.snapshots.all()
    }

    /// Number of stored entities.
    pub fn entity_count(&self) -> usize {
        self.snapshots.count()
    }

    /// The upgraded capability handle for one live component, or `None` if
    /// the entity, the component, or the object itself is gone.
    pub fn live_component(&self, id: EntityId, component: &str) -> Option<OpaqueRef> {
        self.snapshots.live_component(id, component)
    }

    /// Delete an entity's snapshot and live row. Silently idempotent.
    pub fn remove_entity(&self, id: EntityId) {
        self.snapshots.remove(id);
    }

    /// The logged entry for a packet.
    pub fn packet_entry(&self, id: PacketId) -> Option<PacketEntry> {
        self.packets.get(id)
    }

    /// Number of stored packets.
    pub fn packet_count(&self) -> usize {
        self.packets.count()
    }

    /// Expand a dotted entity path and serialize the resolved value.
    ///
    /// The path follows the entity dialect: `components.<Name>`, optionally
    /// followed by a skipped `fields` segment, then the nested path. The
    /// live component object is preferred; on any live-side failure the
    /// immutable snapshot tree answers instead. Every failure mode --
    /// unknown id, bad dialect, dangling handle, failed segment --
    /// normalizes to `None`.
    pub fn expand_entity_path(&self, id: EntityId, path: &str) -> Option<serde_json::Value> {
        match self.try_expand_entity(id, path) {
            Ok(value) => Some(self.serializer.serialize_deep(&value)),
            Err(err) => {
                tracing::debug!(entity = %id, path, error = %err, "entity path expansion failed");
                None
            }
        }
    }

    /// Expand a dotted packet path and serialize the resolved value.
    ///
    /// An optional leading `data` wrapper segment is stripped. The live
    /// packet object is preferred; the logged field map answers when live
    /// traversal fails. All failures normalize to `None`.
    pub fn expand_packet_path(&self, id: PacketId, path: &str) -> Option<serde_json::Value> {
        match self.try_expand_packet(id, path) {
            Ok(value) => Some(self.serializer.serialize_deep(&value)),
            Err(err) => {
                tracing::debug!(packet = %id, path, error = %err, "packet path expansion failed");
                None
            }
        }
    }

    /// Drop everything from both stores.
    pub fn clear(&self) {
        self.snapshots.clear();
        self.packets.clear();
    }

    /// Change both store limits. Applied lazily at the next eviction check;
    /// a downward change caps future growth without evicting immediately.
    pub fn set_limits(&self, max_entities: usize, max_packets: usize) {
        self.snapshots.set_max_entities(max_entities);
        self.packets.set_max_packets(max_packets);
    }

    // -------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------

    fn try_expand_entity(&self, id: EntityId, path: &str) -> Result<Value, ResolveError> {
        let tokens = tokenize(path);
        let (component, rest) = entity_dialect(&tokens, path)?;

        if let Some(object) = self.snapshots.live_component(id, component) {
            match resolve(Value::Opaque(object), rest) {
                Ok(value) => return Ok(value),
                Err(err) => {
                    tracing::debug!(entity = %id, component, error = %err,
                        "live resolution failed, falling back to snapshot");
                }
            }
        }

        let snapshot = self.snapshots.get(id).ok_or(ResolveError::MissingRoot)?;
        let component_data = snapshot
            .component(component)
            .ok_or_else(|| ResolveError::UnknownKey {
                token: component.to_owned(),
            })?;
        resolve(mapping_from_fields(&component_data.fields), rest)
    }

    fn try_expand_packet(&self, id: PacketId, path: &str) -> Result<Value, ResolveError> {
        let tokens = tokenize(path);
        let rest = packet_dialect(&tokens);

        if let Some(object) = self.packets.object(id) {
            match resolve(Value::Opaque(object), rest) {
                Ok(value) => return Ok(value),
                Err(err) => {
                    tracing::debug!(packet = %id, error = %err,
                        "live resolution failed, falling back to logged fields");
                }
            }
        }

        let entry = self.packets.get(id).ok_or(ResolveError::MissingRoot)?;
        resolve(mapping_from_fields(&entry.fields), rest)
    }
}

/// Bridge a captured field map into the value union for traversal.
fn mapping_from_fields(fields: &BTreeMap<String, serde_json::Value>) -> Value {
    Value::Mapping(
        fields
            .iter()
            .map(|(name, value)| (Value::String(name.clone()), Value::from(value)))
            .collect(),
    )
}
