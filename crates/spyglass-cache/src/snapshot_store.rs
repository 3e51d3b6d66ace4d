//! Bounded entity snapshot store with FIFO eviction.
//!
//! The store keeps, per entity, an immutable [`Snapshot`] paired with a
//! [`LiveRow`] of weak component handles. Both rows are created together on
//! `put`, replaced together, and evicted together, so a reader can never
//! observe a snapshot without its row or vice versa.
//!
//! Eviction is strict insertion order: when an insert pushes the store past
//! its limit, the single oldest-inserted entity is dropped. Overwriting an
//! existing entity's snapshot does not move it in the eviction queue --
//! updating data is not re-inserting.

use std::collections::{BTreeMap, VecDeque};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use spyglass_types::{EntityId, OpaqueRef, Snapshot, WeakRef};

use crate::config::DEFAULT_MAX_ENTITIES;
use crate::live_row::LiveRow;

/// One entity's paired rows.
struct EntityRecord {
    snapshot: Snapshot,
    live: Arc<RwLock<LiveRow>>,
}

/// Map, eviction queue, and limit behind one lock so they can never drift
/// out of step.
struct StoreInner {
    entities: BTreeMap<EntityId, EntityRecord>,
    order: VecDeque<EntityId>,
    max_entities: usize,
}

/// Bounded mapping from entity id to (snapshot, live-reference row).
///
/// All operations are synchronous and total. Writes to one entity's paired
/// rows are mutually exclusive with reads of that entity; component-handle
/// updates for different entities proceed concurrently because each
/// [`LiveRow`] sits behind its own lock.
pub struct SnapshotStore {
    inner: RwLock<StoreInner>,
}

impl SnapshotStore {
    /// Create a store bounded at `max_entities`.
    pub fn new(max_entities: usize) -> Self {
        Self {
            inner: RwLock::new(StoreInner {
                entities: BTreeMap::new(),
                order: VecDeque::new(),
                max_entities,
            }),
        }
    }

    /// A poisoned lock still holds consistent advisory data; an inspection
    /// cache must keep answering, so poisoning is absorbed rather than
    /// propagated.
    fn read_inner(&self) -> RwLockReadGuard<'_, StoreInner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_inner(&self) -> RwLockWriteGuard<'_, StoreInner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Store a fresh snapshot and its live component handles for `id`,
    /// replacing any existing entry wholesale.
    ///
    /// A brand-new id joins the back of the eviction queue; an overwrite
    /// keeps its original queue position. If the insert pushes the store
    /// past its limit, the oldest-inserted entity is evicted together with
    /// its live row.
    pub fn put(&self, id: EntityId, snapshot: Snapshot, live_refs: BTreeMap<String, WeakRef>) {
        let mut inner = self.write_inner();

        let record = EntityRecord {
            snapshot,
            live: Arc::new(RwLock::new(LiveRow::from_handles(live_refs))),
        };
        if inner.entities.insert(id, record).is_none() {
            inner.order.push_back(id);
        }

        while inner.entities.len() > inner.max_entities {
            let Some(oldest) = inner.order.pop_front() else {
                break;
            };
            if inner.entities.remove(&oldest).is_some() {
                tracing::debug!(entity = %oldest, "evicted oldest entity snapshot");
            }
        }
    }

    /// The stored snapshot for `id`, cloned. Never a live view.
    pub fn get(&self, id: EntityId) -> Option<Snapshot> {
        self.read_inner()
            .entities
            .get(&id)
            .map(|record| record.snapshot.clone())
    }

    /// Delete both rows for `id`. Silently idempotent.
    pub fn remove(&self, id: EntityId) {
        let mut inner = self.write_inner();
        if inner.entities.remove(&id).is_some() {
            inner.order.retain(|queued| *queued != id);
            tracing::debug!(entity = %id, "removed entity snapshot");
        }
    }

    /// A consistent point-in-time copy of every stored snapshot, in
    /// insertion order.
    pub fn all(&self) -> Vec<Snapshot> {
        let inner = self.read_inner();
        inner
            .order
            .iter()
            .filter_map(|id| inner.entities.get(id))
            .map(|record| record.snapshot.clone())
            .collect()
    }

    /// Number of stored entities.
    pub fn count(&self) -> usize {
        self.read_inner().entities.len()
    }

    /// Overwrite one component's live handle for `id`, leaving its sibling
    /// handles untouched. A handle for an unknown entity is dropped with a
    /// log line; the row only exists alongside a snapshot.
    pub fn put_live_component(&self, id: EntityId, component: &str, handle: WeakRef) {
        let row = self
            .read_inner()
            .entities
            .get(&id)
            .map(|record| Arc::clone(&record.live));
        match row {
            Some(row) => {
                row.write()
                    .unwrap_or_else(PoisonError::into_inner)
                    .put(component, handle);
            }
            None => {
                tracing::debug!(entity = %id, component, "dropped live handle for unknown entity");
            }
        }
    }

    /// Resolve a component's live object for `id`.
    ///
    /// Returns `None` for an unknown entity, an unknown component, or a
    /// handle whose object the simulation has already reclaimed.
    pub fn live_component(&self, id: EntityId, component: &str) -> Option<OpaqueRef> {
        let row = self
            .read_inner()
            .entities
            .get(&id)
            .map(|record| Arc::clone(&record.live))?;
        let resolved = row
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .resolve(component);
        resolved
    }

    /// Change the entity limit. Applies lazily at the next insert's
    /// eviction check; a downward change does not evict immediately.
    pub fn set_max_entities(&self, max_entities: usize) {
        self.write_inner().max_entities = max_entities;
    }

    /// Drop every snapshot and live row.
    pub fn clear(&self) {
        let mut inner = self.write_inner();
        inner.entities.clear();
        inner.order.clear();
        tracing::debug!("cleared entity snapshot store");
    }
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ENTITIES)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use spyglass_types::{ComponentData, Inspect, Orientation, Position, Value};
    use uuid::Uuid;

    use super::*;

    struct Marker(&'static str);

    impl Inspect for Marker {
        fn type_name(&self) -> &str {
            self.0
        }

        fn lookup(&self, _field: &str) -> Option<Value> {
            None
        }

        fn field_names(&self) -> Vec<String> {
            Vec::new()
        }
    }

    fn snapshot_for(id: u64) -> Snapshot {
        Snapshot::new(
            EntityId::from_raw(id),
            Uuid::new_v4(),
            "npc:test",
            Position { x: 0.0, y: 0.0, z: 0.0 },
            Orientation { yaw: 0.0, pitch: 0.0 },
            BTreeMap::from([(
                String::from("Health"),
                ComponentData::new("Health", BTreeMap::new()),
            )]),
        )
    }

    fn put_plain(store: &SnapshotStore, id: u64) {
        store.put(EntityId::from_raw(id), snapshot_for(id), BTreeMap::new());
    }

    #[test]
    fn overflow_evicts_exactly_the_oldest() {
        let store = SnapshotStore::new(3);
        for id in 1..=4 {
            put_plain(&store, id);
        }
        assert_eq!(store.count(), 3);
        assert!(store.get(EntityId::from_raw(1)).is_none());
        for id in 2..=4 {
            assert!(store.get(EntityId::from_raw(id)).is_some());
        }
    }

    #[test]
    fn overwrite_keeps_eviction_position() {
        let store = SnapshotStore::new(2);
        put_plain(&store, 1);
        put_plain(&store, 2);
        // Updating entity 1 must not move it to the back of the queue.
        put_plain(&store, 1);
        put_plain(&store, 3);

        assert_eq!(store.count(), 2);
        assert!(store.get(EntityId::from_raw(1)).is_none());
        assert!(store.get(EntityId::from_raw(2)).is_some());
        assert!(store.get(EntityId::from_raw(3)).is_some());
    }

    #[test]
    fn remove_deletes_both_rows() {
        let object: Arc<dyn Inspect> = Arc::new(Marker("Health"));
        let store = SnapshotStore::new(10);
        let id = EntityId::from_raw(5);
        store.put(
            id,
            snapshot_for(5),
            BTreeMap::from([(String::from("Health"), Arc::downgrade(&object))]),
        );
        assert!(store.live_component(id, "Health").is_some());

        store.remove(id);
        assert!(store.get(id).is_none());
        assert!(store.live_component(id, "Health").is_none());

        // Idempotent.
        store.remove(id);
        assert_eq!(store.count(), 0);
    }

    #[test]
    fn eviction_drops_live_row_with_snapshot() {
        let object: Arc<dyn Inspect> = Arc::new(Marker("Health"));
        let store = SnapshotStore::new(1);
        let first = EntityId::from_raw(1);
        store.put(
            first,
            snapshot_for(1),
            BTreeMap::from([(String::from("Health"), Arc::downgrade(&object))]),
        );
        put_plain(&store, 2);

        assert!(store.live_component(first, "Health").is_none());
    }

    #[test]
    fn all_returns_insertion_ordered_copy() {
        let store = SnapshotStore::new(10);
        for id in [3, 1, 2] {
            put_plain(&store, id);
        }
        let ids: Vec<u64> = store.all().iter().map(|s| s.entity_id.into_inner()).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn limit_change_applies_on_next_insert() {
        let store = SnapshotStore::new(4);
        for id in 1..=4 {
            put_plain(&store, id);
        }
        store.set_max_entities(2);
        // No retroactive eviction.
        assert_eq!(store.count(), 4);

        put_plain(&store, 5);
        assert_eq!(store.count(), 2);
        assert!(store.get(EntityId::from_raw(4)).is_some());
        assert!(store.get(EntityId::from_raw(5)).is_some());
    }

    #[test]
    fn dead_component_handle_is_not_found() {
        let store = SnapshotStore::new(10);
        let id = EntityId::from_raw(1);
        put_plain(&store, 1);
        {
            let object: Arc<dyn Inspect> = Arc::new(Marker("Health"));
            store.put_live_component(id, "Health", Arc::downgrade(&object));
        }
        assert!(store.live_component(id, "Health").is_none());
    }
}
