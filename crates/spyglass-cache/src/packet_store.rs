//! Bounded packet store with an explicit FIFO age queue.
//!
//! Unlike the entity store, packets are write-once: every `put` carries a
//! fresh id and nothing updates an entry in place. The store holds the only
//! remaining strong reference to a logged packet object; the bounded queue
//! is what keeps that retention from growing without limit.
//!
//! Eviction is strict insertion order and deliberately ignores access
//! recency: the queue head goes first even if it was queried a moment ago.

use std::collections::{BTreeMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};

use spyglass_types::{OpaqueRef, PacketEntry, PacketId};

use crate::config::DEFAULT_MAX_PACKETS;

/// One logged packet: the immutable entry plus the live object.
struct PacketRecord {
    entry: PacketEntry,
    object: OpaqueRef,
}

struct PacketInner {
    packets: BTreeMap<PacketId, PacketRecord>,
    order: VecDeque<PacketId>,
    max_packets: usize,
}

/// Bounded mapping from packet id to (entry, live packet object).
///
/// All writes serialize through one mutex so the age queue and the backing
/// map can never disagree about which ids exist.
pub struct PacketStore {
    inner: Mutex<PacketInner>,
}

impl PacketStore {
    /// Create a store bounded at `max_packets`.
    pub fn new(max_packets: usize) -> Self {
        Self {
            inner: Mutex::new(PacketInner {
                packets: BTreeMap::new(),
                order: VecDeque::new(),
                max_packets,
            }),
        }
    }

    fn lock_inner(&self) -> MutexGuard<'_, PacketInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Store a logged packet.
    ///
    /// A `None` object is a rejected write: logged and dropped, the store
    /// unchanged. Entries are write-once, so a duplicate id is likewise
    /// rejected. An accepted insert may evict the queue head.
    pub fn put(&self, entry: PacketEntry, object: Option<OpaqueRef>) {
        let Some(object) = object else {
            tracing::warn!(packet = %entry.id, packet_type = %entry.packet_type,
                "rejected packet log with no object");
            return;
        };

        let mut inner = self.lock_inner();
        if inner.packets.contains_key(&entry.id) {
            tracing::warn!(packet = %entry.id, "rejected duplicate packet id");
            return;
        }

        let id = entry.id;
        inner.packets.insert(id, PacketRecord { entry, object });
        inner.order.push_back(id);

        while inner.packets.len() > inner.max_packets {
            let Some(oldest) = inner.order.pop_front() else {
                break;
            };
            if inner.packets.remove(&oldest).is_some() {
                tracing::debug!(packet = %oldest, "evicted oldest packet");
            }
        }
    }

    /// The immutable entry for `id`, cloned.
    pub fn get(&self, id: PacketId) -> Option<PacketEntry> {
        self.lock_inner()
            .packets
            .get(&id)
            .map(|record| record.entry.clone())
    }

    /// The live packet object for `id`.
    pub fn object(&self, id: PacketId) -> Option<OpaqueRef> {
        self.lock_inner()
            .packets
            .get(&id)
            .map(|record| OpaqueRef::clone(&record.object))
    }

    /// Number of stored packets.
    pub fn count(&self) -> usize {
        self.lock_inner().packets.len()
    }

    /// Change the packet limit. Applies lazily at the next insert's
    /// eviction check.
    pub fn set_max_packets(&self, max_packets: usize) {
        self.lock_inner().max_packets = max_packets;
    }

    /// Drop every packet entry and object.
    pub fn clear(&self) {
        let mut inner = self.lock_inner();
        inner.packets.clear();
        inner.order.clear();
        tracing::debug!("cleared packet store");
    }
}

impl Default for PacketStore {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_PACKETS)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use spyglass_types::{Inspect, PacketDirection, Value};

    use super::*;

    struct RawPacket;

    impl Inspect for RawPacket {
        fn type_name(&self) -> &str {
            "RawPacket"
        }

        fn lookup(&self, _field: &str) -> Option<Value> {
            None
        }

        fn field_names(&self) -> Vec<String> {
            Vec::new()
        }
    }

    fn entry_for(id: u64) -> PacketEntry {
        PacketEntry::new(
            PacketId::from_raw(id),
            PacketDirection::Inbound,
            "TestPacket",
            0x01,
            "TestHandler",
            BTreeMap::new(),
        )
    }

    fn put_live(store: &PacketStore, id: u64) {
        store.put(entry_for(id), Some(Arc::new(RawPacket)));
    }

    #[test]
    fn rejects_missing_object() {
        let store = PacketStore::new(10);
        store.put(entry_for(1), None);
        assert_eq!(store.count(), 0);
        assert!(store.get(PacketId::from_raw(1)).is_none());
    }

    #[test]
    fn rejects_duplicate_id() {
        let store = PacketStore::new(10);
        put_live(&store, 1);
        let mut altered = entry_for(1);
        altered.handler = String::from("OtherHandler");
        store.put(altered, Some(Arc::new(RawPacket)));

        assert_eq!(store.count(), 1);
        let kept = store.get(PacketId::from_raw(1));
        assert!(kept.is_some_and(|e| e.handler == "TestHandler"));
    }

    #[test]
    fn strict_fifo_eviction_ignores_queries() {
        let store = PacketStore::new(3);
        for id in 1..=3 {
            put_live(&store, id);
        }
        // Query the head right before overflow; it must still go first.
        assert!(store.get(PacketId::from_raw(1)).is_some());
        put_live(&store, 4);

        assert_eq!(store.count(), 3);
        assert!(store.get(PacketId::from_raw(1)).is_none());
        for id in 2..=4 {
            assert!(store.get(PacketId::from_raw(id)).is_some());
        }
    }

    #[test]
    fn overflow_by_one_probed_before_and_after() {
        let store = PacketStore::new(2);
        put_live(&store, 1);
        assert!(store.get(PacketId::from_raw(1)).is_some());
        put_live(&store, 2);
        assert!(store.get(PacketId::from_raw(1)).is_some());
        put_live(&store, 3);
        assert!(store.get(PacketId::from_raw(1)).is_none());
        assert!(store.get(PacketId::from_raw(2)).is_some());
        assert!(store.get(PacketId::from_raw(3)).is_some());
    }

    #[test]
    fn object_returns_stored_handle() {
        let store = PacketStore::new(10);
        let object: Arc<dyn Inspect> = Arc::new(RawPacket);
        store.put(entry_for(1), Some(Arc::clone(&object)));

        let stored = store.object(PacketId::from_raw(1));
        assert!(stored.is_some_and(|o| Arc::ptr_eq(&o, &object)));
        assert!(store.object(PacketId::from_raw(99)).is_none());
    }

    #[test]
    fn limit_change_applies_on_next_insert() {
        let store = PacketStore::new(4);
        for id in 1..=4 {
            put_live(&store, id);
        }
        store.set_max_packets(2);
        assert_eq!(store.count(), 4);

        put_live(&store, 5);
        assert_eq!(store.count(), 2);
    }
}
