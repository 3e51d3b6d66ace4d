//! Per-entity rows of weak handles to live component objects.
//!
//! A row never owns the components it points at: the simulation engine keeps
//! the only strong references, and a handle whose object has been reclaimed
//! simply resolves to `None`. At this layer a dead handle is
//! indistinguishable from one that was never stored.

use std::collections::BTreeMap;

use spyglass_types::{OpaqueRef, WeakRef};

/// One entity's component-name to weak-handle map.
///
/// Rows live behind their own lock (see
/// [`SnapshotStore`](crate::snapshot_store::SnapshotStore)), so updating one
/// entity's handles never contends with another entity's readers.
#[derive(Default)]
pub struct LiveRow {
    handles: BTreeMap<String, WeakRef>,
}

impl LiveRow {
    /// Create an empty row.
    pub const fn new() -> Self {
        Self {
            handles: BTreeMap::new(),
        }
    }

    /// Build a row from an initial component-name to handle map.
    pub const fn from_handles(handles: BTreeMap<String, WeakRef>) -> Self {
        Self { handles }
    }

    /// Overwrite one component's handle without touching its siblings.
    pub fn put(&mut self, component: impl Into<String>, handle: WeakRef) {
        self.handles.insert(component.into(), handle);
    }

    /// Resolve a component's live object.
    ///
    /// Returns `None` when the component was never stored or when the
    /// producer has since dropped the object.
    pub fn resolve(&self, component: &str) -> Option<OpaqueRef> {
        self.handles.get(component).and_then(WeakRef::upgrade)
    }

    /// Number of stored handles, dead ones included.
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Whether the row holds no handles at all.
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use spyglass_types::{Inspect, Value};

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

    #[test]
    fn resolve_live_handle() {
        let object: Arc<dyn Inspect> = Arc::new(Marker("Health"));
        let mut row = LiveRow::new();
        row.put("Health", Arc::downgrade(&object));

        let resolved = row.resolve("Health");
        assert!(resolved.is_some_and(|o| o.type_name() == "Health"));
    }

    #[test]
    fn dead_handle_reads_as_absent() {
        let mut row = LiveRow::new();
        {
            let object: Arc<dyn Inspect> = Arc::new(Marker("Health"));
            row.put("Health", Arc::downgrade(&object));
        }
        // The producer dropped its strong reference.
        assert!(row.resolve("Health").is_none());
        assert!(row.resolve("NeverStored").is_none());
    }

    #[test]
    fn put_overwrites_single_component() {
        let a: Arc<dyn Inspect> = Arc::new(Marker("A"));
        let b: Arc<dyn Inspect> = Arc::new(Marker("B"));
        let b2: Arc<dyn Inspect> = Arc::new(Marker("B2"));

        let mut row = LiveRow::new();
        row.put("A", Arc::downgrade(&a));
        row.put("B", Arc::downgrade(&b));
        row.put("B", Arc::downgrade(&b2));

        assert_eq!(row.len(), 2);
        assert!(row.resolve("A").is_some_and(|o| o.type_name() == "A"));
        assert!(row.resolve("B").is_some_and(|o| o.type_name() == "B2"));
    }
}
