//! Type-safe identifier wrappers for entities and packets.
//!
//! Entity ids are assigned by the simulation engine and are stable for the
//! entity's lifetime; this crate never generates them. Packet ids are a
//! process-lifetime monotonic sequence allocated through [`PacketSequence`],
//! which is owned by whoever owns the packet store rather than living in
//! ambient global state.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Generates a newtype wrapper around `u64` with standard derives.
macro_rules! define_handle {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(pub u64);

        impl $name {
            /// Wrap a raw externally-assigned handle value.
            pub const fn from_raw(raw: u64) -> Self {
                Self(raw)
            }

            /// Return the inner `u64` value.
            pub const fn into_inner(self) -> u64 {
                self.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(raw: u64) -> Self {
                Self(raw)
            }
        }

        impl From<$name> for u64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_handle! {
    /// Opaque handle for a simulation entity, assigned by the engine.
    EntityId
}

define_handle! {
    /// Monotonically increasing sequence number for a logged packet,
    /// unique within one process run.
    PacketId
}

/// Allocator for [`PacketId`] values.
///
/// Hands out ids starting at 1 in strictly increasing order. Safe to share
/// between threads; allocation never blocks.
#[derive(Debug)]
pub struct PacketSequence {
    next: AtomicU64,
}

impl PacketSequence {
    /// Create a sequence starting at id 1.
    pub const fn new() -> Self {
        Self {
            next: AtomicU64::new(1),
        }
    }

    /// Allocate the next packet id.
    pub fn next_id(&self) -> PacketId {
        PacketId(self.next.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for PacketSequence {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_id_round_trip() {
        let id = EntityId::from_raw(42);
        assert_eq!(id.into_inner(), 42);
        assert_eq!(id.to_string(), "42");
        assert_eq!(EntityId::from(42_u64), id);
    }

    #[test]
    fn packet_sequence_is_monotonic() {
        let seq = PacketSequence::new();
        let first = seq.next_id();
        let second = seq.next_id();
        assert_eq!(first, PacketId(1));
        assert_eq!(second, PacketId(2));
        assert!(first < second);
    }
}
