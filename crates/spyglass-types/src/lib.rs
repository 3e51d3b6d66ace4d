//! Shared type definitions for the Spyglass inspection cache.
//!
//! This crate is the single source of truth for the types that flow between
//! the bounded stores, the path navigator, and the debugging client. Types
//! that cross to the client are exported to `TypeScript` via `ts-rs`.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe `u64` wrappers for entity and packet handles, and
//!   the monotonic packet id allocator
//! - [`snapshot`] -- Immutable point-in-time entity captures
//! - [`packet`] -- Immutable logged packet records
//! - [`value`] -- The closed [`Value`] union for resolved path results and
//!   the [`Inspect`] capability trait over live objects

pub mod ids;
pub mod packet;
pub mod snapshot;
pub mod value;

// Re-export all public types at crate root for convenience.
pub use ids::{EntityId, PacketId, PacketSequence};
pub use packet::{PacketDirection, PacketEntry};
pub use snapshot::{ComponentData, Orientation, Position, Snapshot};
pub use value::{Inspect, OpaqueRef, Value, WeakRef};
