//! Bounded stores and eviction policy for the Spyglass inspection cache.
//!
//! This crate owns the cache's memory discipline: both stores are hard
//! bounded, evict in strict insertion order on overflow, and never hold a
//! strong reference that would keep a simulation entity alive. Everything
//! here is synchronous and total; a bad query answers `None`, never panics.
//!
//! # Modules
//!
//! - [`config`] -- Store limits and the YAML loader
//! - [`live_row`] -- Per-entity weak component handle rows
//! - [`snapshot_store`] -- Bounded snapshot + live-row store, FIFO eviction
//! - [`packet_store`] -- Bounded write-once packet store, explicit FIFO queue

pub mod config;
pub mod live_row;
pub mod packet_store;
pub mod snapshot_store;

// Re-export primary types at crate root.
pub use config::{CacheConfig, ConfigError, DEFAULT_MAX_ENTITIES, DEFAULT_MAX_PACKETS};
pub use live_row::LiveRow;
pub use packet_store::PacketStore;
pub use snapshot_store::SnapshotStore;
