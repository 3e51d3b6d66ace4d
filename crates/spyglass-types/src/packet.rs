//! Logged network packet records.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::ids::PacketId;

/// Which way a packet travelled over the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "lowercase")]
pub enum PacketDirection {
    /// Received from a remote peer.
    Inbound,
    /// Sent to a remote peer.
    Outbound,
}

/// Immutable record of one logged packet.
///
/// Entries are write-once: every `put` uses a fresh id and nothing updates
/// an entry in place. The captured field map serves as the static fallback
/// when the live packet object can no longer answer a path query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PacketEntry {
    /// Sequence number unique within this process run.
    pub id: PacketId,
    /// When the packet was logged.
    pub logged_at: DateTime<Utc>,
    /// Wire direction.
    pub direction: PacketDirection,
    /// Packet type name (e.g. `"ServerboundInteractPacket"`).
    pub packet_type: String,
    /// Numeric protocol type id.
    pub type_id: i32,
    /// Name of the handler that processed the packet.
    pub handler: String,
    /// Captured top-level field values, ordered by field name.
    pub fields: BTreeMap<String, serde_json::Value>,
}

impl PacketEntry {
    /// Build an entry logged at the current instant.
    pub fn new(
        id: PacketId,
        direction: PacketDirection,
        packet_type: impl Into<String>,
        type_id: i32,
        handler: impl Into<String>,
        fields: BTreeMap<String, serde_json::Value>,
    ) -> Self {
        Self {
            id,
            logged_at: Utc::now(),
            direction,
            packet_type: packet_type.into(),
            type_id,
            handler: handler.into(),
            fields,
        }
    }
}
