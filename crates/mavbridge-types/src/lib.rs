//! Shared message shapes and the workspace error type.
//!
//! The two signal shapes are structurally identical apart from the
//! timestamp: the wire record ([`RadioSignalFrame`]) carries no time field,
//! while the bus message ([`RadioSignal`]) is stamped with receive time by
//! the inbound adapter.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fixed-layout RADIO_SIGNAL record as carried on the point-to-point link.
///
/// The wire format transmits no timestamp; all three fields are copied
/// verbatim in both translation directions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RadioSignalFrame {
    /// Pulse rate reported by the direction finder.
    pub rate: f32,
    /// Bearing to the signal source, degrees.
    pub heading: f32,
    /// Received signal level, dB.
    pub level: f32,
}

/// Direction-finding report as published on the internal signal bus.
///
/// `stamp` is set by the inbound adapter at translation time; the outbound
/// path never reads it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RadioSignal {
    pub stamp: DateTime<Utc>,
    pub rate: f32,
    pub heading: f32,
    pub level: f32,
}

/// HEARTBEAT payload. Its arrival from the bound system marks the link live.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeartbeatFrame {
    pub system_status: u8,
}

/// Source identity of a decoded frame, taken from the link-layer header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireHeader {
    pub system_id: u8,
    pub component_id: u8,
}

/// Decoded payload variants the dispatcher routes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum WireMessage {
    RadioSignal(RadioSignalFrame),
    Heartbeat(HeartbeatFrame),
}

/// Routing key for handler registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WireMessageKind {
    RadioSignal,
    Heartbeat,
}

impl WireMessage {
    /// The routing key for this payload.
    pub fn kind(&self) -> WireMessageKind {
        match self {
            WireMessage::RadioSignal(_) => WireMessageKind::RadioSignal,
            WireMessage::Heartbeat(_) => WireMessageKind::Heartbeat,
        }
    }
}

/// A decoded frame as delivered by the dispatcher: header plus payload.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WireFrame {
    pub header: WireHeader,
    pub message: WireMessage,
}

/// Workspace error type spanning bus, registry, and config failures.
///
/// The translation adapters themselves define no error kinds; these variants
/// belong to the seams around them. Wire transmission has no variant at all:
/// the transport seam is fire-and-forget and owns its own failures.
#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Bus Channel Error: {0}")]
    Channel(String),

    #[error("Config Error: {0}")]
    Config(String),

    #[error("Plugin '{0}' is not registered")]
    UnknownPlugin(String),

    #[error("Plugin '{0}' is already registered")]
    DuplicatePlugin(String),
}
