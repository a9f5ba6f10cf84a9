//! Outbound transport seam and the shared link context.
//!
//! [`LinkContext`] is what plugins hold: it supplies current time, outbound
//! transmission, the bound FCU identity, and the link health flag. The
//! context itself owns no transport internals – those live behind the
//! [`WireTransmitter`] trait.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use mavbridge_types::{WireFrame, WireHeader, WireMessage};
use tokio::sync::mpsc;
use tracing::warn;

use crate::clock::Clock;
use crate::config::BridgeConfig;

/// Hands an encoded frame to the point-to-point link.
///
/// Transmission is fire-and-forget from the caller's perspective: failure
/// handling (link down, buffer full) is entirely the transport's concern,
/// and callers never observe it.
pub trait WireTransmitter: Send + Sync {
    fn transmit(&self, frame: WireFrame);
}

/// In-process transport backed by an unbounded channel.
///
/// The consumer side is whatever task drains frames onto the physical link;
/// in tests it is simply inspected.
pub struct ChannelTransport {
    tx: mpsc::UnboundedSender<WireFrame>,
}

impl ChannelTransport {
    /// Create a transport and the receiver its frames arrive on.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<WireFrame>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl WireTransmitter for ChannelTransport {
    fn transmit(&self, frame: WireFrame) {
        if self.tx.send(frame).is_err() {
            warn!("wire transport closed, dropping outbound frame");
        }
    }
}

/// Shared link context handed to every plugin.
///
/// Provides the three collaborator operations the adapters need – current
/// time, outbound transmission, inbound admission state – without exposing
/// transport internals.
pub struct LinkContext {
    config: BridgeConfig,
    clock: Arc<dyn Clock>,
    transmitter: Arc<dyn WireTransmitter>,
    connected: AtomicBool,
}

impl LinkContext {
    pub fn new(
        config: BridgeConfig,
        clock: Arc<dyn Clock>,
        transmitter: Arc<dyn WireTransmitter>,
    ) -> Self {
        Self {
            config,
            clock,
            transmitter,
            connected: AtomicBool::new(false),
        }
    }

    /// Current time as supplied by the configured clock.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Wrap `message` in a header carrying the bridge's own identity and
    /// hand it to the transport. Fire-and-forget.
    pub fn transmit(&self, message: WireMessage) {
        let frame = WireFrame {
            header: WireHeader {
                system_id: self.config.system_id,
                component_id: self.config.component_id,
            },
            message,
        };
        self.transmitter.transmit(frame);
    }

    /// System id of the FCU this bridge is bound to.
    pub fn target_system(&self) -> u8 {
        self.config.target_system_id
    }

    /// Whether the bound system is currently considered alive.
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Relaxed)
    }

    /// Update the link health flag. Set by the dispatcher on heartbeat;
    /// hosts clear it on their own timeout policy.
    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::Relaxed);
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }
}
