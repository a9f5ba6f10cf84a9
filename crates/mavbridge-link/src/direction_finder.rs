//! Radio direction-finding bridge plugin.
//!
//! Translates RADIO_SIGNAL reports field-for-field between the wire link
//! and the signal bus:
//!
//! * **Inbound** – an accepted wire frame is stamped with receive time and
//!   published on [`Topic::SignalIn`].
//! * **Outbound** – a report delivered on [`Topic::SignalOut`] is re-encoded
//!   (stamp dropped, the wire format has no field for it) and handed to the
//!   link transport.
//!
//! Both paths are stateless per-event mappings; the plugin holds only its
//! collaborator handles, so concurrent invocations never contend.

use std::sync::Arc;

use mavbridge_middleware::{SignalBus, Topic, TopicReceiver};
use mavbridge_types::{RadioSignal, RadioSignalFrame, WireMessage, WireMessageKind};
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

use crate::dispatcher::Subscription;
use crate::filter::{all_of, LinkHealthFilter, SourceSystemFilter};
use crate::link::LinkContext;
use crate::plugin::Plugin;

/// Stable registry name of this plugin.
pub const PLUGIN_NAME: &str = "direction_finder";

/// Bidirectional RADIO_SIGNAL ↔ bus translator.
///
/// Cheap to clone – both fields are shared handles.
#[derive(Clone)]
pub struct DirectionFinderPlugin {
    link: Arc<LinkContext>,
    bus: Arc<SignalBus>,
}

impl DirectionFinderPlugin {
    pub fn new(link: Arc<LinkContext>, bus: Arc<SignalBus>) -> Self {
        Self { link, bus }
    }

    /// Inbound path: stamp the decoded report with current time, copy the
    /// three fields verbatim, and publish on [`Topic::SignalIn`].
    ///
    /// Invoked by the dispatcher only for frames that passed the
    /// source-system and link-health filters; no re-validation happens
    /// here. Publication is fire-and-forget – an empty topic is a normal
    /// condition, not a failure.
    pub fn handle_radio_signal(&self, frame: &RadioSignalFrame) {
        let signal = RadioSignal {
            stamp: self.link.now(),
            rate: frame.rate,
            heading: frame.heading,
            level: frame.level,
        };

        if self.bus.publish_to(Topic::SignalIn, signal).is_err() {
            trace!("no listeners for inbound radio signal");
        }
    }

    /// Outbound path: copy the three fields verbatim into a wire record and
    /// hand it to the link. The bus-side stamp is dropped – the wire format
    /// carries no timestamp.
    pub fn send_radio_signal(&self, signal: &RadioSignal) {
        debug!(
            rate = signal.rate,
            heading = signal.heading,
            level = signal.level,
            "radio signal out"
        );

        let frame = RadioSignalFrame {
            rate: signal.rate,
            heading: signal.heading,
            level: signal.level,
        };
        self.link.transmit(WireMessage::RadioSignal(frame));
    }

    /// Pump loop feeding [`Topic::SignalOut`] into the link, one transmit
    /// per delivered report. Exits when the bus shuts down.
    async fn run_outbound(self, mut rx: TopicReceiver) {
        loop {
            match rx.recv().await {
                Ok(signal) => self.send_radio_signal(&signal),
                Err(RecvError::Lagged(n)) => {
                    warn!(lagged_by = n, "outbound radio-signal subscriber lagged");
                }
                Err(RecvError::Closed) => break,
            }
        }
    }
}

impl Plugin for DirectionFinderPlugin {
    fn name(&self) -> &'static str {
        PLUGIN_NAME
    }

    fn subscriptions(&self) -> Vec<Subscription> {
        let plugin = self.clone();
        vec![Subscription {
            kind: WireMessageKind::RadioSignal,
            filter: all_of(vec![
                Box::new(SourceSystemFilter),
                Box::new(LinkHealthFilter),
            ]),
            handler: Box::new(move |frame| {
                if let WireMessage::RadioSignal(signal) = &frame.message {
                    plugin.handle_radio_signal(signal);
                }
            }),
        }]
    }

    fn spawn_tasks(&self) -> Vec<JoinHandle<()>> {
        // Subscribe before the task starts so no report published between
        // startup and the first poll is missed.
        let rx = self.bus.subscribe_to(Topic::SignalOut);
        vec![tokio::spawn(self.clone().run_outbound(rx))]
    }
}
