//! Inbound frame dispatcher.
//!
//! The dispatcher sits between the decoding transport and the plugins: it
//! receives decoded [`WireFrame`]s, keeps the link health flag current from
//! heartbeats, and invokes each matching handler whose admission filter
//! accepts the frame. Handlers are invoked synchronously and return
//! nothing; delivery is fire-and-forget.

use std::collections::HashMap;
use std::sync::Arc;

use mavbridge_types::{WireFrame, WireMessageKind};
use tracing::trace;

use crate::filter::InboundFilter;
use crate::link::LinkContext;
use crate::plugin::Plugin;

/// Handler descriptor a plugin registers for one wire message kind.
pub struct Subscription {
    /// Routing key this handler is interested in.
    pub kind: WireMessageKind,
    /// Admission predicate evaluated by the dispatcher before invocation.
    pub filter: Box<dyn InboundFilter>,
    /// The handler itself. Receives the full decoded frame.
    pub handler: Box<dyn Fn(&WireFrame) + Send + Sync>,
}

/// Routes decoded frames to registered plugin handlers.
pub struct Dispatcher {
    link: Arc<LinkContext>,
    handlers: HashMap<WireMessageKind, Vec<Subscription>>,
}

impl Dispatcher {
    pub fn new(link: Arc<LinkContext>) -> Self {
        Self {
            link,
            handlers: HashMap::new(),
        }
    }

    /// Collect and register a plugin's handler descriptors.
    pub fn attach(&mut self, plugin: &Arc<dyn Plugin>) {
        for subscription in plugin.subscriptions() {
            self.handlers
                .entry(subscription.kind)
                .or_default()
                .push(subscription);
        }
    }

    /// Deliver one decoded frame.
    ///
    /// A heartbeat from the bound system marks the link live before any
    /// filter runs, so the health predicate can pass from the first
    /// heartbeat onwards. Every registered handler for the frame's kind is
    /// then invoked iff its filter accepts the frame.
    pub fn dispatch(&self, frame: WireFrame) {
        if frame.message.kind() == WireMessageKind::Heartbeat
            && frame.header.system_id == self.link.target_system()
        {
            self.link.set_connected(true);
        }

        let Some(subscriptions) = self.handlers.get(&frame.message.kind()) else {
            trace!(kind = ?frame.message.kind(), "no handler for frame kind");
            return;
        };

        for subscription in subscriptions {
            if subscription.filter.accept(&frame.header, &self.link) {
                (subscription.handler)(&frame);
            }
        }
    }

    /// Number of registered handler descriptors, across all kinds.
    pub fn handler_count(&self) -> usize {
        self.handlers.values().map(Vec::len).sum()
    }
}
