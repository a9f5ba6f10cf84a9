//! Headless, topic-based publish/subscribe bus for direction-finding
//! reports.
//!
//! Uses [`tokio::sync::broadcast`] channels under the hood so that every
//! subscriber receives every message without any single subscriber blocking
//! the others.
//!
//! # Topics
//!
//! Traffic is partitioned into two directional [`Topic`] lanes:
//!
//! | Topic | Traffic |
//! |---|---|
//! | [`Topic::SignalIn`] | Stamped reports translated from inbound wire frames |
//! | [`Topic::SignalOut`] | Reports other participants want sent to the FCU |

use mavbridge_types::{BridgeError, RadioSignal};
use tokio::sync::broadcast;

/// Default channel capacity (number of buffered signals before old ones are
/// dropped for slow subscribers).
const DEFAULT_CAPACITY: usize = 256;

/// Enumeration of the bus lanes.
///
/// Publishers and subscribers reference a `Topic` variant to ensure signals
/// are delivered only to the correct directional channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    /// Wire → bus direction: reports received from the FCU, stamped with
    /// receive time by the inbound adapter.
    SignalIn,
    /// Bus → wire direction: reports to be re-encoded and transmitted.
    SignalOut,
}

/// Shared signal bus. Clone it cheaply – all clones share the same
/// underlying broadcast channels.
#[derive(Clone, Debug)]
pub struct SignalBus {
    signal_in: broadcast::Sender<RadioSignal>,
    signal_out: broadcast::Sender<RadioSignal>,
}

impl SignalBus {
    /// Create a new bus with the given channel capacity.
    ///
    /// The `capacity` is applied to every topic channel independently.
    pub fn new(capacity: usize) -> Self {
        let (signal_in, _) = broadcast::channel(capacity);
        let (signal_out, _) = broadcast::channel(capacity);
        Self {
            signal_in,
            signal_out,
        }
    }

    /// Publish `signal` to the given [`Topic`] channel.
    ///
    /// Returns the number of active receivers that were handed the signal,
    /// or [`BridgeError::Channel`] when no subscriber is currently listening
    /// on the topic. Publishers that treat delivery as best-effort may
    /// ignore that error.
    pub fn publish_to(&self, topic: Topic, signal: RadioSignal) -> Result<usize, BridgeError> {
        self.topic_sender(topic).send(signal).map_err(|_| {
            BridgeError::Channel(format!("no subscribers for topic {topic:?}"))
        })
    }

    /// Subscribe to a specific [`Topic`] channel.
    ///
    /// The returned [`TopicReceiver`] yields only signals published to that
    /// topic.
    pub fn subscribe_to(&self, topic: Topic) -> TopicReceiver {
        TopicReceiver {
            topic,
            receiver: self.topic_sender(topic).subscribe(),
        }
    }

    fn topic_sender(&self, topic: Topic) -> &broadcast::Sender<RadioSignal> {
        match topic {
            Topic::SignalIn => &self.signal_in,
            Topic::SignalOut => &self.signal_out,
        }
    }
}

impl Default for SignalBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

/// An async receiver bound to a single [`Topic`] channel.
///
/// Obtained via [`SignalBus::subscribe_to`].
pub struct TopicReceiver {
    topic: Topic,
    receiver: broadcast::Receiver<RadioSignal>,
}

impl TopicReceiver {
    /// Wait for the next signal on this topic.
    ///
    /// Returns:
    /// * `Ok(signal)` – a successfully received report.
    /// * `Err(broadcast::error::RecvError::Lagged(n))` – the subscriber fell
    ///   behind and `n` messages were dropped.  The caller decides whether
    ///   to continue or abort.
    /// * `Err(broadcast::error::RecvError::Closed)` – the bus has shut down.
    pub async fn recv(&mut self) -> Result<RadioSignal, broadcast::error::RecvError> {
        self.receiver.recv().await
    }

    /// Non-blocking variant of [`recv`][Self::recv], for drain-style use in
    /// tests and shutdown paths.
    pub fn try_recv(&mut self) -> Result<RadioSignal, broadcast::error::TryRecvError> {
        self.receiver.try_recv()
    }

    /// The [`Topic`] this receiver is bound to.
    pub fn topic(&self) -> Topic {
        self.topic
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn make_signal(rate: f32) -> RadioSignal {
        RadioSignal {
            stamp: Utc::now(),
            rate,
            heading: 90.0,
            level: -40.0,
        }
    }

    #[tokio::test]
    async fn publish_and_receive() -> Result<(), Box<dyn std::error::Error>> {
        let bus = SignalBus::default();
        let mut rx = bus.subscribe_to(Topic::SignalIn);

        let signal = make_signal(2.5);
        bus.publish_to(Topic::SignalIn, signal)?;

        let received = rx.recv().await?;
        assert_eq!(received, signal);
        Ok(())
    }

    #[tokio::test]
    async fn multiple_subscribers_receive_same_signal() -> Result<(), Box<dyn std::error::Error>> {
        let bus = SignalBus::default();
        let mut rx1 = bus.subscribe_to(Topic::SignalOut);
        let mut rx2 = bus.subscribe_to(Topic::SignalOut);

        let signal = make_signal(1.0);
        let delivered = bus.publish_to(Topic::SignalOut, signal)?;
        assert_eq!(delivered, 2);

        assert_eq!(rx1.recv().await?, signal);
        assert_eq!(rx2.recv().await?, signal);
        Ok(())
    }

    #[test]
    fn publish_no_subscribers_returns_error() {
        let bus = SignalBus::default();
        let result = bus.publish_to(Topic::SignalIn, make_signal(0.5));
        assert!(matches!(result, Err(BridgeError::Channel(_))));
    }

    /// A subscriber on `SignalOut` must not receive signals published to
    /// `SignalIn` because they are routed through separate channels.
    #[tokio::test]
    async fn subscriber_does_not_receive_other_topic_signals(
    ) -> Result<(), Box<dyn std::error::Error>> {
        let bus = SignalBus::default();
        let mut out_sub = bus.subscribe_to(Topic::SignalOut);

        // A subscriber on SignalIn so publish_to doesn't fail with SendError.
        let _in_sub = bus.subscribe_to(Topic::SignalIn);

        bus.publish_to(Topic::SignalIn, make_signal(3.0))?;

        let result = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            out_sub.recv(),
        )
        .await;

        assert!(
            result.is_err(),
            "SignalOut subscriber must not receive a SignalIn report"
        );
        Ok(())
    }

    /// Flooding a low-capacity channel while a subscriber sleeps must
    /// produce a `Lagged` error rather than panicking or blocking.
    #[tokio::test]
    async fn channel_lag_on_slow_subscriber() {
        const CAPACITY: usize = 64;
        let bus = SignalBus::new(CAPACITY);
        let mut slow_sub = bus.subscribe_to(Topic::SignalIn);

        for i in 0..10_000 {
            let _ = bus.publish_to(Topic::SignalIn, make_signal(i as f32));
        }

        let result = slow_sub.recv().await;
        assert!(
            matches!(result, Err(broadcast::error::RecvError::Lagged(_))),
            "expected Lagged error, got: {result:?}"
        );
    }

    #[test]
    fn receiver_reports_its_topic() {
        let bus = SignalBus::default();
        let rx = bus.subscribe_to(Topic::SignalOut);
        assert_eq!(rx.topic(), Topic::SignalOut);
    }
}
