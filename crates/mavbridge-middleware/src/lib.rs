//! `mavbridge-middleware` – the internal signal bus.
//!
//! Routes direction-finding reports between the link-side adapters and any
//! other bus participant without caring where they came from.
//!
//! # Modules
//!
//! - [`bus`] – Headless, topic-based publish/subscribe bus built on Tokio
//!   broadcast channels, carrying [`RadioSignal`][mavbridge_types::RadioSignal]
//!   values on two directional lanes.

pub mod bus;

pub use bus::{SignalBus, Topic, TopicReceiver};
