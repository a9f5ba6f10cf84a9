//! `mavbridge-link` – the MAVLink side of the bridge.
//!
//! Everything that touches the point-to-point avionics link lives here:
//!
//! - [`clock`] – time source seam used to stamp inbound reports.
//! - [`config`] – bridge identities and channel sizing, loaded from TOML.
//! - [`link`] – outbound transport seam and the shared [`LinkContext`].
//! - [`filter`] – named inbound admission predicates and their combinator.
//! - [`dispatcher`] – routes decoded frames to registered plugin handlers.
//! - [`plugin`] – plugin trait, explicit name→factory registry, and the
//!   [`BridgeHost`][plugin::BridgeHost] startup wiring.
//! - [`direction_finder`] – the radio direction-finding bridge plugin.

pub mod clock;
pub mod config;
pub mod direction_finder;
pub mod dispatcher;
pub mod filter;
pub mod link;
pub mod plugin;

pub use clock::{Clock, SystemClock};
pub use config::BridgeConfig;
pub use direction_finder::DirectionFinderPlugin;
pub use dispatcher::{Dispatcher, Subscription};
pub use filter::{all_of, InboundFilter, LinkHealthFilter, SourceSystemFilter};
pub use link::{ChannelTransport, LinkContext, WireTransmitter};
pub use plugin::{default_registry, BridgeHost, Plugin, PluginRegistry};
