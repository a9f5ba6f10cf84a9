//! Plugin trait, explicit registry, and host startup wiring.
//!
//! Registration is an explicit call made during host startup – there is no
//! load-time self-registration, so registration order is deterministic and
//! the registry is trivially testable.

use std::collections::BTreeMap;
use std::sync::Arc;

use mavbridge_types::BridgeError;
use mavbridge_middleware::SignalBus;
use tokio::task::JoinHandle;
use tracing::info;

use crate::clock::Clock;
use crate::config::BridgeConfig;
use crate::direction_finder::{self, DirectionFinderPlugin};
use crate::dispatcher::{Dispatcher, Subscription};
use crate::link::{LinkContext, WireTransmitter};

/// A bridge plugin: a set of inbound handler descriptors plus any
/// long-running tasks (e.g. an outbound subscription pump).
pub trait Plugin: Send + Sync {
    /// Stable name the plugin is registered under.
    fn name(&self) -> &'static str;

    /// Handler descriptors the dispatcher should register.
    fn subscriptions(&self) -> Vec<Subscription>;

    /// Spawn the plugin's background tasks, if any. Requires a running
    /// Tokio runtime.
    fn spawn_tasks(&self) -> Vec<JoinHandle<()>> {
        Vec::new()
    }
}

/// Factory producing a plugin wired to its collaborator handles.
pub type PluginFactory = fn(Arc<LinkContext>, Arc<SignalBus>) -> Arc<dyn Plugin>;

/// Explicit name → factory registry.
#[derive(Default)]
pub struct PluginRegistry {
    factories: BTreeMap<&'static str, PluginFactory>,
}

impl PluginRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::DuplicatePlugin`] when the name is taken –
    /// plugin names are stable identities, silently replacing one would
    /// hide a wiring mistake.
    pub fn register(&mut self, name: &'static str, factory: PluginFactory) -> Result<(), BridgeError> {
        if self.factories.contains_key(name) {
            return Err(BridgeError::DuplicatePlugin(name.to_string()));
        }
        self.factories.insert(name, factory);
        Ok(())
    }

    /// Instantiate the plugin registered under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::UnknownPlugin`] when no factory is registered
    /// under that name.
    pub fn create(
        &self,
        name: &str,
        link: Arc<LinkContext>,
        bus: Arc<SignalBus>,
    ) -> Result<Arc<dyn Plugin>, BridgeError> {
        match self.factories.get(name) {
            Some(factory) => Ok(factory(link, bus)),
            None => Err(BridgeError::UnknownPlugin(name.to_string())),
        }
    }

    /// Registered names, in deterministic (sorted) order.
    pub fn names(&self) -> Vec<&'static str> {
        self.factories.keys().copied().collect()
    }
}

/// Registry holding every plugin this workspace ships.
///
/// Hosts that only need a subset build their own registry with explicit
/// [`PluginRegistry::register`] calls.
pub fn default_registry() -> PluginRegistry {
    let mut registry = PluginRegistry::new();
    registry
        .register(direction_finder::PLUGIN_NAME, |link, bus| {
            Arc::new(DirectionFinderPlugin::new(link, bus))
        })
        .expect("default registry has no duplicate names");
    registry
}

/// A fully wired bridge: bus, link context, dispatcher, and the
/// instantiated plugins with their background tasks running.
pub struct BridgeHost {
    link: Arc<LinkContext>,
    bus: Arc<SignalBus>,
    dispatcher: Dispatcher,
    plugins: Vec<Arc<dyn Plugin>>,
    tasks: Vec<JoinHandle<()>>,
}

impl BridgeHost {
    /// Wire up the bridge from its collaborators and start every registered
    /// plugin. Requires a running Tokio runtime for the plugins' tasks.
    pub fn start(
        config: BridgeConfig,
        clock: Arc<dyn Clock>,
        transmitter: Arc<dyn WireTransmitter>,
        registry: &PluginRegistry,
    ) -> Result<Self, BridgeError> {
        let bus = Arc::new(SignalBus::new(config.channel_capacity));
        let link = Arc::new(LinkContext::new(config, clock, transmitter));
        let mut dispatcher = Dispatcher::new(Arc::clone(&link));

        let mut plugins = Vec::new();
        let mut tasks = Vec::new();
        for name in registry.names() {
            let plugin = registry.create(name, Arc::clone(&link), Arc::clone(&bus))?;
            dispatcher.attach(&plugin);
            tasks.extend(plugin.spawn_tasks());
            info!(plugin = name, "plugin started");
            plugins.push(plugin);
        }

        Ok(Self {
            link,
            bus,
            dispatcher,
            plugins,
            tasks,
        })
    }

    /// Deliver one decoded inbound frame.
    pub fn dispatch(&self, frame: mavbridge_types::WireFrame) {
        self.dispatcher.dispatch(frame);
    }

    pub fn bus(&self) -> &Arc<SignalBus> {
        &self.bus
    }

    pub fn link(&self) -> &Arc<LinkContext> {
        &self.link
    }

    pub fn plugins(&self) -> &[Arc<dyn Plugin>] {
        &self.plugins
    }

    /// Abort the plugins' background tasks.
    pub fn shutdown(&mut self) {
        for task in self.tasks.drain(..) {
            task.abort();
        }
    }
}

impl Drop for BridgeHost {
    fn drop(&mut self) {
        self.shutdown();
    }
}
