//! Bridge configuration – identities and channel sizing.
//!
//! Loaded from a TOML file; every field has a default so a missing or empty
//! file yields a working companion-computer setup.

use mavbridge_types::BridgeError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Bridge identities and bus sizing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// System id stamped on outbound frames (the bridge's own identity).
    #[serde(default = "default_system_id")]
    pub system_id: u8,

    /// Component id stamped on outbound frames.
    #[serde(default = "default_component_id")]
    pub component_id: u8,

    /// System id of the FCU this bridge is bound to; inbound frames from
    /// any other system are rejected by the source filter.
    #[serde(default = "default_target_system_id")]
    pub target_system_id: u8,

    /// Capacity of each signal bus lane.
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

fn default_system_id() -> u8 {
    // Conventional companion-computer identity: same system as the FCU,
    // onboard-computer component.
    1
}

fn default_component_id() -> u8 {
    191
}

fn default_target_system_id() -> u8 {
    1
}

fn default_channel_capacity() -> usize {
    256
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            system_id: default_system_id(),
            component_id: default_component_id(),
            target_system_id: default_target_system_id(),
            channel_capacity: default_channel_capacity(),
        }
    }
}

impl BridgeConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::Config`] when the file cannot be read or
    /// parsed.
    pub fn load(path: &Path) -> Result<Self, BridgeError> {
        let raw = fs::read_to_string(path)
            .map_err(|e| BridgeError::Config(format!("read {}: {e}", path.display())))?;
        toml::from_str(&raw)
            .map_err(|e| BridgeError::Config(format!("parse {}: {e}", path.display())))
    }
}
