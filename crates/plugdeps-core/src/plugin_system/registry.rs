use serde::{Deserialize, Serialize};

use crate::kernel::error::Result;
use crate::plugin_system::error::PluginSystemError;
use crate::plugin_system::manifest::PluginManifest;
use crate::plugin_system::traits::PluginHost;

fn default_core_version() -> String {
    "0.0".to_string()
}

/// In-memory plugin host: the installed plugins plus their activation state.
///
/// This is what a state file deserializes into. Plugins are kept in
/// installation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginRegistry {
    /// Version of the host core
    #[serde(default = "default_core_version")]
    pub core_version: String,
    /// Core compatibility branch override, e.g. `"3.x"`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub core_compatibility: Option<String>,
    /// Whether requests run in a network admin context
    #[serde(default)]
    pub network: bool,
    /// Plugins active on the current site
    #[serde(default)]
    pub active: Vec<String>,
    /// Plugins active network-wide
    #[serde(default)]
    pub network_active: Vec<String>,
    /// Installed plugins
    #[serde(default)]
    pub plugins: Vec<PluginManifest>,
}

impl PluginRegistry {
    /// Create an empty registry for the given host core version
    pub fn new(core_version: &str) -> Self {
        Self {
            core_version: core_version.to_string(),
            core_compatibility: None,
            network: false,
            active: Vec::new(),
            network_active: Vec::new(),
            plugins: Vec::new(),
        }
    }

    /// Register an installed plugin
    pub fn register_plugin(&mut self, manifest: PluginManifest) -> Result<()> {
        if self.has_plugin(&manifest.id) {
            return Err(PluginSystemError::AlreadyRegistered {
                plugin_id: manifest.id,
            }
            .into());
        }
        log::debug!("Registered plugin '{}' ({})", manifest.id, manifest.display_name());
        self.plugins.push(manifest);
        Ok(())
    }

    /// Unregister a plugin by ID, dropping its activation state
    pub fn unregister_plugin(&mut self, id: &str) -> Result<PluginManifest> {
        let index = self
            .plugins
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| PluginSystemError::not_found(id))?;
        self.active.retain(|a| a != id);
        self.network_active.retain(|a| a != id);
        Ok(self.plugins.remove(index))
    }

    /// Check if a plugin is registered by ID
    pub fn has_plugin(&self, id: &str) -> bool {
        self.plugins.iter().any(|p| p.id == id)
    }

    /// Get a plugin manifest by ID
    pub fn get_plugin(&self, id: &str) -> Option<&PluginManifest> {
        self.plugins.iter().find(|p| p.id == id)
    }

    /// Get the number of registered plugins
    pub fn plugin_count(&self) -> usize {
        self.plugins.len()
    }

    /// Activate a plugin on the current site
    pub fn activate_plugin(&mut self, id: &str) -> Result<()> {
        if !self.has_plugin(id) {
            return Err(PluginSystemError::not_found(id).into());
        }
        if !self.active.iter().any(|a| a == id) {
            self.active.push(id.to_string());
            log::info!("Plugin {} activated.", id);
        }
        Ok(())
    }

    /// Activate a plugin network-wide
    pub fn activate_plugin_for_network(&mut self, id: &str) -> Result<()> {
        if !self.has_plugin(id) {
            return Err(PluginSystemError::not_found(id).into());
        }
        if !self.network_active.iter().any(|a| a == id) {
            self.network_active.push(id.to_string());
            log::info!("Plugin {} network activated.", id);
        }
        Ok(())
    }

    /// Deactivate a plugin everywhere. Unknown or inactive plugins are a no-op.
    pub fn deactivate_plugin(&mut self, id: &str) {
        let before = self.active.len() + self.network_active.len();
        self.active.retain(|a| a != id);
        self.network_active.retain(|a| a != id);
        if before != self.active.len() + self.network_active.len() {
            log::info!("Plugin {} deactivated.", id);
        } else {
            log::debug!("Plugin {} was already inactive.", id);
        }
    }

    /// Check if a plugin is active on the site or network-wide
    pub fn is_active(&self, id: &str) -> bool {
        self.active.iter().chain(self.network_active.iter()).any(|a| a == id)
    }
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self::new(&default_core_version())
    }
}

impl PluginHost for PluginRegistry {
    fn list_installed_plugins(&self) -> Vec<PluginManifest> {
        self.plugins.clone()
    }

    fn site_active_plugin_ids(&self) -> Vec<String> {
        self.active.clone()
    }

    fn network_active_plugin_ids(&self) -> Vec<String> {
        self.network_active.clone()
    }

    fn deactivate(&mut self, ids: &[String]) -> Result<()> {
        for id in ids {
            self.deactivate_plugin(id);
        }
        Ok(())
    }

    fn host_core_version(&self) -> String {
        self.core_version.clone()
    }

    fn is_network_context(&self) -> bool {
        self.network
    }

    fn is_plugin_active_for_network(&self, id: &str) -> bool {
        self.network_active.iter().any(|a| a == id)
    }

    fn is_plugin_inactive(&self, id: &str) -> bool {
        !self.is_active(id)
    }

    fn core_compatibility(&self) -> Option<String> {
        self.core_compatibility.clone()
    }
}
