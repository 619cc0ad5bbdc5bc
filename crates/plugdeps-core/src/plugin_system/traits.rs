use crate::kernel::error::Result;
use crate::plugin_system::manifest::PluginManifest;

/// The host plugin manager, as far as dependency resolution needs it.
///
/// The resolver never owns plugin state. It asks the host what is
/// installed and active, and tells it what to deactivate.
pub trait PluginHost {
    /// Every installed plugin, in the host's listing order
    fn list_installed_plugins(&self) -> Vec<PluginManifest>;

    /// Identifiers activated on the current site
    fn site_active_plugin_ids(&self) -> Vec<String>;

    /// Identifiers activated network-wide. Empty outside multi-site hosts.
    fn network_active_plugin_ids(&self) -> Vec<String> {
        Vec::new()
    }

    /// Site-level and network-level active identifiers, unioned in that order
    fn active_plugin_ids(&self) -> Vec<String> {
        let mut ids = self.site_active_plugin_ids();
        for id in self.network_active_plugin_ids() {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        ids
    }

    /// Deactivate the given plugins. Deactivating an inactive plugin is a no-op.
    fn deactivate(&mut self, ids: &[String]) -> Result<()>;

    /// Version of the host core
    fn host_core_version(&self) -> String;

    /// Whether the current request runs in a network (multi-site) admin context
    fn is_network_context(&self) -> bool {
        false
    }

    /// Whether the plugin is activated network-wide
    fn is_plugin_active_for_network(&self, id: &str) -> bool {
        self.network_active_plugin_ids().iter().any(|active| active == id)
    }

    /// Whether the plugin is inactive on the current site. Network-wide
    /// activation counts as active.
    fn is_plugin_inactive(&self, id: &str) -> bool {
        !self.active_plugin_ids().iter().any(|active| active == id)
    }

    /// Core compatibility branch override (e.g. `"3.x"`). `None` derives it
    /// from [`host_core_version`](PluginHost::host_core_version).
    fn core_compatibility(&self) -> Option<String> {
        None
    }
}
