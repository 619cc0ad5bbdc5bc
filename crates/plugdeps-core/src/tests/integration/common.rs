#![cfg(test)]

use std::collections::HashSet;

use crate::kernel::error::Result;
use crate::plugin_system::manifest::{ManifestBuilder, PluginManifest};
use crate::plugin_system::traits::PluginHost;

/// Host that implements only the required trait methods and records every
/// deactivation request it receives.
pub struct RecordingHost {
    pub core_version: String,
    pub plugins: Vec<PluginManifest>,
    pub active: Vec<String>,
    pub deactivate_calls: Vec<Vec<String>>,
}

impl RecordingHost {
    pub fn new(core_version: &str) -> Self {
        Self {
            core_version: core_version.to_string(),
            plugins: Vec::new(),
            active: Vec::new(),
            deactivate_calls: Vec::new(),
        }
    }

    pub fn with_plugin(mut self, manifest: PluginManifest, active: bool) -> Self {
        if active {
            self.active.push(manifest.id.clone());
        }
        self.plugins.push(manifest);
        self
    }

    /// Every id passed to `deactivate`, without duplicates
    pub fn deactivated(&self) -> HashSet<String> {
        self.deactivate_calls.iter().flatten().cloned().collect()
    }
}

impl PluginHost for RecordingHost {
    fn list_installed_plugins(&self) -> Vec<PluginManifest> {
        self.plugins.clone()
    }

    fn site_active_plugin_ids(&self) -> Vec<String> {
        self.active.clone()
    }

    fn deactivate(&mut self, ids: &[String]) -> Result<()> {
        self.active.retain(|id| !ids.contains(id));
        self.deactivate_calls.push(ids.to_vec());
        Ok(())
    }

    fn host_core_version(&self) -> String {
        self.core_version.clone()
    }
}

pub fn manifest(id: &str, name: &str, version: &str) -> ManifestBuilder {
    ManifestBuilder::new(id, name, version)
}

pub fn ids(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub fn set(items: &[&str]) -> HashSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}
