use std::collections::BTreeSet;

use serde::Serialize;

use crate::plugin_system::graph::DependencyGraph;

/// An active plugin that provides a capability also provided by a plugin
/// about to be activated
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PluginConflict {
    /// Active plugin that has to make way
    pub plugin: String,
    /// Capabilities it shares with the plugins being activated
    pub capabilities: BTreeSet<String>,
}

impl PluginConflict {
    /// Create a new plugin conflict
    pub fn new(plugin: &str, capabilities: BTreeSet<String>) -> Self {
        Self {
            plugin: plugin.to_string(),
            capabilities,
        }
    }
}

/// Collects duplicate-capability conflicts for one activation request
#[derive(Debug, Default)]
pub struct ConflictManager {
    conflicts: Vec<PluginConflict>,
}

impl ConflictManager {
    /// Create a new conflict manager
    pub fn new() -> Self {
        Self {
            conflicts: Vec::new(),
        }
    }

    /// Add a conflict. A second conflict for the same plugin merges into the first.
    pub fn add_conflict(&mut self, conflict: PluginConflict) {
        match self.conflicts.iter_mut().find(|c| c.plugin == conflict.plugin) {
            Some(existing) => existing.capabilities.extend(conflict.capabilities),
            None => self.conflicts.push(conflict),
        }
    }

    /// Get all conflicts
    pub fn get_conflicts(&self) -> &[PluginConflict] {
        &self.conflicts
    }

    /// Check if the given plugin has been found conflicting
    pub fn has_conflict_with(&self, id: &str) -> bool {
        self.conflicts.iter().any(|c| c.plugin == id)
    }

    /// Detect active plugins whose provided capabilities overlap those of
    /// `to_activate`. Plugins in `to_activate` are never reported, even when
    /// already active.
    pub fn detect_conflicts(
        &mut self,
        graph: &DependencyGraph,
        to_activate: &[String],
        active: &[String],
    ) {
        let incoming = graph.provided_by_all(to_activate);

        for active_id in active {
            if to_activate.contains(active_id) || self.has_conflict_with(active_id) {
                continue;
            }
            let provided = graph.provided_by_all(std::iter::once(active_id));
            let common: BTreeSet<String> = provided.intersection(&incoming).cloned().collect();
            if !common.is_empty() {
                log::debug!("Active plugin '{}' conflicts on {:?}", active_id, common);
                self.add_conflict(PluginConflict::new(active_id, common));
            }
        }
    }

    /// Plugins that have to be deactivated, in detection order
    pub fn get_plugins_to_disable(&self) -> Vec<String> {
        self.conflicts.iter().map(|c| c.plugin.clone()).collect()
    }
}
