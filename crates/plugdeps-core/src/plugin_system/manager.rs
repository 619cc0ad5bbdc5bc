use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::kernel::error::Result;
use crate::plugin_system::cascade::{CascadeResolver, DeactivationKind, DeactivationReport};
use crate::plugin_system::error::PluginSystemError;
use crate::plugin_system::graph::DependencyGraph;
use crate::plugin_system::requirement::RequirementNotice;
use crate::plugin_system::traits::PluginHost;

/// Whether a dependency has an active provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DependencyStatus {
    /// An active provider exists
    Satisfied,
    /// No provider is active on the site
    Unsatisfied,
    /// Active on the site, but no provider is network active
    UnsatisfiedNetwork,
}

/// One dependency of a plugin, with the plugins that could satisfy it
#[derive(Debug, Clone, Serialize)]
pub struct DependencyState {
    /// Real or virtual capability
    pub capability: String,
    /// Plugin ids providing it (alternatives)
    pub providers: Vec<String>,
    /// Display names of `providers`, same order
    pub provider_names: Vec<String>,
    pub status: DependencyStatus,
}

/// Activation feasibility of a single plugin
#[derive(Debug, Clone, Serialize)]
pub struct ActivationStatus {
    pub plugin_id: String,
    pub dependencies: Vec<DependencyState>,
    /// False when any dependency has no active provider
    pub can_activate: bool,
    /// False when, in a network context, any dependency has no network
    /// active provider
    pub can_network_activate: bool,
}

/// Entry point of the plugin system: one initialization pass over the host
/// plus the operations a presentation layer needs.
#[derive(Debug, Clone)]
pub struct DependencyManager {
    graph: DependencyGraph,
}

impl DependencyManager {
    /// Run an initialization pass against the host
    pub fn init<H: PluginHost + ?Sized>(host: &H) -> Result<Self> {
        let graph = DependencyGraph::build(host)?;
        log::debug!(
            "Dependency graph built: {} plugin(s), {} with unmet requirements",
            graph.records().len(),
            graph.all_requirement_notices().len()
        );
        Ok(Self { graph })
    }

    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    /// Real or virtual dependencies of one plugin
    pub fn get_dependencies(&self, plugin_id: &str) -> Result<&[String]> {
        self.graph.get_dependencies(plugin_id)
    }

    /// Dependencies of every installed plugin
    pub fn get_all_dependencies(&self) -> Vec<(&str, &[String])> {
        self.graph.dependency_map()
    }

    /// Capabilities provided by a plugin
    pub fn get_provided(&self, plugin_id: &str) -> Result<&BTreeSet<String>> {
        self.graph.get_provided(plugin_id)
    }

    /// Plugins providing a capability
    pub fn get_providers(&self, capability: &str) -> Vec<String> {
        self.graph.get_providers(capability)
    }

    /// Unmet requirements of the plugin with this display name
    pub fn get_requirement_notices(&self, name: &str) -> Result<&[RequirementNotice]> {
        self.graph.requirement_notices(name)
    }

    /// Unmet requirements of every plugin that has any
    pub fn get_all_requirement_notices(&self) -> &BTreeMap<String, Vec<RequirementNotice>> {
        self.graph.all_requirement_notices()
    }

    /// See [`CascadeResolver::deactivate_conflicting`]
    pub fn deactivate_conflicting<H: PluginHost + ?Sized>(
        &self,
        host: &mut H,
        to_activate: &[String],
    ) -> Result<Vec<String>> {
        CascadeResolver::new(&self.graph).deactivate_conflicting(host, to_activate)
    }

    /// See [`CascadeResolver::deactivate_cascade`]
    pub fn deactivate_cascade<H: PluginHost + ?Sized>(
        &self,
        host: &mut H,
        to_deactivate: &[String],
    ) -> Result<Vec<String>> {
        CascadeResolver::new(&self.graph).deactivate_cascade(host, to_deactivate)
    }

    /// Runs the pass matching a host action (`"activate"` or `"deactivate"`)
    pub fn handle_action<H: PluginHost + ?Sized>(
        &self,
        host: &mut H,
        action: &str,
        plugin_ids: &[String],
    ) -> Result<DeactivationReport> {
        let kind = DeactivationKind::from_action(action)
            .ok_or_else(|| PluginSystemError::UnknownAction(action.to_string()))?;
        CascadeResolver::new(&self.graph).run(kind, host, plugin_ids)
    }

    /// Whether a plugin can be activated given what is active right now
    pub fn activation_status<H: PluginHost + ?Sized>(
        &self,
        host: &H,
        plugin_id: &str,
    ) -> Result<ActivationStatus> {
        let deps = self.graph.get_dependencies(plugin_id)?;
        let active = host.active_plugin_ids();
        let network_active = host.network_active_plugin_ids();
        let network = host.is_network_context();

        let mut dependencies = Vec::with_capacity(deps.len());
        for capability in deps {
            let providers = self.graph.get_providers(capability);
            let status = if !providers.iter().any(|p| active.contains(p)) {
                DependencyStatus::Unsatisfied
            } else if network && !providers.iter().any(|p| network_active.contains(p)) {
                DependencyStatus::UnsatisfiedNetwork
            } else {
                DependencyStatus::Satisfied
            };
            let provider_names = providers
                .iter()
                .map(|p| self.graph.display_name(p).to_string())
                .collect();
            dependencies.push(DependencyState {
                capability: capability.clone(),
                providers,
                provider_names,
                status,
            });
        }

        let can_activate = !dependencies
            .iter()
            .any(|d| d.status == DependencyStatus::Unsatisfied);
        let can_network_activate = can_activate
            && !dependencies
                .iter()
                .any(|d| d.status == DependencyStatus::UnsatisfiedNetwork);

        Ok(ActivationStatus {
            plugin_id: plugin_id.to_string(),
            dependencies,
            can_activate,
            can_network_activate,
        })
    }
}
