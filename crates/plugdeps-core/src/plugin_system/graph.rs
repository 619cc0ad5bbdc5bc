//! # Dependency Graph
//!
//! [`DependencyGraph`] is the result of one initialization pass over the
//! installed plugins. It holds three derived maps:
//!
//! - provides: plugin id → capabilities (always including the id itself),
//! - depends: plugin id → capabilities it needs, resolved to plugin ids
//!   where the declared name matches an installed plugin and passed through
//!   unchanged otherwise (virtual capabilities),
//! - requirements: plugin display name → unmet requirement notices.
//!
//! The graph is rebuilt from scratch for every pass and never mutated.
use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::kernel::error::Result;
use crate::plugin_system::constraint::ConstraintParser;
use crate::plugin_system::dependency::DependencyDeclaration;
use crate::plugin_system::error::PluginSystemError;
use crate::plugin_system::manifest::PluginRecord;
use crate::plugin_system::requirement::RequirementNotice;
use crate::plugin_system::traits::PluginHost;

#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    /// Records in installation order
    records: Vec<PluginRecord>,
    /// Plugin id -> position in `records`
    index: HashMap<String, usize>,
    /// Display name -> plugin id
    names: HashMap<String, String>,
    /// Plugin id -> resolved dependency capabilities
    depends: HashMap<String, Vec<String>>,
    /// Display name -> unmet requirements (non-empty lists only)
    requirements: BTreeMap<String, Vec<RequirementNotice>>,
    core_version: String,
}

impl DependencyGraph {
    /// Builds the graph from the host's installed plugins and activation state.
    pub fn build<H: PluginHost + ?Sized>(host: &H) -> Result<Self> {
        let core_version = host.host_core_version();
        let parser = match host.core_compatibility() {
            Some(core) => ConstraintParser::new(Some(core.as_str()))?,
            None => ConstraintParser::for_core_version(&core_version)?,
        };

        let mut graph = DependencyGraph {
            core_version,
            ..Default::default()
        };

        for manifest in host.list_installed_plugins() {
            if graph.index.contains_key(&manifest.id) {
                log::warn!("Ignoring duplicate plugin identifier '{}'", manifest.id);
                continue;
            }
            let record = PluginRecord::from_manifest(&manifest, &parser);
            graph.index.insert(record.id.clone(), graph.records.len());
            graph.names.insert(record.name.clone(), record.id.clone());
            graph.records.push(record);
        }

        let network = host.is_network_context();
        let is_active = |id: &str| {
            if network {
                host.is_plugin_active_for_network(id)
            } else {
                !host.is_plugin_inactive(id)
            }
        };

        let mut depends = HashMap::with_capacity(graph.records.len());
        let mut requirements: BTreeMap<String, Vec<RequirementNotice>> = BTreeMap::new();

        for record in &graph.records {
            let mut notices = Vec::new();

            if let Some(core) = &record.core {
                if let Some(required) = core.check(&graph.core_version) {
                    notices.push(RequirementNotice::incompatible_core(&required, &graph.core_version));
                }
            }

            let resolved: Vec<String> = record
                .depends
                .iter()
                .map(|dep| graph.resolve_declaration(dep, &is_active, network, &mut notices))
                .collect();

            log::debug!("Plugin '{}' depends on {:?}", record.id, resolved);
            depends.insert(record.id.clone(), resolved);

            if !notices.is_empty() {
                log::debug!("Plugin '{}' has {} unmet requirement(s)", record.name, notices.len());
                requirements.entry(record.name.clone()).or_default().extend(notices);
            }
        }

        graph.depends = depends;
        graph.requirements = requirements;
        Ok(graph)
    }

    /// Resolves one declaration to a capability and records what is unmet.
    fn resolve_declaration(
        &self,
        dep: &DependencyDeclaration,
        is_active: &dyn Fn(&str) -> bool,
        network: bool,
        notices: &mut Vec<RequirementNotice>,
    ) -> String {
        if let Some(target) = self.resolve_name(&dep.target) {
            let target_record = &self.records[self.index[target]];
            if let Some(required) = dep.check(&target_record.version) {
                notices.push(RequirementNotice::incompatible_version(
                    &dep.target,
                    &required,
                    &target_record.version,
                ));
            } else if !is_active(target) {
                notices.push(RequirementNotice::inactive(&dep.to_string(), network));
            }
            return target.to_string();
        }

        let providers = self.get_providers(&dep.target);
        if providers.is_empty() {
            notices.push(RequirementNotice::missing(&dep.to_string()));
        } else if !providers.iter().any(|id| is_active(id)) {
            notices.push(RequirementNotice::inactive(&dep.to_string(), network));
        }
        dep.target.clone()
    }

    /// Maps a declared name to an installed plugin id: display name first,
    /// then identifier.
    pub fn resolve_name(&self, name: &str) -> Option<&str> {
        if let Some(id) = self.names.get(name) {
            return Some(id.as_str());
        }
        self.index.get_key_value(name).map(|(id, _)| id.as_str())
    }

    /// Whether the identifier belongs to an installed plugin
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn record(&self, id: &str) -> Option<&PluginRecord> {
        self.index.get(id).map(|&i| &self.records[i])
    }

    /// All records in installation order
    pub fn records(&self) -> &[PluginRecord] {
        &self.records
    }

    /// Display name of a plugin, or the identifier itself when unknown
    pub fn display_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.record(id).map(|r| r.name.as_str()).unwrap_or(id)
    }

    pub fn core_version(&self) -> &str {
        &self.core_version
    }

    /// Real or virtual dependencies of a plugin
    pub fn get_dependencies(&self, id: &str) -> Result<&[String]> {
        self.depends
            .get(id)
            .map(Vec::as_slice)
            .ok_or_else(|| PluginSystemError::not_found(id).into())
    }

    /// Dependencies of every plugin, in installation order
    pub fn dependency_map(&self) -> Vec<(&str, &[String])> {
        self.records
            .iter()
            .map(|r| {
                let deps = self.depends.get(&r.id).map(Vec::as_slice).unwrap_or_default();
                (r.id.as_str(), deps)
            })
            .collect()
    }

    /// Capabilities provided by a plugin, including its own identifier
    pub fn get_provided(&self, id: &str) -> Result<&BTreeSet<String>> {
        self.record(id)
            .map(|r| &r.provides)
            .ok_or_else(|| PluginSystemError::not_found(id).into())
    }

    /// Plugins that provide a capability.
    ///
    /// A plugin identifier is provided by exactly that plugin. Any other
    /// name is virtual and may have several providers, which are
    /// alternatives to one another.
    pub fn get_providers(&self, capability: &str) -> Vec<String> {
        if self.index.contains_key(capability) {
            return vec![capability.to_string()];
        }
        self.records
            .iter()
            .filter(|r| r.provides_capability(capability))
            .map(|r| r.id.clone())
            .collect()
    }

    /// Unmet requirements of the plugin with the given display name.
    ///
    /// An installed plugin with no unmet requirements yields an empty slice;
    /// a name no installed plugin carries is an error.
    pub fn requirement_notices(&self, name: &str) -> Result<&[RequirementNotice]> {
        if let Some(notices) = self.requirements.get(name) {
            return Ok(notices);
        }
        if self.names.contains_key(name) {
            return Ok(&[]);
        }
        Err(PluginSystemError::NameNotFound {
            name: name.to_string(),
        }
        .into())
    }

    /// Unmet requirements of every plugin that has any, by display name
    pub fn all_requirement_notices(&self) -> &BTreeMap<String, Vec<RequirementNotice>> {
        &self.requirements
    }

    /// Union of the capabilities provided by the given plugins. Unknown
    /// identifiers contribute only themselves.
    pub fn provided_by_all<'a, I>(&self, ids: I) -> BTreeSet<String>
    where
        I: IntoIterator<Item = &'a String>,
    {
        let mut capabilities = BTreeSet::new();
        for id in ids {
            match self.record(id) {
                Some(record) => capabilities.extend(record.provides.iter().cloned()),
                None => {
                    capabilities.insert(id.clone());
                }
            }
        }
        capabilities
    }
}
