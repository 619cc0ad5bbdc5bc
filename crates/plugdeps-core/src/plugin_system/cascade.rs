//! # Cascade Resolution
//!
//! Computes which active plugins lose a dependency when others go away.
//!
//! Discovery is a worklist over "waves": the first wave is every active
//! plugin depending on a capability of the plugins being removed, the next
//! wave is every active plugin depending on a capability of the first wave,
//! and so on. A visited set keeps each plugin in at most one wave, so the
//! loop ends after at most one wave per active plugin even when the
//! dependency graph has cycles. The visited set starts empty: a plugin being
//! removed that depends on something in the closure is reported too.
use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

use crate::kernel::constants::{ACTION_ACTIVATE, ACTION_DEACTIVATE, CASCADE_NOTICE, CONFLICTING_NOTICE};
use crate::kernel::error::Result;
use crate::plugin_system::conflict::ConflictManager;
use crate::plugin_system::graph::DependencyGraph;
use crate::plugin_system::traits::PluginHost;

/// The two deactivation passes a host action can trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DeactivationKind {
    /// Plugins are being deactivated; their dependents follow
    Cascade,
    /// Plugins are being activated; active plugins providing the same
    /// capabilities make way, and their dependents follow
    Conflicting,
}

impl DeactivationKind {
    pub const ALL: [DeactivationKind; 2] = [DeactivationKind::Cascade, DeactivationKind::Conflicting];

    /// Maps a host action name to the pass it triggers
    pub fn from_action(action: &str) -> Option<Self> {
        match action {
            ACTION_DEACTIVATE => Some(DeactivationKind::Cascade),
            ACTION_ACTIVATE => Some(DeactivationKind::Conflicting),
            _ => None,
        }
    }

    /// Host action that triggers this pass
    pub fn action(&self) -> &'static str {
        match self {
            DeactivationKind::Cascade => ACTION_DEACTIVATE,
            DeactivationKind::Conflicting => ACTION_ACTIVATE,
        }
    }

    /// Heading shown above the list of plugins this pass deactivated
    pub fn notice(&self) -> &'static str {
        match self {
            DeactivationKind::Cascade => CASCADE_NOTICE,
            DeactivationKind::Conflicting => CONFLICTING_NOTICE,
        }
    }
}

impl fmt::Display for DeactivationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeactivationKind::Cascade => f.write_str("cascade"),
            DeactivationKind::Conflicting => f.write_str("conflicting"),
        }
    }
}

/// Outcome of one deactivation pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeactivationReport {
    pub kind: DeactivationKind,
    /// Plugins deactivated by the pass, in discovery order
    pub deactivated: Vec<String>,
}

impl DeactivationReport {
    pub fn is_empty(&self) -> bool {
        self.deactivated.is_empty()
    }

    pub fn notice(&self) -> &'static str {
        self.kind.notice()
    }
}

/// Runs deactivation passes over one [`DependencyGraph`]
pub struct CascadeResolver<'g> {
    graph: &'g DependencyGraph,
}

impl<'g> CascadeResolver<'g> {
    pub fn new(graph: &'g DependencyGraph) -> Self {
        Self { graph }
    }

    /// Dispatches to the pass selected by `kind`
    pub fn run<H: PluginHost + ?Sized>(
        &self,
        kind: DeactivationKind,
        host: &mut H,
        ids: &[String],
    ) -> Result<DeactivationReport> {
        let deactivated = match kind {
            DeactivationKind::Cascade => self.deactivate_cascade(host, ids)?,
            DeactivationKind::Conflicting => self.deactivate_conflicting(host, ids)?,
        };
        Ok(DeactivationReport { kind, deactivated })
    }

    /// Deactivates every active plugin that transitively depends on
    /// `to_deactivate`. A plugin of `to_deactivate` is part of the result
    /// only when it depends on the closure itself, as in a cycle.
    pub fn deactivate_cascade<H: PluginHost + ?Sized>(
        &self,
        host: &mut H,
        to_deactivate: &[String],
    ) -> Result<Vec<String>> {
        if to_deactivate.is_empty() {
            return Ok(Vec::new());
        }
        let active = host.active_plugin_ids();
        let waves = self.cascade_waves(&active, to_deactivate, &[]);
        Self::apply(host, waves)
    }

    /// Deactivates active plugins that provide a capability also provided
    /// by `to_activate`, then cascades from them. Returns the conflicting
    /// plugins followed by the cascaded ones.
    pub fn deactivate_conflicting<H: PluginHost + ?Sized>(
        &self,
        host: &mut H,
        to_activate: &[String],
    ) -> Result<Vec<String>> {
        let active = host.active_plugin_ids();
        let conflicting = self.find_conflicting(&active, to_activate);
        if conflicting.is_empty() {
            return Ok(Vec::new());
        }

        log::info!("Deactivating conflicting plugins: {:?}", conflicting);
        host.deactivate(&conflicting)?;

        let protected: Vec<String> = to_activate.iter().chain(&conflicting).cloned().collect();
        let waves = self.cascade_waves(&active, &conflicting, &protected);
        let mut deactivated = conflicting;
        deactivated.extend(Self::apply(host, waves)?);
        Ok(deactivated)
    }

    /// Active plugins that would be cascaded by removing `to_deactivate`,
    /// without touching the host.
    pub fn plan_cascade(&self, active: &[String], to_deactivate: &[String]) -> Vec<String> {
        self.cascade_waves(active, to_deactivate, &[]).into_iter().flatten().collect()
    }

    /// Active plugins that conflict with `to_activate`, without touching the host.
    pub fn find_conflicting(&self, active: &[String], to_activate: &[String]) -> Vec<String> {
        let mut conflicts = ConflictManager::new();
        conflicts.detect_conflicts(self.graph, to_activate, active);
        conflicts.get_plugins_to_disable()
    }

    fn apply<H: PluginHost + ?Sized>(host: &mut H, waves: Vec<Vec<String>>) -> Result<Vec<String>> {
        let mut deactivated = Vec::new();
        for wave in waves {
            log::info!("Cascade deactivating: {:?}", wave);
            host.deactivate(&wave)?;
            deactivated.extend(wave);
        }
        Ok(deactivated)
    }

    /// Worklist discovery. `seed` starts the first frontier; `protected`
    /// plugins are never reported.
    fn cascade_waves(&self, active: &[String], seed: &[String], protected: &[String]) -> Vec<Vec<String>> {
        let mut visited: HashSet<&str> = protected.iter().map(String::as_str).collect();
        let mut waves = Vec::new();
        let mut frontier: Vec<String> = seed.to_vec();

        while !frontier.is_empty() {
            let capabilities = self.graph.provided_by_all(&frontier);

            let mut found = Vec::new();
            for id in active {
                if visited.contains(id.as_str()) {
                    continue;
                }
                let depends = match self.graph.get_dependencies(id) {
                    Ok(depends) => depends,
                    Err(_) => {
                        log::warn!("Active plugin '{}' is not installed; skipping", id);
                        continue;
                    }
                };
                if depends.iter().any(|dep| capabilities.contains(dep)) {
                    visited.insert(id.as_str());
                    found.push(id.clone());
                }
            }

            if found.is_empty() {
                break;
            }
            frontier = found.clone();
            waves.push(found);
        }

        waves
    }
}
