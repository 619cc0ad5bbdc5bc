#![cfg(test)]

use crate::kernel::error::Result;
use crate::plugin_system::cascade::{CascadeResolver, DeactivationKind};
use crate::plugin_system::graph::DependencyGraph;
use crate::plugin_system::manifest::{ManifestBuilder, PluginManifest};
use crate::plugin_system::registry::PluginRegistry;
use crate::plugin_system::traits::PluginHost;

fn ids(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn plugin(id: &str, provides: &str, depends: &str) -> PluginManifest {
    ManifestBuilder::new(id, id, "1.0")
        .provides(provides)
        .depends(depends)
        .build()
}

fn host(plugins: Vec<PluginManifest>, active: &[&str]) -> PluginRegistry {
    let mut registry = PluginRegistry::new("3.9");
    for manifest in plugins {
        registry.register_plugin(manifest).unwrap();
    }
    for id in active {
        registry.activate_plugin(id).unwrap();
    }
    registry
}

#[test]
fn test_empty_input_is_a_no_op() -> Result<()> {
    let mut registry = host(vec![plugin("A", "", ""), plugin("B", "", "A")], &["A", "B"]);
    let graph = DependencyGraph::build(&registry)?;
    let resolver = CascadeResolver::new(&graph);

    assert!(resolver.deactivate_cascade(&mut registry, &[])?.is_empty());
    assert_eq!(registry.active_plugin_ids(), ids(&["A", "B"]));
    Ok(())
}

#[test]
fn test_chain_cascades_transitively() -> Result<()> {
    let mut registry = host(
        vec![plugin("A", "", ""), plugin("B", "", "A"), plugin("C", "", "B")],
        &["A", "B", "C"],
    );
    let graph = DependencyGraph::build(&registry)?;
    let deactivated = CascadeResolver::new(&graph).deactivate_cascade(&mut registry, &ids(&["A"]))?;

    assert_eq!(deactivated, ids(&["B", "C"]));
    // The requested plugin itself is left to the caller
    assert_eq!(registry.active_plugin_ids(), ids(&["A"]));
    Ok(())
}

#[test]
fn test_diamond_reports_each_plugin_once() -> Result<()> {
    let mut registry = host(
        vec![
            plugin("A", "", ""),
            plugin("B", "", "A"),
            plugin("C", "", "A"),
            plugin("D", "", "B, C"),
        ],
        &["A", "B", "C", "D"],
    );
    let graph = DependencyGraph::build(&registry)?;
    let deactivated = CascadeResolver::new(&graph).deactivate_cascade(&mut registry, &ids(&["A"]))?;

    assert_eq!(deactivated, ids(&["B", "C", "D"]));
    Ok(())
}

#[test]
fn test_cycle_terminates() -> Result<()> {
    let mut registry = host(
        vec![plugin("A", "", "B"), plugin("B", "", "A"), plugin("C", "", "A")],
        &["A", "B", "C"],
    );
    let graph = DependencyGraph::build(&registry)?;
    let deactivated = CascadeResolver::new(&graph).deactivate_cascade(&mut registry, &ids(&["A"]))?;

    // A depends on B, so it comes back around in the second wave
    assert_eq!(deactivated, ids(&["B", "C", "A"]));
    assert!(registry.active_plugin_ids().is_empty());
    Ok(())
}

#[test]
fn test_requested_plugin_depending_on_another_is_reported() -> Result<()> {
    let mut registry = host(
        vec![plugin("A", "", ""), plugin("B", "", "A"), plugin("C", "", "")],
        &["A", "B", "C"],
    );
    let graph = DependencyGraph::build(&registry)?;
    let deactivated = CascadeResolver::new(&graph).deactivate_cascade(&mut registry, &ids(&["A", "B"]))?;

    assert_eq!(deactivated, ids(&["B"]));
    assert_eq!(registry.active_plugin_ids(), ids(&["A", "C"]));
    Ok(())
}

#[test]
fn test_conflicting_reports_each_plugin_once() -> Result<()> {
    let mut registry = host(
        vec![
            plugin("old", "cache", ""),
            plugin("old-ext", "cache", "old"),
            plugin("new", "cache", ""),
        ],
        &["old", "old-ext"],
    );
    let graph = DependencyGraph::build(&registry)?;
    let deactivated = CascadeResolver::new(&graph).deactivate_conflicting(&mut registry, &ids(&["new"]))?;

    assert_eq!(deactivated, ids(&["old", "old-ext"]));
    assert!(registry.active_plugin_ids().is_empty());
    Ok(())
}

#[test]
fn test_inactive_dependents_are_ignored() -> Result<()> {
    let mut registry = host(
        vec![plugin("A", "", ""), plugin("B", "", "A"), plugin("C", "", "B")],
        &["A", "C"],
    );
    let graph = DependencyGraph::build(&registry)?;
    let deactivated = CascadeResolver::new(&graph).deactivate_cascade(&mut registry, &ids(&["A"]))?;
    assert!(deactivated.is_empty());
    Ok(())
}

#[test]
fn test_virtual_capability_cascades() -> Result<()> {
    let mut registry = host(
        vec![
            plugin("redis", "cache", ""),
            plugin("apcu", "cache", ""),
            plugin("shop", "", "cache"),
        ],
        &["redis", "apcu", "shop"],
    );
    let graph = DependencyGraph::build(&registry)?;
    let deactivated = CascadeResolver::new(&graph).deactivate_cascade(&mut registry, &ids(&["redis"]))?;

    // Any provider going away takes its dependents along
    assert_eq!(deactivated, ids(&["shop"]));
    Ok(())
}

#[test]
fn test_plan_cascade_leaves_host_untouched() -> Result<()> {
    let registry = host(
        vec![plugin("A", "", ""), plugin("B", "", "A"), plugin("C", "", "B")],
        &["A", "B", "C"],
    );
    let graph = DependencyGraph::build(&registry)?;
    let planned = CascadeResolver::new(&graph).plan_cascade(&registry.active_plugin_ids(), &ids(&["B"]));

    assert_eq!(planned, ids(&["C"]));
    assert_eq!(registry.active_plugin_ids(), ids(&["A", "B", "C"]));
    Ok(())
}

#[test]
fn test_conflicting_deactivates_and_cascades() -> Result<()> {
    let mut registry = host(
        vec![
            plugin("P1", "P1", ""),
            plugin("P2", "", "P1"),
            plugin("P3", "P1", ""),
        ],
        &["P1", "P2"],
    );
    let graph = DependencyGraph::build(&registry)?;
    let deactivated = CascadeResolver::new(&graph).deactivate_conflicting(&mut registry, &ids(&["P3"]))?;

    assert_eq!(deactivated, ids(&["P1", "P2"]));
    assert!(registry.active_plugin_ids().is_empty());
    Ok(())
}

#[test]
fn test_conflicting_protects_plugins_being_activated() -> Result<()> {
    let mut registry = host(
        vec![
            plugin("old", "cache", ""),
            plugin("new", "cache", "cache"),
            plugin("app", "", "old"),
        ],
        &["old", "new", "app"],
    );
    let graph = DependencyGraph::build(&registry)?;
    let deactivated = CascadeResolver::new(&graph).deactivate_conflicting(&mut registry, &ids(&["new"]))?;

    assert_eq!(deactivated, ids(&["old", "app"]));
    assert_eq!(registry.active_plugin_ids(), ids(&["new"]));
    Ok(())
}

#[test]
fn test_no_conflict_means_no_changes() -> Result<()> {
    let mut registry = host(vec![plugin("A", "seo", ""), plugin("B", "cache", "")], &["A"]);
    let graph = DependencyGraph::build(&registry)?;
    let deactivated = CascadeResolver::new(&graph).deactivate_conflicting(&mut registry, &ids(&["B"]))?;
    assert!(deactivated.is_empty());
    assert_eq!(registry.active_plugin_ids(), ids(&["A"]));
    Ok(())
}

#[test]
fn test_run_dispatches_by_kind() -> Result<()> {
    let mut registry = host(vec![plugin("A", "", ""), plugin("B", "", "A")], &["A", "B"]);
    let graph = DependencyGraph::build(&registry)?;
    let report = CascadeResolver::new(&graph).run(DeactivationKind::Cascade, &mut registry, &ids(&["A"]))?;

    assert_eq!(report.kind, DeactivationKind::Cascade);
    assert_eq!(report.deactivated, ids(&["B"]));
    assert_eq!(report.notice(), "The following plugins have also been deactivated:");
    Ok(())
}

#[test]
fn test_deactivation_kind_actions() {
    assert_eq!(DeactivationKind::from_action("deactivate"), Some(DeactivationKind::Cascade));
    assert_eq!(DeactivationKind::from_action("activate"), Some(DeactivationKind::Conflicting));
    assert_eq!(DeactivationKind::from_action("delete"), None);
    for kind in DeactivationKind::ALL {
        assert_eq!(DeactivationKind::from_action(kind.action()), Some(kind));
    }
    assert_eq!(DeactivationKind::Conflicting.to_string(), "conflicting");
    assert_eq!(
        DeactivationKind::Conflicting.notice(),
        "The following plugins have been deactivated due to dependency conflicts:"
    );
}
