use std::fmt::Write as _;

use plugdeps_core::plugin_system::{
    ActivationStatus, DeactivationReport, DependencyGraph, DependencyStatus, PluginRegistry,
    RequirementNotice,
};

/// Installed plugins with their activation state
pub fn render_list(registry: &PluginRegistry) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Core version: {}", registry.core_version);
    if registry.plugins.is_empty() {
        let _ = writeln!(out, "  No plugins installed.");
        return out;
    }

    let width = registry.plugins.iter().map(|p| p.id.len()).max().unwrap_or(0);
    for plugin in &registry.plugins {
        let state = if registry.network_active.contains(&plugin.id) {
            "network"
        } else if registry.active.contains(&plugin.id) {
            "active"
        } else {
            "inactive"
        };
        let _ = writeln!(
            out,
            "  [{:<8}] {:<width$}  {} {}",
            state,
            plugin.id,
            plugin.display_name(),
            plugin.version,
            width = width
        );
    }
    out
}

/// One item per line, or `empty` when there is nothing to show
pub fn render_items<'a, I>(items: I, empty: &str) -> String
where
    I: IntoIterator<Item = &'a String>,
{
    let mut out = String::new();
    for item in items {
        let _ = writeln!(out, "  {}", item);
    }
    if out.is_empty() {
        let _ = writeln!(out, "  {}", empty);
    }
    out
}

/// Provider ids with their display names
pub fn render_providers(graph: &DependencyGraph, capability: &str, providers: &[String]) -> String {
    if providers.is_empty() {
        return format!("No providers for '{}'.\n", capability);
    }
    let mut out = format!("Providers of '{}':\n", capability);
    for id in providers {
        let _ = writeln!(out, "  {} ({})", id, graph.display_name(id));
    }
    out
}

/// Requirement notices of one plugin
pub fn render_notices(name: &str, notices: &[RequirementNotice]) -> String {
    let mut out = format!("{}:\n", name);
    if notices.is_empty() {
        let _ = writeln!(out, "  All requirements met.");
    }
    for notice in notices {
        let _ = writeln!(out, "  - {}", notice);
    }
    out
}

pub fn render_status(graph: &DependencyGraph, status: &ActivationStatus) -> String {
    let yes_no = |b: bool| if b { "yes" } else { "no" };
    let mut out = format!(
        "{} ({})\n",
        graph.display_name(&status.plugin_id),
        status.plugin_id
    );
    let _ = writeln!(out, "  Can activate: {}", yes_no(status.can_activate));
    let _ = writeln!(out, "  Can network activate: {}", yes_no(status.can_network_activate));
    for dep in &status.dependencies {
        let state = match dep.status {
            DependencyStatus::Satisfied => "satisfied",
            DependencyStatus::Unsatisfied => "unsatisfied",
            DependencyStatus::UnsatisfiedNetwork => "not network active",
        };
        let providers = if dep.provider_names.is_empty() {
            "no providers".to_string()
        } else {
            dep.provider_names.join(", ")
        };
        let _ = writeln!(out, "  {}: {} ({})", dep.capability, state, providers);
    }
    out
}

/// Heading and display names of the plugins a pass deactivated
pub fn render_report(graph: &DependencyGraph, report: &DeactivationReport) -> String {
    if report.is_empty() {
        return String::new();
    }
    let mut out = format!("{}\n", report.notice());
    for id in &report.deactivated {
        let _ = writeln!(out, "  {}", graph.display_name(id));
    }
    out
}
