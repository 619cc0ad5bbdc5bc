#![cfg(test)]

use tempfile::tempdir;

use crate::kernel::error::Result;
use crate::plugin_system::manager::DependencyManager;
use crate::plugin_system::manifest::ManifestBuilder;
use crate::plugin_system::registry::PluginRegistry;
use crate::plugin_system::requirement::RequirementKind;
use crate::storage::config::{load_registry, save_registry};

fn site() -> Result<PluginRegistry> {
    let mut registry = PluginRegistry::new("3.9");
    registry.register_plugin(
        ManifestBuilder::new("base/base.php", "Base", "2.3")
            .provides("toolkit")
            .build(),
    )?;
    registry.register_plugin(
        ManifestBuilder::new("gallery/gallery.php", "Gallery", "1.0")
            .depends("Base (>=3.x-2.0)")
            .build(),
    )?;
    registry.register_plugin(
        ManifestBuilder::new("slider/slider.php", "Slider", "0.9")
            .depends("toolkit, Gallery")
            .build(),
    )?;
    registry.register_plugin(
        ManifestBuilder::new("lite/lite.php", "Toolkit Lite", "1.0")
            .provides("toolkit")
            .build(),
    )?;
    for id in ["base/base.php", "gallery/gallery.php", "slider/slider.php"] {
        registry.activate_plugin(id)?;
    }
    Ok(registry)
}

#[test]
fn test_deactivate_persist_reload() -> Result<()> {
    let dir = tempdir().expect("Failed to create temp directory");
    let path = dir.path().join("state.json");
    save_registry(&path, &site()?)?;

    let mut registry = load_registry(&path)?;
    let manager = DependencyManager::init(&registry)?;
    assert!(manager.get_all_requirement_notices().is_empty());

    let report = manager.handle_action(&mut registry, "deactivate", &["base/base.php".to_string()])?;
    assert_eq!(report.deactivated, vec!["gallery/gallery.php", "slider/slider.php"]);
    registry.deactivate_plugin("base/base.php");
    save_registry(&path, &registry)?;

    let registry = load_registry(&path)?;
    assert!(registry.active.is_empty());

    let manager = DependencyManager::init(&registry)?;
    let notices = manager.get_requirement_notices("Gallery")?;
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].kind, RequirementKind::InactivePlugin);
    assert_eq!(notices[0].subject, "Base (>=3.x-2.0)");
    Ok(())
}

#[test]
fn test_activate_replaces_provider() -> Result<()> {
    let mut registry = site()?;
    let manager = DependencyManager::init(&registry)?;

    let status = manager.activation_status(&registry, "lite/lite.php")?;
    assert!(status.can_activate);

    let report = manager.handle_action(&mut registry, "activate", &["lite/lite.php".to_string()])?;
    assert_eq!(
        report.deactivated,
        vec!["base/base.php", "gallery/gallery.php", "slider/slider.php"]
    );
    registry.activate_plugin("lite/lite.php")?;
    assert_eq!(registry.active, vec!["lite/lite.php"]);
    Ok(())
}
