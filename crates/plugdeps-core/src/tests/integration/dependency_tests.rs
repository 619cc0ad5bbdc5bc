#![cfg(test)]

use crate::kernel::error::Result;
use crate::plugin_system::constraint::VersionConstraint;
use crate::plugin_system::manager::DependencyManager;
use crate::plugin_system::requirement::RequirementKind;
use crate::tests::integration::common::{ids, manifest, set, RecordingHost};

fn marketplace() -> RecordingHost {
    RecordingHost::new("3.9")
        .with_plugin(manifest("redis/redis.php", "Redis", "2.0").provides("cache").build(), true)
        .with_plugin(
            manifest("apcu/apcu.php", "APCu", "1.0")
                .provides("cache, object-cache")
                .build(),
            false,
        )
        .with_plugin(manifest("shop/shop.php", "Shop", "3.0").depends("cache").build(), true)
        .with_plugin(manifest("hello.php", "Hello Dolly", "1.7").build(), true)
}

#[test]
fn test_provided_always_contains_own_id() -> Result<()> {
    let host = marketplace();
    let manager = DependencyManager::init(&host)?;
    for plugin in &host.plugins {
        assert!(manager.get_provided(&plugin.id)?.contains(&plugin.id));
    }
    Ok(())
}

#[test]
fn test_providers_concrete_and_virtual() -> Result<()> {
    let manager = DependencyManager::init(&marketplace())?;
    assert_eq!(manager.get_providers("shop/shop.php"), ids(&["shop/shop.php"]));
    assert_eq!(manager.get_providers("cache"), ids(&["redis/redis.php", "apcu/apcu.php"]));
    assert_eq!(manager.get_providers("object-cache"), ids(&["apcu/apcu.php"]));
    assert!(manager.get_providers("nothing").is_empty());
    Ok(())
}

#[test]
fn test_alternative_constraints() {
    let constraint = VersionConstraint::parse("Foo (>=2.x-1.5, 3.x)").unwrap();
    assert_eq!(constraint.subject(), "Foo");
    assert!(constraint.entries().len() >= 2);
    assert!(constraint.is_satisfied_by("3.5"));
    assert!(!constraint.is_satisfied_by("1.0"));
}

#[test]
fn test_equal_wildcard_branch() {
    let constraint = VersionConstraint::parse("Foo (=2.x)").unwrap();
    for minor in 0..12 {
        assert!(constraint.is_satisfied_by(&format!("2.{}", minor)));
        assert!(!constraint.is_satisfied_by(&format!("1.{}", minor)));
        assert!(!constraint.is_satisfied_by(&format!("3.{}", minor)));
    }
}

#[test]
fn test_cascade_empty_and_diamond() -> Result<()> {
    let mut host = RecordingHost::new("3.9")
        .with_plugin(manifest("a", "A", "1.0").build(), true)
        .with_plugin(manifest("b", "B", "1.0").depends("A").build(), true)
        .with_plugin(manifest("c", "C", "1.0").depends("A").build(), true)
        .with_plugin(manifest("d", "D", "1.0").depends("B, C").build(), true);
    let manager = DependencyManager::init(&host)?;

    assert!(manager.deactivate_cascade(&mut host, &[])?.is_empty());
    assert!(host.deactivate_calls.is_empty());

    let deactivated = manager.deactivate_cascade(&mut host, &ids(&["a"]))?;
    assert_eq!(deactivated, ids(&["b", "c", "d"]));
    assert_eq!(host.deactivate_calls, vec![ids(&["b", "c"]), ids(&["d"])]);
    Ok(())
}

#[test]
fn test_cascade_cycle() -> Result<()> {
    let mut host = RecordingHost::new("3.9")
        .with_plugin(manifest("a", "A", "1.0").depends("B").build(), true)
        .with_plugin(manifest("b", "B", "1.0").depends("A").build(), true);
    let manager = DependencyManager::init(&host)?;

    assert_eq!(manager.deactivate_cascade(&mut host, &ids(&["a"]))?, ids(&["b", "a"]));
    assert_eq!(host.deactivate_calls, vec![ids(&["b"]), ids(&["a"])]);
    assert!(host.active.is_empty());
    Ok(())
}

#[test]
fn test_conflicting_activation_end_to_end() -> Result<()> {
    let mut host = RecordingHost::new("3.9")
        .with_plugin(manifest("p1/p1.php", "P1", "1.0").provides("P1").build(), true)
        .with_plugin(manifest("p2/p2.php", "P2", "1.0").depends("P1").build(), true)
        .with_plugin(manifest("p3/p3.php", "P3", "1.0").provides("P1").build(), false);
    let manager = DependencyManager::init(&host)?;

    let deactivated = manager.deactivate_conflicting(&mut host, &ids(&["p3/p3.php"]))?;
    assert_eq!(
        deactivated.iter().cloned().collect::<std::collections::HashSet<_>>(),
        set(&["p1/p1.php", "p2/p2.php"])
    );
    assert_eq!(host.deactivated(), set(&["p1/p1.php", "p2/p2.php"]));
    assert!(host.active.is_empty());
    Ok(())
}

#[test]
fn test_missing_dependency_notice() -> Result<()> {
    let host = RecordingHost::new("3.9")
        .with_plugin(manifest("needy.php", "Needy", "1.0").depends("Missing (>=1.0)").build(), true);
    let manager = DependencyManager::init(&host)?;

    let notices = manager.get_requirement_notices("Needy")?;
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].kind, RequirementKind::MissingPlugin);
    assert!(notices
        .iter()
        .all(|n| n.kind != RequirementKind::IncompatibleVersion));
    Ok(())
}

#[test]
fn test_core_compatibility_notice() -> Result<()> {
    let build = |core_version: &str| {
        RecordingHost::new(core_version)
            .with_plugin(manifest("future.php", "Future", "1.0").core(">=4.0").build(), true)
    };

    let manager = DependencyManager::init(&build("3.9"))?;
    let notices = manager.get_requirement_notices("Future")?;
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].kind, RequirementKind::IncompatibleCore);

    let manager = DependencyManager::init(&build("4.1"))?;
    assert!(manager.get_requirement_notices("Future")?.is_empty());
    Ok(())
}

#[test]
fn test_default_host_methods() -> Result<()> {
    use crate::plugin_system::traits::PluginHost;

    let host = marketplace();
    assert!(!host.is_network_context());
    assert!(host.network_active_plugin_ids().is_empty());
    assert!(host.is_plugin_inactive("apcu/apcu.php"));
    assert!(!host.is_plugin_inactive("redis/redis.php"));
    assert!(!host.is_plugin_active_for_network("redis/redis.php"));
    assert_eq!(host.core_compatibility(), None);
    Ok(())
}
