pub mod kernel;
pub mod plugin_system;
pub mod storage;

// Re-export key public types for the binary and embedding hosts
pub use kernel::error::{Error, Result};
pub use plugin_system::{
    DeactivationKind, DeactivationReport, DependencyManager, PluginHost, PluginManifest,
    PluginRegistry, RequirementNotice, VersionConstraint,
};
pub use storage::{load_registry, save_registry, ConfigFormat};

#[cfg(test)]
mod tests;
