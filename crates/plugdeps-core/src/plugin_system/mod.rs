//! # Plugdeps Plugin System
//!
//! Dependency handling for host-managed plugins. Plugins declare what they
//! provide and what they depend on through three headers:
//!
//! - `Provides`: comma separated capabilities, usually virtual names such as
//!   `"cache"` that several plugins can offer interchangeably,
//! - `Depends`: comma separated plugin names or capabilities, each with an
//!   optional version constraint, e.g. `Foo (>=2.x-1.5)`,
//! - `Core`: a version constraint on the host core, e.g. `>=3.2`.
//!
//! ## Key Submodules and Responsibilities:
//!
//! - **[`version`]**: Version strings ([`PluginVersion`]) and the comparison
//!   operators ([`Operator`]) used by constraints.
//! - **[`constraint`]**: Parses and evaluates constraint expressions
//!   ([`VersionConstraint`]), including `N.x` branch wildcards.
//! - **[`dependency`]**: One `Depends` entry ([`DependencyDeclaration`]).
//! - **[`manifest`]**: Raw plugin headers ([`PluginManifest`]) and their
//!   parsed form ([`PluginRecord`]).
//! - **[`traits`]**: The [`PluginHost`] seam to the host plugin manager.
//! - **[`registry`]**: An in-memory [`PluginHost`] ([`PluginRegistry`]).
//! - **[`graph`]**: The provides/depends/requirements maps of one pass
//!   ([`DependencyGraph`]).
//! - **[`requirement`]**: Unmet requirement diagnostics ([`RequirementNotice`]).
//! - **[`conflict`]**: Active plugins that clash with plugins being activated.
//! - **[`cascade`]**: Cascade and conflict deactivation passes.
//! - **[`manager`]**: The [`DependencyManager`] entry point.
//! - **[`error`]**: [`PluginSystemError`].
pub mod cascade;
pub mod conflict;
pub mod constraint;
pub mod dependency;
pub mod error;
pub mod graph;
pub mod manager;
pub mod manifest;
pub mod registry;
pub mod requirement;
pub mod traits;
pub mod version;

pub use cascade::{CascadeResolver, DeactivationKind, DeactivationReport};
pub use conflict::{ConflictManager, PluginConflict};
pub use constraint::{ConstraintEntry, ConstraintParser, VersionConstraint};
pub use dependency::DependencyDeclaration;
pub use error::PluginSystemError;
pub use graph::DependencyGraph;
pub use manager::{ActivationStatus, DependencyManager, DependencyState, DependencyStatus};
pub use manifest::{ManifestBuilder, PluginManifest, PluginRecord};
pub use registry::PluginRegistry;
pub use requirement::{RequirementKind, RequirementNotice};
pub use traits::PluginHost;
pub use version::{Operator, PluginVersion};

#[cfg(test)]
mod tests;
