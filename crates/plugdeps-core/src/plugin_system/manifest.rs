use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::plugin_system::constraint::{ConstraintParser, VersionConstraint};
use crate::plugin_system::dependency::{parse_field, DependencyDeclaration};
use crate::kernel::constants::CORE_SUBJECT;

/// Installed plugin metadata as supplied by the host.
///
/// Header fields keep their bit-exact names (`Provides`, `Depends`, `Core`)
/// when serialized, so state files read like plugin headers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginManifest {
    /// Unique identifier for the plugin, e.g. `"akismet/akismet.php"`
    pub id: String,

    /// Human-readable name
    pub name: String,

    /// Plugin version
    #[serde(default)]
    pub version: String,

    /// Raw `Provides` header
    #[serde(rename = "Provides", default, skip_serializing_if = "String::is_empty")]
    pub provides: String,

    /// Raw `Depends` header
    #[serde(rename = "Depends", default, skip_serializing_if = "String::is_empty")]
    pub depends: String,

    /// Raw `Core` header
    #[serde(rename = "Core", default, skip_serializing_if = "Option::is_none")]
    pub core: Option<String>,
}

impl PluginManifest {
    /// Create a new plugin manifest without headers
    pub fn new(id: &str, name: &str, version: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            version: version.to_string(),
            provides: String::new(),
            depends: String::new(),
            core: None,
        }
    }

    /// Display name, falling back to the identifier when the header is blank
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            &self.id
        } else {
            &self.name
        }
    }
}

/// Builder for creating a plugin manifest
pub struct ManifestBuilder {
    manifest: PluginManifest,
}

impl ManifestBuilder {
    /// Create a new manifest builder
    pub fn new(id: &str, name: &str, version: &str) -> Self {
        Self {
            manifest: PluginManifest::new(id, name, version),
        }
    }

    /// Set the `Provides` header
    pub fn provides(mut self, provides: &str) -> Self {
        self.manifest.provides = provides.to_string();
        self
    }

    /// Set the `Depends` header
    pub fn depends(mut self, depends: &str) -> Self {
        self.manifest.depends = depends.to_string();
        self
    }

    /// Set the `Core` header
    pub fn core(mut self, core: &str) -> Self {
        self.manifest.core = Some(core.to_string());
        self
    }

    /// Build the manifest
    pub fn build(self) -> PluginManifest {
        self.manifest
    }
}

/// A plugin as seen by one initialization pass: headers parsed, own
/// identifier added to the provided capabilities.
#[derive(Debug, Clone, Serialize)]
pub struct PluginRecord {
    pub id: String,
    pub name: String,
    pub version: String,
    /// Always contains `id`
    pub provides: BTreeSet<String>,
    pub depends: Vec<DependencyDeclaration>,
    pub core: Option<VersionConstraint>,
}

impl PluginRecord {
    pub fn from_manifest(manifest: &PluginManifest, parser: &ConstraintParser) -> Self {
        let mut provides: BTreeSet<String> = parse_field(&manifest.provides).into_iter().collect();
        provides.insert(manifest.id.clone());

        let core = manifest
            .core
            .as_deref()
            .map(|core| core.trim().trim_start_matches('(').trim_end_matches(')').trim())
            .filter(|core| !core.is_empty())
            .map(|core| parser.parse(&format!("{} ({})", CORE_SUBJECT, core)));

        Self {
            id: manifest.id.clone(),
            name: manifest.display_name().to_string(),
            version: manifest.version.clone(),
            provides,
            depends: DependencyDeclaration::parse_all(&manifest.depends, parser),
            core,
        }
    }

    pub fn provides_capability(&self, capability: &str) -> bool {
        self.provides.contains(capability)
    }
}
