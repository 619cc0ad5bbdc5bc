use std::fs;
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::kernel::error::Result;
use crate::plugin_system::registry::PluginRegistry;
use crate::storage::error::StorageSystemError;

/// Supported state file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// JSON format (.json)
    Json,
    /// YAML format (.yaml, .yml) - requires "yaml-config" feature
    #[cfg(feature = "yaml-config")]
    Yaml,
    /// TOML format (.toml) - requires "toml-config" feature
    #[cfg(feature = "toml-config")]
    Toml,
}

impl ConfigFormat {
    /// Get the file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            ConfigFormat::Json => "json",
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => "yaml",
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => "toml",
        }
    }

    /// Determine format from file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| match ext.to_lowercase().as_str() {
                "json" => Some(ConfigFormat::Json),
                #[cfg(feature = "yaml-config")]
                "yaml" | "yml" => Some(ConfigFormat::Yaml),
                #[cfg(feature = "toml-config")]
                "toml" => Some(ConfigFormat::Toml),
                _ => None,
            })
    }

    /// Like [`from_path`](Self::from_path), but an unknown extension is an error
    pub fn require_from_path(path: &Path) -> Result<Self> {
        Self::from_path(path).ok_or_else(|| {
            StorageSystemError::UnsupportedConfigFormat(path.display().to_string()).into()
        })
    }

    /// Serialize a value in this format
    pub fn serialize<T: Serialize>(&self, value: &T) -> Result<String> {
        let content: String = match self {
            ConfigFormat::Json => serde_json::to_string_pretty(value)
                .map_err(|e| StorageSystemError::serialization(self.extension(), e))?,
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => serde_yaml::to_string(value)
                .map_err(|e| StorageSystemError::serialization(self.extension(), e))?,
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => toml::to_string_pretty(value)
                .map_err(|e| StorageSystemError::serialization(self.extension(), e))?,
        };
        Ok(content)
    }

    /// Deserialize a value from this format
    pub fn deserialize<T: DeserializeOwned>(&self, data: &str) -> Result<T> {
        let value: T = match self {
            ConfigFormat::Json => serde_json::from_str(data)
                .map_err(|e| StorageSystemError::deserialization(self.extension(), e))?,
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => serde_yaml::from_str(data)
                .map_err(|e| StorageSystemError::deserialization(self.extension(), e))?,
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => toml::from_str(data)
                .map_err(|e| StorageSystemError::deserialization(self.extension(), e))?,
        };
        Ok(value)
    }
}

/// Load a registry from a state file
pub fn load_registry(path: &Path) -> Result<PluginRegistry> {
    let format = ConfigFormat::require_from_path(path)?;
    if !path.exists() {
        return Err(StorageSystemError::FileNotFound(path.to_path_buf()).into());
    }

    let content = fs::read_to_string(path)
        .map_err(|e| StorageSystemError::io(e, "read_to_string", path.to_path_buf()))?;
    let registry: PluginRegistry = format.deserialize(&content)?;

    log::debug!(
        "Loaded {} plugin(s) from {} ({})",
        registry.plugin_count(),
        path.display(),
        format.extension()
    );
    Ok(registry)
}

/// Write a registry to a state file, creating parent directories as needed
pub fn save_registry(path: &Path, registry: &PluginRegistry) -> Result<()> {
    let format = ConfigFormat::require_from_path(path)?;
    let content = format.serialize(registry)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| StorageSystemError::io(e, "create_dir_all", parent.to_path_buf()))?;
    }
    fs::write(path, content).map_err(|e| StorageSystemError::io(e, "write", path.to_path_buf()))?;

    log::debug!("Saved state to {}", path.display());
    Ok(())
}
