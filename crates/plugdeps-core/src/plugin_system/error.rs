//! # Plugdeps Plugin System Errors
//!
//! Defines [`PluginSystemError`], the hard failures of the plugin system.
//! Unmet requirements are *not* errors: they are reported as
//! [`RequirementNotice`](crate::plugin_system::requirement::RequirementNotice)
//! values and never abort an initialization pass.
#[derive(Debug, thiserror::Error)]
pub enum PluginSystemError {
    #[error("Plugin not found: '{plugin_id}'")]
    NotFound { plugin_id: String },

    #[error("Plugin already registered: '{plugin_id}'")]
    AlreadyRegistered { plugin_id: String },

    #[error("No requirement notices registered for plugin name '{name}'")]
    NameNotFound { name: String },

    #[error("Invalid version constraint '{constraint}': {message}")]
    InvalidConstraint { constraint: String, message: String },

    #[error("Plugin '{plugin_id}' cannot be activated: dependencies are not active")]
    ActivationBlocked { plugin_id: String },

    #[error("Unknown plugin action: '{0}'")]
    UnknownAction(String),
}

impl PluginSystemError {
    pub fn not_found(plugin_id: impl Into<String>) -> Self {
        PluginSystemError::NotFound {
            plugin_id: plugin_id.into(),
        }
    }
}
