//! # Plugdeps Storage
//!
//! Reads and writes the state file: a serialized
//! [`PluginRegistry`](crate::plugin_system::PluginRegistry) whose format is
//! picked from the file extension.
pub mod config;
pub mod error;

pub use config::{load_registry, save_registry, ConfigFormat};
pub use error::StorageSystemError;
