//! # Plugdeps Core Kernel Errors
//!
//! Defines the crate-wide [`Error`] type. Each subsystem owns a typed error
//! enum ([`PluginSystemError`], [`StorageSystemError`]) that converts into
//! [`Error`] through `#[from]`, so callers can use `?` across module
//! boundaries.
use std::result::Result as StdResult;

use crate::plugin_system::error::PluginSystemError;
use crate::storage::error::StorageSystemError;
use thiserror::Error as ThisError;

/// Top-level error type for the plugdeps core
#[derive(Debug, ThisError)]
pub enum Error {
    /// Specific, typed plugin system error
    #[error("Plugin system error: {0}")]
    PluginSystem(#[from] PluginSystemError),

    /// Specific, typed storage system error
    #[error("Storage system error: {0}")]
    StorageSystem(#[from] StorageSystemError),

    /// Generic error with message
    #[error("Error: {0}")]
    Other(String),
}

/// Shorthand for Result with our Error type
pub type Result<T> = StdResult<T, Error>;

impl Error {
    /// Returns true if this error reports an unregistered plugin identifier.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::PluginSystem(PluginSystemError::NotFound { .. }))
    }
}

impl From<&str> for Error {
    fn from(msg: &str) -> Self {
        Error::Other(msg.to_string())
    }
}

impl From<String> for Error {
    fn from(msg: String) -> Self {
        Error::Other(msg)
    }
}
