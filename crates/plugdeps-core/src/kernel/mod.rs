//! # Plugdeps Core Kernel
//!
//! Shared building blocks used by every other module of the crate: the
//! top-level [`Error`](error::Error) type with its [`Result`](error::Result)
//! alias, and the [`constants`] that name header fields and notice texts.
pub mod constants;
pub mod error;

pub use error::{Error, Result};
