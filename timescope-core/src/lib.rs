//! Core shared library for the TimeScope dashboard engine.
//!
//! This crate exposes the primitives the other TimeScope crates depend
//! on: the canonical error taxonomy, configuration loading, logging
//! setup and serde helpers.

pub mod config;
pub mod errors;
pub mod logging;
pub mod serde_utils;

pub use config::{CoreConfig, Environment};
pub use errors::{Result as CoreResult, TimescopeError};
