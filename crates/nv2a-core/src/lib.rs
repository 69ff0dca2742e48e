//! Shared infrastructure for the NV2A pixel shader translator
//!
//! This crate provides error handling, configuration, and logging
//! setup used by the translator crates.

pub mod config;
pub mod error;
pub mod logging;

pub use config::{Config, DebugConfig, LogLevel, ShaderConfig};
pub use error::{Nv2aError, PshError, Result};
