//! # Core Module
//!
//! Shared configuration used by the frame driver and logging setup.

pub mod config;

pub use config::{Config, ConfigError, RuntimeConfig};
