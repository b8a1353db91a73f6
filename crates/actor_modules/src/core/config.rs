//! # Runtime Configuration
//!
//! Settings for the frame driver and diagnostics. Loaded from TOML or RON
//! through [`Config`], with defaults for every field so partial files work.

use serde::{Deserialize, Serialize};

pub use crate::config::{Config, ConfigError};

/// Upper bound for the fixed physics step, in seconds
const MAX_PHYSICS_TIMESTEP: f32 = 1.0;

/// # Runtime Configuration
///
/// Controls the fixed physics step, dependency validation at start, and the
/// log filter used by [`crate::foundation::logging::init_from_config`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Log filter (`error`, `warn`, `info`, `debug`, `trace` or an
    /// `env_logger` directive string)
    pub log_level: String,
    /// Fixed physics step in seconds
    pub physics_timestep: f32,
    /// Most physics steps run in a single frame; excess time is dropped
    pub max_physics_steps: u32,
    /// Check declared module dependencies before each actor's start pass
    pub validate_dependencies: bool,
    /// Frame rate a real-time driver should aim for
    pub target_fps: Option<u32>,
}

impl RuntimeConfig {
    /// Create a runtime configuration with defaults
    pub fn new() -> Self {
        Self {
            log_level: "info".to_string(),
            physics_timestep: 1.0 / 50.0,
            max_physics_steps: 8,
            validate_dependencies: cfg!(debug_assertions),
            target_fps: None,
        }
    }

    /// Set log level
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Set the fixed physics step
    pub fn with_physics_timestep(mut self, seconds: f32) -> Self {
        self.physics_timestep = seconds;
        self
    }

    /// Set the per-frame physics step cap
    pub fn with_max_physics_steps(mut self, steps: u32) -> Self {
        self.max_physics_steps = steps;
        self
    }

    /// Enable or disable start-time dependency validation
    pub fn with_dependency_validation(mut self, enabled: bool) -> Self {
        self.validate_dependencies = enabled;
        self
    }

    /// Set target FPS
    pub fn with_target_fps(mut self, fps: u32) -> Self {
        self.target_fps = Some(fps);
        self
    }

    /// Frame duration implied by `target_fps`
    pub fn target_frame_time(&self) -> Option<f32> {
        self.target_fps.filter(|fps| *fps > 0).map(|fps| 1.0 / fps as f32)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.physics_timestep > 0.0 && self.physics_timestep <= MAX_PHYSICS_TIMESTEP) {
            return Err(ConfigError::Invalid(format!(
                "physics_timestep must be in (0, {}], got {}",
                MAX_PHYSICS_TIMESTEP, self.physics_timestep
            )));
        }

        if self.max_physics_steps == 0 {
            return Err(ConfigError::Invalid(
                "max_physics_steps must be at least 1".to_string(),
            ));
        }

        if self.target_fps == Some(0) {
            return Err(ConfigError::Invalid("target_fps cannot be 0".to_string()));
        }

        if self.log_level.trim().is_empty() {
            return Err(ConfigError::Invalid("log_level cannot be empty".to_string()));
        }

        Ok(())
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl Config for RuntimeConfig {}
