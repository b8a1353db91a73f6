//! Logging utilities

pub use log::{debug, error, info, trace, warn};

use crate::core::RuntimeConfig;

/// Initialize the logging system from `RUST_LOG`
pub fn init() {
    env_logger::init();
}

/// Initialize logging with `level` as the default filter.
///
/// `RUST_LOG` still takes precedence when set. Fails if a logger is already
/// installed.
pub fn init_with_level(level: &str) -> Result<(), log::SetLoggerError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).try_init()
}

/// Initialize logging from a runtime configuration
pub fn init_from_config(config: &RuntimeConfig) -> Result<(), log::SetLoggerError> {
    init_with_level(&config.log_level)
}
