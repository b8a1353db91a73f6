//! Configuration system
//!
//! Runtime settings and module data assets are plain serde types stored as
//! TOML or RON. The format is picked from the file extension.

use std::path::Path;

use serde::de::DeserializeOwned;
pub use serde::{Deserialize, Serialize};

/// Supported file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// TOML (`.toml`)
    Toml,
    /// Rusty Object Notation (`.ron`)
    Ron,
}

impl ConfigFormat {
    /// Pick a format from a file extension
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Ok(Self::Toml),
            Some("ron") => Ok(Self::Ron),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Parse `contents` in the given format
pub fn parse_str<T: DeserializeOwned>(contents: &str, format: ConfigFormat) -> Result<T, ConfigError> {
    match format {
        ConfigFormat::Toml => toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string())),
        ConfigFormat::Ron => ron::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string())),
    }
}

/// Serialize `value` in the given format
pub fn to_string<T: Serialize>(value: &T, format: ConfigFormat) -> Result<String, ConfigError> {
    match format {
        ConfigFormat::Toml => {
            toml::to_string_pretty(value).map_err(|e| ConfigError::Serialize(e.to_string()))
        }
        ConfigFormat::Ron => ron::ser::to_string_pretty(value, ron::ser::PrettyConfig::default())
            .map_err(|e| ConfigError::Serialize(e.to_string())),
    }
}

/// Read and parse a `.toml` or `.ron` file
pub fn load_file<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let format = ConfigFormat::from_path(path)?;
    let contents = std::fs::read_to_string(path)?;
    parse_str(&contents, format)
}

/// Configuration trait
pub trait Config: Serialize + DeserializeOwned + Default {
    /// Load configuration from file
    fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        load_file(path.as_ref())
    }

    /// Load configuration from file, falling back to defaults when the file
    /// does not exist
    fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            Self::load_from_file(path)
        } else {
            log::info!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = to_string(self, ConfigFormat::from_path(path)?)?;
        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Values parsed but out of range
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(ConfigFormat::from_path(Path::new("a/b.toml")).unwrap(), ConfigFormat::Toml);
        assert_eq!(ConfigFormat::from_path(Path::new("b.ron")).unwrap(), ConfigFormat::Ron);
        assert!(matches!(
            ConfigFormat::from_path(Path::new("b.json")),
            Err(ConfigError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_parse_error_is_reported() {
        let result: Result<std::collections::BTreeMap<String, u32>, _> =
            parse_str("not = [valid", ConfigFormat::Toml);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }
}
