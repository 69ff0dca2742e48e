//! Configuration for the pixel shader translator

use crate::error::Nv2aError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub shader: ShaderConfig,
    pub debug: DebugConfig,
}

/// Generated shader settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ShaderConfig {
    /// Emit a `#version` directive at the top of the source when set
    pub glsl_version: Option<u32>,
    /// Variable the final `r0` value is written to
    pub output_variable: String,
}

/// Debug settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DebugConfig {
    pub log_level: LogLevel,
    /// Log every generated shader at debug level
    pub dump_shaders: bool,
}

/// Logging level
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Directive understood by `tracing_subscriber::EnvFilter`
    pub fn as_filter(self) -> &'static str {
        match self {
            LogLevel::Off => "off",
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl Default for ShaderConfig {
    fn default() -> Self {
        Self {
            glsl_version: None,
            output_variable: "gl_FragColor".to_string(),
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::default(),
            dump_shaders: false,
        }
    }
}

impl Config {
    /// Load configuration from file, or create default if it doesn't exist
    pub fn load() -> Result<Self, Nv2aError> {
        Self::load_or_create(&Self::config_path())
    }

    /// Load configuration from `path`, writing the defaults there if it is missing
    pub fn load_or_create(path: &Path) -> Result<Self, Nv2aError> {
        if path.exists() {
            Self::load_from(path)
        } else {
            let config = Self::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    /// Load configuration from an explicit path
    pub fn load_from(path: &Path) -> Result<Self, Nv2aError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, Nv2aError> {
        toml::from_str(content).map_err(|e| Nv2aError::Config(e.to_string()))
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<(), Nv2aError> {
        self.save_to(&Self::config_path())
    }

    /// Save configuration to an explicit path
    pub fn save_to(&self, path: &Path) -> Result<(), Nv2aError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content =
            toml::to_string_pretty(self).map_err(|e| Nv2aError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the path to the configuration file
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("nv2a-psh")
            .join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.shader.glsl_version, None);
        assert_eq!(config.shader.output_variable, "gl_FragColor");
        assert_eq!(config.debug.log_level, LogLevel::Info);
        assert!(!config.debug.dump_shaders);
    }

    #[test]
    fn test_config_serialization() {
        let mut config = Config::default();
        config.shader.glsl_version = Some(120);
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = Config::from_toml_str("[debug]\ndump_shaders = true\n").unwrap();
        assert!(config.debug.dump_shaders);
        assert_eq!(config.shader.output_variable, "gl_FragColor");
    }

    #[test]
    fn test_invalid_config() {
        let err = Config::from_toml_str("[shader]\nglsl_version = \"abc\"\n").unwrap_err();
        assert!(matches!(err, Nv2aError::Config(_)));
    }

    #[test]
    fn test_config_file_roundtrip() {
        let temp_dir = env::temp_dir().join("nv2a_config_test");
        let _ = std::fs::remove_dir_all(&temp_dir);
        let path = temp_dir.join("config.toml");

        let mut config = Config::default();
        config.debug.log_level = LogLevel::Trace;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.debug.log_level, LogLevel::Trace);

        // Cleanup
        let _ = std::fs::remove_dir_all(&temp_dir);
    }

    #[test]
    fn test_load_or_create_writes_defaults() {
        let temp_dir = env::temp_dir().join("nv2a_config_create_test");
        let _ = std::fs::remove_dir_all(&temp_dir);
        let path = temp_dir.join("nested").join("config.toml");

        let created = Config::load_or_create(&path).unwrap();
        assert_eq!(created, Config::default());
        assert!(path.exists());

        std::fs::write(&path, "[shader]\nglsl_version = 330\n").unwrap();
        let loaded = Config::load_or_create(&path).unwrap();
        assert_eq!(loaded.shader.glsl_version, Some(330));
        assert_eq!(loaded.shader.output_variable, "gl_FragColor");

        // Cleanup
        let _ = std::fs::remove_dir_all(&temp_dir);
    }

    #[test]
    fn test_config_path() {
        let path = Config::config_path();
        assert!(path.ends_with("nv2a-psh/config.toml"));
    }
}
