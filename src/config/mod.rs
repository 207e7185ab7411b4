//! Configuration management for tokenbox
//!
//! This module handles loading, parsing, and managing configuration from various sources:
//! - Configuration files (TOML format)
//! - Environment variables
//! - Command-line arguments
//!
//! Configuration precedence (highest to lowest):
//! 1. Command-line arguments
//! 2. Environment variables
//! 3. Configuration file
//! 4. Default values

use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};
use crate::input::delimiter::{DelimiterKind, DelimiterPolicy};
use crate::input::filter::MatchMode;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Delimiter configuration
    #[serde(default)]
    pub delimiter: DelimiterConfig,

    /// Suggestion matching configuration
    #[serde(default)]
    pub matching: MatchConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Delimiter-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DelimiterConfig {
    /// Which delimiter kind triggers token commits
    #[serde(default = "default_kind")]
    pub kind: DelimiterKind,

    /// Separator literal for the `custom` kind
    ///
    /// Ignored for built-in kinds. Required when `kind = "custom"`;
    /// building a policy without it is a configuration error.
    #[serde(default)]
    pub custom_separator: Option<String>,
}

/// Suggestion matching configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Matching predicate (substring or prefix)
    #[serde(default = "default_mode")]
    pub mode: MatchMode,

    /// Compare candidates case-sensitively
    #[serde(default = "default_case_sensitive")]
    pub case_sensitive: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: LogLevel,

    /// Path to log file (None for stderr)
    #[serde(default)]
    pub file_path: Option<PathBuf>,
}

/// Log level options
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

// Default value functions
fn default_kind() -> DelimiterKind {
    DelimiterKind::Semicolon
}

fn default_mode() -> MatchMode {
    MatchMode::Substring
}

fn default_case_sensitive() -> bool {
    true
}

fn default_log_level() -> LogLevel {
    LogLevel::Warn
}

impl Default for Config {
    fn default() -> Self {
        Self {
            delimiter: DelimiterConfig::default(),
            matching: MatchConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for DelimiterConfig {
    fn default() -> Self {
        Self {
            kind: default_kind(),
            custom_separator: None,
        }
    }
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            mode: default_mode(),
            case_sensitive: default_case_sensitive(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file_path: None,
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a file
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file (TOML format)
    ///
    /// # Returns
    /// * `Result<Config>` - Loaded configuration or error
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound(path.display().to_string()))?;

        let config: Config =
            toml::from_str(&contents).map_err(|e| ConfigError::InvalidFormat(e.to_string()))?;

        Ok(config)
    }

    /// Load configuration from the default path and environment
    ///
    /// Missing config file is not an error; defaults are used. A file
    /// that exists but fails to parse IS an error (fail fast rather
    /// than silently running with defaults).
    ///
    /// # Returns
    /// * `Result<Config>` - Merged configuration or error
    pub fn load() -> Result<Self> {
        let path = Self::default_path();
        let mut config = if path.exists() {
            Self::from_file(&path)?
        } else {
            Self::default()
        };

        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Apply environment variable overrides
    ///
    /// Environment variables are prefixed with TOKENBOX_
    /// Example: TOKENBOX_DELIMITER=comma
    ///
    /// # Returns
    /// * `Result<()>` - Success, or a fail-fast error for an unparsable value
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(kind) = env::var("TOKENBOX_DELIMITER") {
            self.delimiter.kind = kind.parse()?;
        }
        if let Ok(sep) = env::var("TOKENBOX_CUSTOM_SEPARATOR") {
            self.delimiter.custom_separator = Some(sep);
        }
        if let Ok(mode) = env::var("TOKENBOX_MATCH_MODE") {
            self.matching.mode = mode.parse()?;
        }
        if let Ok(value) = env::var("TOKENBOX_CASE_SENSITIVE") {
            self.matching.case_sensitive = match value.as_str() {
                "true" | "1" => true,
                "false" | "0" => false,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        field: "matching.case_sensitive".to_string(),
                        value,
                    }
                    .into());
                }
            };
        }
        if let Ok(level) = env::var("TOKENBOX_LOG_LEVEL") {
            self.logging.level = level.parse()?;
        }
        Ok(())
    }

    /// Get the default configuration file path
    ///
    /// # Returns
    /// * `PathBuf` - Path to default configuration file
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tokenbox")
            .join("config.toml")
    }

    /// Save configuration to a file
    ///
    /// # Arguments
    /// * `path` - Path where to save the configuration
    ///
    /// # Returns
    /// * `Result<()>` - Success or error
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents =
            toml::to_string_pretty(self).map_err(|e| ConfigError::InvalidFormat(e.to_string()))?;
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Build the delimiter policy described by this configuration
    ///
    /// Fails fast when `kind = "custom"` without a `custom_separator`.
    ///
    /// # Returns
    /// * `Result<DelimiterPolicy>` - Policy or configuration error
    pub fn delimiter_policy(&self) -> Result<DelimiterPolicy> {
        match self.delimiter.kind {
            DelimiterKind::Custom => {
                let sep = self.delimiter.custom_separator.clone().ok_or_else(|| {
                    ConfigError::MissingField("delimiter.custom_separator".to_string())
                })?;
                Ok(DelimiterPolicy::custom(sep))
            }
            kind => Ok(DelimiterPolicy::new(kind)),
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = crate::error::TokenBoxError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warn" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            _ => Err(ConfigError::InvalidValue {
                field: "logging.level".to_string(),
                value: s.to_string(),
            }
            .into()),
        }
    }
}

impl LogLevel {
    /// Convert to tracing::Level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.delimiter.kind, DelimiterKind::Semicolon);
        assert!(config.delimiter.custom_separator.is_none());
        assert_eq!(config.matching.mode, MatchMode::Substring);
        assert!(config.matching.case_sensitive);
        assert_eq!(config.logging.level, LogLevel::Warn);
    }

    #[test]
    fn test_parse_toml() {
        let toml_str = r#"
            [delimiter]
            kind = "comma"

            [matching]
            mode = "prefix"
            case_sensitive = false
        "#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.delimiter.kind, DelimiterKind::Comma);
        assert_eq!(config.matching.mode, MatchMode::Prefix);
        assert!(!config.matching.case_sensitive);
        // Unspecified section falls back to defaults
        assert_eq!(config.logging.level, LogLevel::Warn);
    }

    #[test]
    fn test_parse_toml_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.delimiter.kind, DelimiterKind::Semicolon);
    }

    #[test]
    fn test_parse_toml_unknown_kind() {
        let toml_str = r#"
            [delimiter]
            kind = "colon"
        "#;
        let result: std::result::Result<Config, _> = toml::from_str(toml_str);
        assert!(result.is_err());
    }

    #[test]
    fn test_custom_policy_requires_separator() {
        let mut config = Config::default();
        config.delimiter.kind = DelimiterKind::Custom;
        assert!(config.delimiter_policy().is_err());

        config.delimiter.custom_separator = Some("::".to_string());
        let policy = config.delimiter_policy().unwrap();
        assert_eq!(policy.separator(), Some("::"));
    }

    #[test]
    fn test_log_level_parse() {
        assert_eq!("debug".parse::<LogLevel>().unwrap(), LogLevel::Debug);
        assert_eq!("WARN".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert!("verbose".parse::<LogLevel>().is_err());
    }

    #[test]
    fn test_save_round_trip() {
        let dir = std::env::temp_dir().join("tokenbox-config-test");
        let path = dir.join("config.toml");
        let mut config = Config::default();
        config.delimiter.kind = DelimiterKind::Pipe;
        config.save(&path).unwrap();

        let loaded = Config::from_file(&path).unwrap();
        assert_eq!(loaded.delimiter.kind, DelimiterKind::Pipe);
        std::fs::remove_dir_all(&dir).ok();
    }
}
