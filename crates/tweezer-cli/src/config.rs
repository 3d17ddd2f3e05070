//! Configuration for the tweezer CLI.
//!
//! Values come from a YAML file, then `TWEEZER_*` environment variables, then
//! command-line flags applied by the individual commands.

use serde::{Deserialize, Serialize};
use std::path::Path;

use tweezer_compile::{
    CapacityMode, DeviceSpec, ResolverConfig, SchedulerConfig, SingleGateOrder, SteaneConfig,
};

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Target device grid.
    pub device: DeviceSpec,

    /// Layer scheduler settings.
    pub scheduler: SchedulerConfig,

    /// Duplicate resolver settings.
    pub resolver: ResolverConfig,

    /// Steane encoder settings.
    pub steane: SteaneConfig,

    /// Logging settings.
    pub logging: LoggingConfig,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Level used when neither `-v` nor `RUST_LOG` is given.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format: "console" or "json".
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "console".to_string()
}

impl Config {
    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(format!("{}: {e}", path.display())))?;

        Self::from_yaml(&contents)
    }

    /// Parse configuration from YAML text.
    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        let config: Config =
            serde_yaml_ng::from_str(contents).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration with environment variable overrides.
    ///
    /// Precedence: environment variables > config file > defaults.
    pub fn load(config_file: Option<&str>) -> Result<Self, ConfigError> {
        let config = if let Some(path) = config_file {
            Self::from_file(path)?
        } else {
            Self::default()
        };

        let config = config.merge_env();
        config.validate()?;

        Ok(config)
    }

    /// Merge environment variables into configuration.
    pub fn merge_env(mut self) -> Self {
        if let Ok(v) = std::env::var("TWEEZER_CAPACITY") {
            if let Ok(val) = v.parse() {
                self.device.capacity = val;
            }
        }

        if let Ok(v) = std::env::var("TWEEZER_STRICT_CAPACITY") {
            if let Ok(val) = v.parse::<bool>() {
                self.steane.capacity_mode = if val {
                    CapacityMode::Strict
                } else {
                    CapacityMode::Warn
                };
            }
        }

        if let Ok(v) = std::env::var("TWEEZER_SINGLE_ORDER") {
            if let Ok(val) = v.parse::<SingleGateOrder>() {
                self.scheduler.single_gate_order = val;
            }
        }

        if let Ok(v) = std::env::var("TWEEZER_LOG_FORMAT") {
            self.logging.format = v;
        }

        self
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.device
            .validate()
            .map_err(|e| ConfigError::ValidationError(e.to_string()))?;

        if self.resolver.max_iterations == 0 {
            return Err(ConfigError::ValidationError(
                "resolver.max_iterations must be greater than 0".to_string(),
            ));
        }

        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => {
                return Err(ConfigError::ValidationError(format!(
                    "Invalid log level: {other}"
                )));
            }
        }

        match self.logging.format.as_str() {
            "console" | "json" => {}
            other => {
                return Err(ConfigError::ValidationError(format!(
                    "Invalid log format: {other}"
                )));
            }
        }

        Ok(())
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}
