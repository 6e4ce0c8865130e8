//! # Configuration Management
//!
//! Centralized configuration for the packet codec and movement validator.
//!
//! Every validator threshold is a named, overridable parameter rather than a
//! literal baked into a rule.
//!
//! ## Configuration Sources
//! - TOML files via `from_file()`
//! - Direct instantiation with defaults
//! - Environment-specific overrides via `from_env()`
//!
//! ## Defaults
//! - Positions beyond ±30,000,000 on any axis are rejected
//! - More than 500 jumps inside a 3 second window marks the client as a bot
//! - Vertical steps up to 0.6 blocks (stairs, slabs) never count as jumps

use crate::error::{ProtocolError, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Duration;
use tracing::Level;

/// Largest coordinate magnitude a client may report
pub const POSITION_BOUND: f32 = 30_000_000.0;

/// Largest vertical change between two accepted move packets
pub const MAX_VERTICAL_CHANGE: f32 = 6.0;

/// Largest change on either horizontal axis between two accepted move packets
pub const MAX_HORIZONTAL_CHANGE: f32 = 5.0;

/// Length of the jump-counting window
pub const JUMP_WINDOW: Duration = Duration::from_secs(3);

/// Jumps allowed inside one window
pub const JUMP_LIMIT: u32 = 500;

/// Upper edge of a stair/slab step; rises up to this are never jumps
pub const SLAB_STEP_HEIGHT: f32 = 0.6;

/// Rise a jump must exceed to be counted
pub const JUMP_MIN_RISE: f32 = 0.42;

/// Minimum spacing between two move packets from one connection
pub const MIN_MOVE_INTERVAL: Duration = Duration::from_millis(10);

/// Top-level configuration
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ProtocolConfig {
    /// Movement validator thresholds
    #[serde(default)]
    pub movement: MovementConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ProtocolConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)
            .map_err(|e| ProtocolError::ConfigError(format!("Failed to open config file: {e}")))?;

        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(|e| ProtocolError::ConfigError(format!("Failed to read config file: {e}")))?;

        Self::from_toml(&contents)
    }

    /// Load configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str::<Self>(content)
            .map_err(|e| ProtocolError::ConfigError(format!("Failed to parse TOML: {e}")))
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Some(val) = env_parse::<u64>("BEDROCK_PROTOCOL_MIN_MOVE_INTERVAL_MS")? {
            config.movement.min_move_interval = Duration::from_millis(val);
        }

        if let Some(val) = env_parse::<f32>("BEDROCK_PROTOCOL_MAX_VERTICAL_CHANGE")? {
            config.movement.max_vertical_change = val;
        }

        if let Some(val) = env_parse::<f32>("BEDROCK_PROTOCOL_MAX_HORIZONTAL_CHANGE")? {
            config.movement.max_horizontal_change = val;
        }

        if let Some(val) = env_parse::<u64>("BEDROCK_PROTOCOL_JUMP_WINDOW_MS")? {
            config.movement.jump_window = Duration::from_millis(val);
        }

        if let Some(val) = env_parse::<u32>("BEDROCK_PROTOCOL_JUMP_LIMIT")? {
            config.movement.jump_limit = val;
        }

        Ok(config)
    }

    /// Apply overrides to the default configuration
    pub fn default_with_overrides<F>(mutator: F) -> Self
    where
        F: FnOnce(&mut Self),
    {
        let mut config = Self::default();
        mutator(&mut config);
        config
    }

    /// Generate example configuration file content
    pub fn example_config() -> String {
        toml::to_string_pretty(&Self::default())
            .unwrap_or_else(|_| String::from("# Failed to generate example config"))
    }

    /// Save configuration to a file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ProtocolError::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content)
            .map_err(|e| ProtocolError::ConfigError(format!("Failed to write config file: {e}")))?;

        Ok(())
    }

    /// Validate the configuration for common issues and misconfigurations
    ///
    /// Returns a list of validation errors. Empty list means configuration is valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        errors.extend(self.movement.validate());
        errors.extend(self.logging.validate());
        errors
    }

    /// Validate and return Result - convenience method
    pub fn validate_strict(&self) -> Result<()> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ProtocolError::ConfigError(format!(
                "Configuration validation failed:\n  - {}",
                errors.join("\n  - ")
            )))
        }
    }
}

/// A set-but-unparsable variable is an error; an unset one is `None`.
fn env_parse<T: std::str::FromStr>(key: &str) -> Result<Option<T>> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ProtocolError::ConfigError(format!("Invalid value for {key}: '{raw}'"))),
        Err(_) => Ok(None),
    }
}

/// Movement & input validator thresholds
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MovementConfig {
    /// Minimum spacing between move packets (zero disables the flood check)
    #[serde(with = "duration_serde")]
    pub min_move_interval: Duration,

    /// Largest accepted vertical change between move packets
    pub max_vertical_change: f32,

    /// Largest accepted change on the x or z axis between move packets
    pub max_horizontal_change: f32,

    /// Largest accepted coordinate magnitude
    pub position_bound: f32,

    /// Rolling window for jump counting
    #[serde(with = "duration_serde")]
    pub jump_window: Duration,

    /// Jumps allowed inside one window
    pub jump_limit: u32,

    /// Rises in (0, slab_step_height] are stair/slab steps, not jumps
    pub slab_step_height: f32,

    /// Rise a jump must exceed to be counted
    pub jump_min_rise: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            min_move_interval: MIN_MOVE_INTERVAL,
            max_vertical_change: MAX_VERTICAL_CHANGE,
            max_horizontal_change: MAX_HORIZONTAL_CHANGE,
            position_bound: POSITION_BOUND,
            jump_window: JUMP_WINDOW,
            jump_limit: JUMP_LIMIT,
            slab_step_height: SLAB_STEP_HEIGHT,
            jump_min_rise: JUMP_MIN_RISE,
        }
    }
}

impl MovementConfig {
    /// Validate movement configuration
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        let distances = [
            ("max_vertical_change", self.max_vertical_change),
            ("max_horizontal_change", self.max_horizontal_change),
            ("position_bound", self.position_bound),
            ("slab_step_height", self.slab_step_height),
            ("jump_min_rise", self.jump_min_rise),
        ];
        for (name, value) in distances {
            if !value.is_finite() {
                errors.push(format!("{name} must be a finite number"));
            } else if value <= 0.0 {
                errors.push(format!("{name} must be greater than 0 (got {value})"));
            }
        }

        if self.jump_limit == 0 {
            errors.push("Jump limit must be greater than 0".to_string());
        }

        if self.jump_window.is_zero() {
            errors.push("Jump window must be greater than 0".to_string());
        } else if self.jump_window.as_secs() > 3600 {
            errors.push("Jump window too long (maximum: 1 hour)".to_string());
        }

        if self.min_move_interval.as_secs() > 10 {
            errors.push("Minimum move interval too long (maximum: 10s)".to_string());
        }

        errors
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Application name for logs
    pub app_name: String,

    /// Log level
    #[serde(with = "log_level_serde")]
    pub log_level: Level,

    /// Whether to use JSON formatting for logs
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            app_name: String::from("bedrock-protocol-core"),
            log_level: Level::INFO,
            json_format: false,
        }
    }
}

impl LoggingConfig {
    /// Validate logging configuration
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.app_name.is_empty() {
            errors.push("Application name cannot be empty".to_string());
        } else if self.app_name.len() > 64 {
            errors.push(format!(
                "Application name too long: {} characters (maximum: 64)",
                self.app_name.len()
            ));
        }

        errors
    }
}

/// Helper module for Duration serialization/deserialization
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let millis = duration.as_millis() as u64;
        millis.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}

/// Helper module for tracing::Level serialization/deserialization
mod log_level_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::str::FromStr;
    use tracing::Level;

    pub fn serialize<S>(level: &Level, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let level_str = match *level {
            Level::TRACE => "trace",
            Level::DEBUG => "debug",
            Level::INFO => "info",
            Level::WARN => "warn",
            Level::ERROR => "error",
        };
        level_str.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Level, D::Error>
    where
        D: Deserializer<'de>,
    {
        let level_str = String::deserialize(deserializer)?;
        Level::from_str(&level_str)
            .map_err(|_| serde::de::Error::custom(format!("Invalid log level: {level_str}")))
    }
}
