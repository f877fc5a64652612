//! Configuration loading: TOML file with environment variable overrides.
//!
//! Looks for `cloudlink.toml` in the working directory (or the path in
//! `CLOUDLINK_CONFIG`). Every field has a sensible default so the file is
//! optional. Environment variables take precedence over file values.

use std::collections::HashSet;
use std::time::Duration;

use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Event emission settings.
    pub events: EventsConfig,
    /// Simulated thermostats to expose.
    pub devices: Vec<DeviceConfig>,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// Event emission configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct EventsConfig {
    /// Minimum delay between two events of the same name, in milliseconds.
    pub wait_time_ms: u64,
    /// Interval between periodic temperature reports, in seconds.
    pub poll_interval_secs: u64,
}

/// One simulated thermostat.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// Device id assigned by the cloud.
    pub id: String,
    /// Human-readable name, used in logs.
    pub name: String,
    /// Initial target and measured temperature.
    pub initial_temperature: f32,
}

impl Config {
    /// Load configuration from `cloudlink.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("CLOUDLINK_CONFIG").unwrap_or_else(|_| "cloudlink.toml".to_string());
        let mut config = Self::from_file(&path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("CLOUDLINK_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("CLOUDLINK_POLL_INTERVAL_SECS")
            && let Ok(secs) = val.parse()
        {
            self.events.poll_interval_secs = secs;
        }
        if let Ok(val) = std::env::var("CLOUDLINK_EVENT_WAIT_MS")
            && let Ok(ms) = val.parse()
        {
            self.events.wait_time_ms = ms;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.events.poll_interval_secs == 0 {
            return Err(ConfigError::Validation(
                "poll_interval_secs must be non-zero".to_string(),
            ));
        }
        let mut seen = HashSet::new();
        for device in &self.devices {
            if device.id.is_empty() {
                return Err(ConfigError::Validation(
                    "device id must not be empty".to_string(),
                ));
            }
            if !seen.insert(device.id.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "device id {} is listed twice",
                    device.id
                )));
            }
        }
        Ok(())
    }

    /// Minimum delay between two events of the same name.
    #[must_use]
    pub fn event_wait_time(&self) -> Duration {
        Duration::from_millis(self.events.wait_time_ms)
    }

    /// Interval between periodic temperature reports.
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.events.poll_interval_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            logging: LoggingConfig::default(),
            events: EventsConfig::default(),
            devices: vec![DeviceConfig::default()],
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "cloudlinkd=info,cloudlink_app=info,cloudlink_adapter_virtual=info".to_string(),
        }
    }
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            wait_time_ms: 60_000,
            poll_interval_secs: 60,
        }
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            id: "virtual-thermostat".to_string(),
            name: "Virtual Thermostat".to_string(),
            initial_temperature: 21.0,
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_produce_sensible_defaults() {
        let config = Config::default();
        assert_eq!(config.events.wait_time_ms, 60_000);
        assert_eq!(config.events.poll_interval_secs, 60);
        assert_eq!(config.devices.len(), 1);
        assert_eq!(config.devices[0].id, "virtual-thermostat");
    }

    #[test]
    fn should_parse_minimal_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.events.poll_interval_secs, 60);
        assert_eq!(config.devices.len(), 1);
    }

    #[test]
    fn should_parse_full_toml() {
        let toml = "
            [logging]
            filter = 'debug'

            [events]
            wait_time_ms = 0
            poll_interval_secs = 5

            [[devices]]
            id = 'living-room'
            name = 'Living Room'
            initial_temperature = 19.5

            [[devices]]
            id = 'bedroom'
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.logging.filter, "debug");
        assert_eq!(config.event_wait_time(), Duration::ZERO);
        assert_eq!(config.poll_interval(), Duration::from_secs(5));
        assert_eq!(config.devices.len(), 2);
        assert_eq!(config.devices[0].name, "Living Room");
        assert!((config.devices[0].initial_temperature - 19.5).abs() < f32::EPSILON);
        assert_eq!(config.devices[1].id, "bedroom");
        assert_eq!(config.devices[1].name, "Virtual Thermostat");
    }

    #[test]
    fn should_return_default_when_file_not_found() {
        let config = Config::from_file("nonexistent.toml").unwrap();
        assert_eq!(config.events.poll_interval_secs, 60);
    }

    #[test]
    fn should_reject_zero_poll_interval() {
        let mut config = Config::default();
        config.events.poll_interval_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_reject_empty_device_id() {
        let mut config = Config::default();
        config.devices[0].id = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_reject_duplicate_device_id() {
        let mut config = Config::default();
        config.devices.push(DeviceConfig::default());
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("listed twice"));
    }

    #[test]
    fn should_accept_defaults() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn should_report_parse_error_for_invalid_toml() {
        let result: Result<Config, _> = toml::from_str("invalid {{{");
        assert!(result.is_err());
    }
}
