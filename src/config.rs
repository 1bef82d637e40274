//! Presenter configuration.
//!
//! Every field has a default, so an empty TOML document is a valid config:
//!
//! ```toml
//! tick_interval_ms = 500
//! utc_offset_seconds = 7200
//! show_subtitle = true
//! ```

use crate::error::{Error, Result};
use chrono::{FixedOffset, Offset, Utc};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

const DEFAULT_TICK_INTERVAL_MS: u64 = 500;
const MAX_UTC_OFFSET_SECONDS: i32 = 86_399;

/// Settings read by [`crate::countdown::Model::from_config`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Milliseconds between re-renders.
    pub tick_interval_ms: u64,
    /// Offset from UTC used when describing the scheduled date.
    pub utc_offset_seconds: i32,
    /// Whether `view()` includes the schedule subtitle line.
    pub show_subtitle: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            utc_offset_seconds: 0,
            show_subtitle: true,
        }
    }
}

impl Config {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Failed to parse TOML config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a TOML file from disk.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Checks value ranges that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.tick_interval_ms == 0 {
            return Err(Error::Config(
                "tick_interval_ms must be greater than zero".to_string(),
            ));
        }
        if self.utc_offset_seconds.abs() > MAX_UTC_OFFSET_SECONDS {
            return Err(Error::Config(format!(
                "utc_offset_seconds {} is outside ±{}",
                self.utc_offset_seconds, MAX_UTC_OFFSET_SECONDS
            )));
        }
        Ok(())
    }

    /// The tick interval as a `Duration`.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// The configured offset, falling back to UTC when out of range.
    pub fn utc_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_seconds).unwrap_or_else(|| Utc.fix())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.tick_interval(), Duration::from_millis(500));
        assert!(config.show_subtitle);
    }

    #[test]
    fn test_parse_all_fields() {
        let toml = r#"
            tick_interval_ms = 250
            utc_offset_seconds = -18000
            show_subtitle = false
        "#;

        let config = Config::from_toml_str(toml).unwrap();
        assert_eq!(config.tick_interval(), Duration::from_millis(250));
        assert_eq!(config.utc_offset().local_minus_utc(), -18_000);
        assert!(!config.show_subtitle);
    }

    #[test]
    fn test_zero_interval_rejected() {
        let err = Config::from_toml_str("tick_interval_ms = 0").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_offset_out_of_range_rejected() {
        let err = Config::from_toml_str("utc_offset_seconds = 90000").unwrap_err();
        assert!(err.to_string().contains("utc_offset_seconds"));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = Config::from_toml_str("tick_rate = 3").unwrap_err();
        assert!(err.to_string().starts_with("Configuration error"));
    }

    #[test]
    fn test_from_file() {
        let path = std::env::temp_dir().join(format!(
            "bubbletea-countdown-config-{}.toml",
            std::process::id()
        ));
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "tick_interval_ms = 1000").unwrap();
        drop(file);

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.tick_interval(), Duration::from_secs(1));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = Config::from_file("/nonexistent/countdown.toml").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
