//! Queue configuration.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid configuration value for {key}: {message}")]
    InvalidValue { key: &'static str, message: String },
}

/// Queue configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueConfig {
    /// Progress (percent) past which unlocked entries pause.
    pub max_progress_percentage: u8,
    /// Entries the default policy lets generate at once.
    pub max_concurrent_generating: usize,
    /// Maximum number of queued entries.
    pub max_capacity: usize,
    /// Scheduler tick when no ping arrives.
    pub scheduler_poll_interval_ms: u64,
    pub preview_width: u32,
    pub preview_height: u32,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            max_progress_percentage: 100,
            max_concurrent_generating: 2,
            max_capacity: 8,
            scheduler_poll_interval_ms: 250,
            preview_width: 256,
            preview_height: 144,
        }
    }
}

impl QueueConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_progress_percentage > 100 {
            return Err(ConfigError::InvalidValue {
                key: "max_progress_percentage",
                message: format!("{} is above 100", self.max_progress_percentage),
            });
        }
        if self.max_concurrent_generating == 0 {
            return Err(ConfigError::InvalidValue {
                key: "max_concurrent_generating",
                message: "must be at least 1".to_string(),
            });
        }
        if self.max_capacity == 0 {
            return Err(ConfigError::InvalidValue {
                key: "max_capacity",
                message: "must be at least 1".to_string(),
            });
        }
        if self.preview_width == 0 || self.preview_height == 0 {
            return Err(ConfigError::InvalidValue {
                key: "preview_width/preview_height",
                message: "preview size must not be empty".to_string(),
            });
        }
        Ok(())
    }

    pub fn scheduler_poll_interval(&self) -> Duration {
        Duration::from_millis(self.scheduler_poll_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Write;

    #[test]
    fn missing_fields_use_defaults() {
        let config = QueueConfig::from_json_str(r#"{ "max_progress_percentage": 60 }"#).unwrap();

        assert_eq!(config.max_progress_percentage, 60);
        assert_eq!(config.max_capacity, QueueConfig::default().max_capacity);
        assert_eq!(config.scheduler_poll_interval(), Duration::from_millis(250));
    }

    #[rstest]
    #[case::threshold(r#"{ "max_progress_percentage": 101 }"#, "max_progress_percentage")]
    #[case::concurrency(r#"{ "max_concurrent_generating": 0 }"#, "max_concurrent_generating")]
    #[case::capacity(r#"{ "max_capacity": 0 }"#, "max_capacity")]
    #[case::preview(r#"{ "preview_width": 0 }"#, "preview_width/preview_height")]
    fn invalid_values_are_rejected(#[case] json: &str, #[case] expected_key: &str) {
        let err = QueueConfig::from_json_str(json).unwrap_err();

        assert!(matches!(err, ConfigError::InvalidValue { key, .. } if key == expected_key));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = QueueConfig::from_json_str("{ not json").unwrap_err();

        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn load_reads_a_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "max_capacity": 3 }}"#).unwrap();

        let config = QueueConfig::load(file.path()).unwrap();

        assert_eq!(config.max_capacity, 3);
    }
}
