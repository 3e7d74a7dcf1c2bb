//! Configuration validator
//!
//! Validates configuration values to ensure they are within acceptable ranges.

use super::loader::{Config, ConfigError};

/// Configuration validator
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validates the entire configuration
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        Self::validate_buffers(&config.buffers)?;
        Self::validate_logging(&config.logging)?;
        Ok(())
    }

    /// Validates buffer sizing
    fn validate_buffers(buffers: &super::loader::BufferConfig) -> Result<(), ConfigError> {
        if buffers.max_capacity == 0 {
            return Err(ConfigError::Invalid(
                "Buffer max_capacity cannot be 0".to_string(),
            ));
        }

        if buffers.max_capacity > 1 << 31 {
            return Err(ConfigError::Invalid(
                "Buffer max_capacity cannot exceed 2GB".to_string(),
            ));
        }

        let hints = [
            ("token_information", buffers.token_information),
            ("object_types", buffers.object_types),
            ("handle_table", buffers.handle_table),
        ];
        for (name, hint) in hints {
            if hint == 0 {
                return Err(ConfigError::Invalid(format!(
                    "Buffer hint {} cannot be 0",
                    name
                )));
            }
            if hint > buffers.max_capacity {
                return Err(ConfigError::Invalid(format!(
                    "Buffer hint {} exceeds max_capacity",
                    name
                )));
            }
        }

        Ok(())
    }

    /// Validates logging configuration
    fn validate_logging(logging: &super::loader::LoggingConfig) -> Result<(), ConfigError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&logging.level.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "Invalid log level: {}. Must be one of: {:?}",
                logging.level, valid_levels
            )));
        }

        if logging.file.is_empty() {
            return Err(ConfigError::Invalid(
                "Log file path cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}

/// Validates a configuration
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    ConfigValidator::validate(config)
}
