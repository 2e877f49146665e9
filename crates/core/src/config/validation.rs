//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::{AppConfig, MAX_RESULTS_LIMIT};
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `timeout_ms` is less than 100ms or exceeds 5 minutes
    /// - `connect_timeout_ms` is 0 or exceeds `timeout_ms`
    /// - `max_concurrency` is 0 or exceeds 64
    /// - `cache_capacity` or `cache_ttl_secs` is 0
    /// - `default_max_results` is outside 1-50
    /// - `user_agent` is empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_ms < 100 {
            return Err(ConfigError::Invalid { field: "timeout_ms".into(), reason: "must be at least 100ms".into() });
        }
        if self.timeout_ms > 300_000 {
            return Err(ConfigError::Invalid {
                field: "timeout_ms".into(),
                reason: "must not exceed 5 minutes (300000ms)".into(),
            });
        }

        if self.connect_timeout_ms == 0 || self.connect_timeout_ms > self.timeout_ms {
            return Err(ConfigError::Invalid {
                field: "connect_timeout_ms".into(),
                reason: "must be between 1 and timeout_ms".into(),
            });
        }

        if self.max_concurrency == 0 || self.max_concurrency > 64 {
            return Err(ConfigError::Invalid { field: "max_concurrency".into(), reason: "must be 1-64".into() });
        }

        if self.cache_capacity == 0 {
            return Err(ConfigError::Invalid {
                field: "cache_capacity".into(),
                reason: "must be greater than 0".into(),
            });
        }

        if self.cache_ttl_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "cache_ttl_secs".into(),
                reason: "must be greater than 0".into(),
            });
        }

        if self.default_max_results == 0 || self.default_max_results > MAX_RESULTS_LIMIT {
            return Err(ConfigError::Invalid {
                field: "default_max_results".into(),
                reason: format!("must be 1-{MAX_RESULTS_LIMIT}"),
            });
        }

        if self.user_agent.is_empty() {
            return Err(ConfigError::Invalid { field: "user_agent".into(), reason: "must not be empty".into() });
        }

        if self.max_concurrency == 1 {
            tracing::warn!("max_concurrency is 1; every backend call will run sequentially");
        }

        Ok(())
    }
}
