//! Resilience configuration
//!
//! Bundles the retry policy and request monitoring options used by the
//! bulk-import client, with presets and a conversion from the user's settings.

use std::time::Duration;

use super::retry::RetryConfig;
use crate::config::RetrySettings;

/// Resilience configuration for API calls
#[derive(Debug, Clone, Default)]
pub struct ResilienceConfig {
    pub retry: RetryConfig,
    pub monitoring: MonitoringConfig,
}

/// Request logging options
#[derive(Debug, Clone)]
pub struct MonitoringConfig {
    /// Log each request's method, URL and payload size at debug level
    pub request_logging: bool,
    /// Log elapsed time for each request at info level
    pub performance_metrics: bool,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            request_logging: true,
            performance_metrics: true,
        }
    }
}

impl ResilienceConfig {
    /// Disable retries and logging (for testing)
    pub fn disabled() -> Self {
        Self {
            retry: RetryConfig::none(),
            monitoring: MonitoringConfig {
                request_logging: false,
                performance_metrics: false,
            },
        }
    }

    /// Build from the `[retry]` section of the config file
    pub fn from_settings(settings: &RetrySettings) -> Self {
        let retry = if settings.enabled {
            RetryConfig {
                max_attempts: settings.max_attempts.max(1),
                base_delay: Duration::from_millis(settings.base_delay_ms),
                max_delay: Duration::from_millis(settings.max_delay_ms),
                backoff_multiplier: settings.backoff_multiplier,
                jitter: settings.jitter,
            }
        } else {
            RetryConfig::none()
        };

        Self {
            retry,
            monitoring: MonitoringConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_settings() {
        let settings = RetrySettings {
            max_attempts: 5,
            base_delay_ms: 200,
            ..RetrySettings::default()
        };
        let config = ResilienceConfig::from_settings(&settings);
        assert_eq!(config.retry.max_attempts, 5);
        assert_eq!(config.retry.base_delay, Duration::from_millis(200));
    }

    #[test]
    fn test_disabled_retry_means_one_attempt() {
        let settings = RetrySettings {
            enabled: false,
            max_attempts: 5,
            ..RetrySettings::default()
        };
        assert_eq!(ResilienceConfig::from_settings(&settings).retry.max_attempts, 1);
        assert_eq!(ResilienceConfig::disabled().retry.max_attempts, 1);
    }
}
