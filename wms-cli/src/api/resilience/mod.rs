//! Retry and request monitoring for the bulk-import client

pub mod config;
pub mod retry;

pub use config::{MonitoringConfig, ResilienceConfig};
pub use retry::{AttemptError, RetryConfig, RetryPolicy, RetryableError};
