//! Bulk-import API
//!
//! Sends normalized orders to the warehouse backend and parses the per-record
//! outcome summary it returns.

pub mod client;
pub mod models;
pub mod resilience;

pub use client::BulkImportClient;
pub use models::{BulkImportData, BulkImportResponse, ImportSummary, OutcomeKind, RecordOutcome};
pub use resilience::{
    MonitoringConfig, ResilienceConfig, RetryConfig, RetryPolicy, RetryableError,
};
