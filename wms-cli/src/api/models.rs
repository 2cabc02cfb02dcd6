//! Bulk-import endpoint response types

use serde::{Deserialize, Deserializer, Serialize};

/// Response body of the bulk-import endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkImportResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<BulkImportData>,
}

impl BulkImportResponse {
    pub fn summary(&self) -> Option<&ImportSummary> {
        self.data.as_ref().map(|d| &d.summary)
    }

    pub fn details(&self) -> &[RecordOutcome] {
        self.data
            .as_ref()
            .map(|d| d.details.as_slice())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkImportData {
    pub summary: ImportSummary,
    #[serde(default)]
    pub details: Vec<RecordOutcome>,
}

/// Per-record counts reported by the backend
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportSummary {
    pub total: u64,
    pub created: u64,
    pub failed: u64,
    pub skipped: u64,
}

impl ImportSummary {
    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

/// Outcome for one submitted order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordOutcome {
    #[serde(deserialize_with = "string_or_number")]
    pub order_id: String,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Coarse classification of [`RecordOutcome::status`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeKind {
    Created,
    Failed,
    Skipped,
    Other,
}

impl RecordOutcome {
    pub fn kind(&self) -> OutcomeKind {
        match self.status.trim().to_lowercase().as_str() {
            "created" | "success" | "ok" => OutcomeKind::Created,
            "failed" | "error" => OutcomeKind::Failed,
            "skipped" | "duplicate" => OutcomeKind::Skipped,
            _ => OutcomeKind::Other,
        }
    }
}

/// Backends sometimes echo numeric order ids back as numbers
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number for order_id, got {}",
            other
        ))),
    }
}
