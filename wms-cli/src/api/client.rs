//! HTTP client for the bulk-import endpoint

use std::time::{Duration, Instant};

use anyhow::{Context, Result, anyhow};
use log::{debug, info};
use reqwest::StatusCode;
use reqwest::header::RETRY_AFTER;

use super::models::BulkImportResponse;
use super::resilience::{AttemptError, ResilienceConfig, RetryPolicy, RetryableError};
use crate::config::ApiConfig;
use crate::import::ImportPayload;

/// Client that submits normalized orders to the backend
#[derive(Debug, Clone)]
pub struct BulkImportClient {
    http: reqwest::Client,
    endpoint: String,
    token: Option<String>,
    resilience: ResilienceConfig,
}

impl BulkImportClient {
    pub fn new(api: &ApiConfig, resilience: ResilienceConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(api.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            endpoint: api.endpoint(),
            token: api.token.clone(),
            resilience,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// POST the payload, retrying transient failures
    pub async fn submit(&self, payload: &ImportPayload) -> Result<BulkImportResponse> {
        let policy = RetryPolicy::new(self.resilience.retry.clone());
        let start = Instant::now();

        if self.resilience.monitoring.request_logging {
            debug!(
                "POST {} ({} orders, {} line items)",
                self.endpoint,
                payload.orders.len(),
                payload.detail_count()
            );
        }

        let response = policy
            .execute(|| self.send_once(payload))
            .await
            .with_context(|| format!("Bulk import to {} failed", self.endpoint))?;

        if self.resilience.monitoring.performance_metrics {
            info!("Bulk import completed in {:.2?}", start.elapsed());
        }
        Ok(response)
    }

    async fn send_once(&self, payload: &ImportPayload) -> Result<BulkImportResponse, AttemptError> {
        let mut request = self.http.post(&self.endpoint).json(payload);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_connect() {
                AttemptError::Retry(RetryableError::Network(e.to_string()))
            } else if e.is_timeout() {
                AttemptError::Abort(anyhow!(
                    "Request timed out; the backend may still have imported the orders, \
                     check before sending again"
                ))
            } else {
                AttemptError::Abort(anyhow!(e).context("Failed to send request"))
            }
        })?;

        let status = response.status();
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map(Duration::from_secs);

        if let Some(retryable) = RetryableError::from_status(status.as_u16(), retry_after) {
            return Err(retryable.into());
        }

        let body = response
            .text()
            .await
            .map_err(|e| AttemptError::Abort(anyhow!(e).context("Failed to read response body")))?;

        parse_response(status, &body).map_err(AttemptError::Abort)
    }
}

/// Interpret a non-retryable response
fn parse_response(status: StatusCode, body: &str) -> Result<BulkImportResponse> {
    match serde_json::from_str::<BulkImportResponse>(body) {
        Ok(parsed) => Ok(parsed),
        Err(_) if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN => Err(
            anyhow!("Backend rejected the credentials (HTTP {}); check WMS_API_TOKEN", status.as_u16()),
        ),
        Err(_) if !status.is_success() => Err(anyhow!(
            "Backend returned HTTP {}: {}",
            status.as_u16(),
            body.trim()
        )),
        Err(e) => Err(anyhow!(e).context("Backend response is not a bulk-import result")),
    }
}
