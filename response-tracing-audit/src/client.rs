use std::time::Duration;

use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use crate::events::{LogBulkRequest, LogBulkResult, LogEvent, ServiceResponse};
use crate::{AuditConfig, AuditRecord};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum AuditError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("http error: {status}")]
    Http { status: StatusCode, body: String },
    #[error("audit service returned {status}: {summary}")]
    Api { status: String, summary: String },
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Client for the Secure Audit Log service.
///
/// Each call is a single HTTP request; failures are returned, never retried.
#[derive(Clone, Debug)]
pub struct AuditClient {
    client: Client,
    base_url: String,
    token: SecretString,
    config_id: Option<String>,
}

impl AuditClient {
    pub fn new(config: &AuditConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url(),
            token: config.token.clone(),
            config_id: config.config_id.clone(),
        }
    }

    /// Writes `records` as one batch, preserving their order.
    pub async fn log_bulk(
        &self,
        records: &[AuditRecord],
    ) -> Result<ServiceResponse<LogBulkResult>, AuditError> {
        let url = format!("{}/v2/log", self.base_url);
        let payload = LogBulkRequest {
            events: records.iter().map(|event| LogEvent { event }).collect(),
            config_id: self.config_id.as_deref(),
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.token.expose_secret())
            .timeout(REQUEST_TIMEOUT)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AuditError::Http { status, body });
        }

        let body = response.bytes().await?;
        let envelope: ServiceResponse<LogBulkResult> = serde_json::from_slice(&body)?;
        if !is_accepted(&envelope.status) {
            return Err(AuditError::Api {
                status: envelope.status,
                summary: envelope.summary.unwrap_or_default(),
            });
        }

        tracing::debug!(
            request_id = %envelope.request_id,
            events = records.len(),
            "audit batch written"
        );
        Ok(envelope)
    }
}

fn is_accepted(status: &str) -> bool {
    matches!(status, "Success" | "Accepted")
}
