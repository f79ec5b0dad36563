use chrono::{DateTime, Utc};
use response_tracing_core::Run;
use serde::{Deserialize, Serialize};

pub const LLM_END_ACTION: &str = "llm/end";
pub const LLM_END_MESSAGE: &str = "Ending LLM.";

/// One event in the audit log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub timestamp: DateTime<Utc>,
    pub action: String,
    pub source: String,
    pub message: String,
    pub new: String,
}

impl AuditRecord {
    /// Record for one generated text of a finished LLM run.
    pub fn llm_end(run: &Run, text: impl Into<String>) -> Self {
        Self {
            timestamp: run.start_time,
            action: LLM_END_ACTION.to_string(),
            source: run.name.clone(),
            message: LLM_END_MESSAGE.to_string(),
            new: text.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct LogBulkRequest<'a> {
    pub events: Vec<LogEvent<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_id: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub(crate) struct LogEvent<'a> {
    pub event: &'a AuditRecord,
}

/// Response envelope shared by every service endpoint.
#[derive(Clone, Debug, Deserialize)]
pub struct ServiceResponse<T> {
    #[serde(default)]
    pub request_id: String,
    pub status: String,
    #[serde(default)]
    pub summary: Option<String>,
    pub result: Option<T>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct LogBulkResult {
    #[serde(default)]
    pub results: Vec<LogResult>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct LogResult {
    #[serde(default)]
    pub hash: Option<String>,
}
