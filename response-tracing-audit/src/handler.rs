use async_trait::async_trait;
use response_tracing_core::{Run, RunListener, TracerError};

use crate::{extract_generations, AuditClient, AuditConfig, AuditRecord};

const LISTENER_NAME: &str = "secure-audit-log";

/// Mirrors the text of every finished LLM run into the Secure Audit Log.
///
/// One run yields at most one `log_bulk` call. Delivery errors are returned
/// to the runtime and abort the traced stage.
#[derive(Clone, Debug)]
pub struct AuditCallbackHandler {
    client: AuditClient,
    log_missing_parent: bool,
}

impl AuditCallbackHandler {
    pub fn new(config: AuditConfig) -> Self {
        Self {
            client: AuditClient::new(&config),
            log_missing_parent: config.log_missing_parent,
        }
    }

    /// Audit records for `run`, one per generation that carries text.
    pub fn records_for(run: &Run) -> Vec<AuditRecord> {
        extract_generations(run.outputs.as_ref())
            .into_iter()
            .map(|generation| AuditRecord::llm_end(run, generation.text))
            .collect()
    }
}

#[async_trait]
impl RunListener for AuditCallbackHandler {
    async fn on_llm_end(&self, run: &Run) -> Result<(), TracerError> {
        let records = Self::records_for(run);
        if records.is_empty() {
            tracing::debug!(run_id = %run.id, "no generated text to audit");
            return Ok(());
        }

        self.client
            .log_bulk(&records)
            .await
            .map_err(|err| TracerError::listener(LISTENER_NAME, err))?;
        Ok(())
    }

    // Runs themselves are not stored.
    async fn persist_run(&self, _run: &Run) -> Result<(), TracerError> {
        Ok(())
    }

    fn log_missing_parent(&self) -> bool {
        self.log_missing_parent
    }
}
