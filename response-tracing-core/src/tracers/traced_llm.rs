use serde::Serialize;
use serde_json::json;
use uuid::Uuid;

use crate::tracers::{ListenerManager, RunType};
use crate::{ensure_object, LlmResponse, ResponseTracingError, Runnable, Value};

/// Run outputs in the shape listeners expect: one inner sequence per prompt,
/// one entry per choice.
pub fn llm_run_outputs(response: &LlmResponse) -> Value {
    let generations: Vec<Value> = response
        .generations
        .iter()
        .map(|generation| {
            json!({
                "text": generation.text,
                "generation_info": { "finish_reason": generation.finish_reason },
            })
        })
        .collect();
    json!({
        "generations": [generations],
        "llm_output": {
            "model_name": response.model,
            "token_usage": response.token_usage,
        },
    })
}

/// Wraps a chat model so every invocation is recorded as an LLM run.
pub struct TracedLlm<L> {
    inner: L,
    manager: ListenerManager,
    name: String,
    parent_run_id: Option<Uuid>,
}

impl<L> TracedLlm<L> {
    pub fn new(inner: L, manager: ListenerManager, name: impl Into<String>) -> Self {
        Self {
            inner,
            manager,
            name: name.into(),
            parent_run_id: None,
        }
    }

    pub fn with_parent(mut self, parent_run_id: Uuid) -> Self {
        self.parent_run_id = Some(parent_run_id);
        self
    }
}

#[async_trait::async_trait]
impl<Input, L> Runnable<Input, LlmResponse> for TracedLlm<L>
where
    Input: Serialize + Send + Sync + 'static,
    L: Runnable<Input, LlmResponse> + Send + Sync,
{
    async fn invoke(&self, input: Input) -> Result<LlmResponse, ResponseTracingError> {
        if self.manager.is_noop() {
            return self.inner.invoke(input).await;
        }

        let inputs = ensure_object(serde_json::to_value(&input)?);
        let run = self
            .manager
            .start_run(self.name.clone(), RunType::Llm, self.parent_run_id, inputs);

        match self.inner.invoke(input).await {
            Ok(response) => {
                let outputs = llm_run_outputs(&response);
                self.manager.end_llm_run(run, outputs).await?;
                Ok(response)
            }
            Err(err) => {
                if let Err(trace_err) = self.manager.error_run(run, err.to_string()).await {
                    tracing::warn!(error = %trace_err, "failed to close errored LLM run");
                }
                Err(err)
            }
        }
    }
}
