use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResponseTracingError {
    #[error("LLM provider failed: {0}")]
    LlmProvider(String),
    #[error("Prompt formatting failed: {0}")]
    Prompt(String),
    #[error("Run tracing failed: {0}")]
    Tracer(#[from] TracerError),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Serialization/deserialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Failure reported by a [`RunListener`](crate::RunListener).
///
/// Listener errors abort the traced stage; the runtime never swallows them.
#[derive(Debug, Error)]
pub enum TracerError {
    #[error("listener '{listener}' failed: {source}")]
    Listener {
        listener: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl TracerError {
    pub fn listener(
        listener: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        TracerError::Listener {
            listener: listener.into(),
            source: Box::new(source),
        }
    }
}
