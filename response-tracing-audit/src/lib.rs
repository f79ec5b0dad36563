//! Secure Audit Log tracing for response-tracing pipelines.
//!
//! ```rust,no_run
//! use std::collections::HashMap;
//! use std::sync::Arc;
//!
//! use secrecy::SecretString;
//! use response_tracing_audit::{AuditCallbackHandler, AuditConfig};
//! use response_tracing_core::{ListenerManager, Role, Runnable, RunnableExt, StrOutputParser, TracedLlm};
//! use response_tracing_llm::OpenAiClient;
//! use response_tracing_prompt::ChatPromptTemplate;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AuditConfig::new(SecretString::new("pts_...".to_string()))
//!         .with_domain("aws.us.pangea.cloud");
//!     let manager = ListenerManager::new(vec![Arc::new(AuditCallbackHandler::new(config))]);
//!
//!     let llm = OpenAiClient::new(SecretString::new("sk-...".to_string()), "gpt-4o-mini")?;
//!     let chain = ChatPromptTemplate::from_messages([(Role::User, "{{input}}")])
//!         .then(TracedLlm::new(llm, manager, "ChatOpenAI"))
//!         .then(StrOutputParser);
//!
//!     let mut vars = HashMap::new();
//!     vars.insert("input".to_string(), "Hello".into());
//!     println!("{}", chain.invoke(vars).await?);
//!     Ok(())
//! }
//! ```
mod client;
mod config;
mod events;
mod generations;
mod handler;

pub use client::{AuditClient, AuditError};
pub use config::{AuditConfig, DEFAULT_DOMAIN};
pub use events::{
    AuditRecord, LogBulkResult, LogResult, ServiceResponse, LLM_END_ACTION, LLM_END_MESSAGE,
};
pub use generations::{extract_generations, TracedGeneration};
pub use handler::AuditCallbackHandler;
