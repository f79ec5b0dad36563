//! Pipeline primitives for response-tracing: composable runnables, LLM
//! message types, output parsing and run tracing.
mod chain;
mod error;
mod llm;
mod output_parsers;
mod runnable;
pub mod tracers;
mod value;

pub use chain::{Chain, RunnableExt};
pub use error::{ResponseTracingError, TracerError};
pub use llm::{Generation, LlmRequest, LlmResponse, Message, Role, TokenUsage};
pub use output_parsers::StrOutputParser;
pub use runnable::Runnable;
pub use tracers::{ListenerManager, Run, RunListener, RunType, TracedLlm};
pub use value::{ensure_object, Value};
