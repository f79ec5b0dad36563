mod openai;
pub mod openai_compatible;

pub use openai::{OpenAiClient, DEFAULT_OPENAI_BASE_URL, DEFAULT_OPENAI_MODEL};
pub use response_tracing_core::{LlmRequest, LlmResponse, Message, Role};
