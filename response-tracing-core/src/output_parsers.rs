use async_trait::async_trait;

use crate::{LlmResponse, ResponseTracingError, Runnable};

/// Extracts the generated text from an `LlmResponse`.
#[derive(Clone, Debug, Default)]
pub struct StrOutputParser;

#[async_trait]
impl Runnable<LlmResponse, String> for StrOutputParser {
    async fn invoke(&self, input: LlmResponse) -> Result<String, ResponseTracingError> {
        Ok(input.content().to_string())
    }
}

#[async_trait]
impl Runnable<String, String> for StrOutputParser {
    async fn invoke(&self, input: String) -> Result<String, ResponseTracingError> {
        Ok(input)
    }
}
