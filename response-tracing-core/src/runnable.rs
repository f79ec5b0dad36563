use async_trait::async_trait;

use crate::ResponseTracingError;

/// One stage of a pipeline: consumes an input and produces an output.
#[async_trait]
pub trait Runnable<Input: Send + 'static, Output: Send + 'static> {
    async fn invoke(&self, input: Input) -> Result<Output, ResponseTracingError>;
}
