//! OpenAI chat-completions client

use std::time::Duration;

use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use url::Url;

use response_tracing_core::{LlmRequest, LlmResponse, Message, ResponseTracingError, Runnable};

use crate::openai_compatible::{ChatCompletionRequest, ChatCompletionResponse, OpenAiError};

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";

#[derive(Clone)]
pub struct OpenAiClient {
    base_url: Url,
    api_key: SecretString,
    model: String,
    temperature: Option<f32>,
    http: Client,
}

impl std::fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("base_url", &self.base_url.as_str())
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl OpenAiClient {
    pub fn new(
        api_key: SecretString,
        model: impl Into<String>,
    ) -> Result<Self, ResponseTracingError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|err| ResponseTracingError::LlmProvider(err.to_string()))?;
        let base_url = Url::parse(DEFAULT_OPENAI_BASE_URL)
            .map_err(|err| ResponseTracingError::InvalidConfig(err.to_string()))?;
        Ok(Self {
            base_url,
            api_key,
            model: model.into(),
            temperature: None,
            http,
        })
    }

    pub fn with_base_url(mut self, base_url: &str) -> Result<Self, ResponseTracingError> {
        self.base_url = Url::parse(base_url).map_err(|err| {
            ResponseTracingError::InvalidConfig(format!("invalid base url '{base_url}': {err}"))
        })?;
        Ok(self)
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/v1/chat/completions",
            self.base_url.as_str().trim_end_matches('/')
        )
    }
}

fn provider_error(status: reqwest::StatusCode, body: &str) -> ResponseTracingError {
    let message = serde_json::from_str::<OpenAiError>(body)
        .map(|err| err.error.message)
        .unwrap_or_else(|_| body.trim().to_string());
    ResponseTracingError::LlmProvider(format!("{status}: {message}"))
}

#[async_trait::async_trait]
impl Runnable<LlmRequest, LlmResponse> for OpenAiClient {
    async fn invoke(&self, input: LlmRequest) -> Result<LlmResponse, ResponseTracingError> {
        let LlmRequest {
            model,
            messages,
            temperature,
        } = input;
        let model = if model.is_empty() {
            self.model.clone()
        } else {
            model
        };
        let request = ChatCompletionRequest {
            model,
            messages,
            temperature: temperature.or(self.temperature),
            stream: false,
        };

        tracing::debug!(
            model = %request.model,
            messages = request.messages.len(),
            "chat completion request"
        );

        let response = self
            .http
            .post(self.completions_url())
            .bearer_auth(self.api_key.expose_secret())
            .json(&request)
            .send()
            .await
            .map_err(|err| ResponseTracingError::LlmProvider(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(provider_error(status, &body));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|err| ResponseTracingError::LlmProvider(err.to_string()))?;
        if completion.choices.is_empty() {
            return Err(ResponseTracingError::LlmProvider(
                "no choices returned".to_string(),
            ));
        }

        Ok(completion.into())
    }
}

#[async_trait::async_trait]
impl Runnable<Vec<Message>, LlmResponse> for OpenAiClient {
    async fn invoke(&self, input: Vec<Message>) -> Result<LlmResponse, ResponseTracingError> {
        let request = LlmRequest {
            model: self.model.clone(),
            messages: input,
            temperature: self.temperature,
        };
        Runnable::<LlmRequest, LlmResponse>::invoke(self, request).await
    }
}
