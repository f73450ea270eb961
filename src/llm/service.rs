use crate::llm::config::LlmConfig;
use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use backoff::ExponentialBackoffBuilder;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur in LLM service
#[derive(Debug, Error)]
pub enum LlmServiceError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    #[error("Other error: {0}")]
    Other(String),
}

impl LlmServiceError {
    /// Short error kind used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ConfigError(_) => "ConfigError",
            Self::Transport(_) => "Transport",
            Self::ApiError(_) => "ApiError",
            Self::RateLimitExceeded(_) => "RateLimitExceeded",
            Self::Other(_) => "Other",
        }
    }
}

impl From<OpenAIError> for LlmServiceError {
    fn from(e: OpenAIError) -> Self {
        match e {
            OpenAIError::Reqwest(err) => Self::Transport(err.to_string()),
            OpenAIError::ApiError(api) => {
                let message = api.message;
                let lower = message.to_lowercase();
                if lower.contains("rate limit") || lower.contains("quota") {
                    Self::RateLimitExceeded(message)
                } else {
                    Self::ApiError(message)
                }
            }
            other => Self::Other(other.to_string()),
        }
    }
}

/// A text-completion capability: one prompt in, the raw response text out.
///
/// Implementations make exactly one request per call. An empty string means
/// the provider answered without usable text.
#[async_trait]
pub trait CompletionModel: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, LlmServiceError>;

    /// Model identifier, for logging
    fn model_name(&self) -> &str;
}

/// Service for interacting with OpenAI-compatible chat completion APIs
pub struct LlmService {
    client: Client<OpenAIConfig>,
    config: LlmConfig,
}

impl LlmService {
    /// Create a new LLM service from configuration
    pub fn new(config: LlmConfig) -> Result<Self, LlmServiceError> {
        config.validate().map_err(LlmServiceError::ConfigError)?;

        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.api_key)
            .with_api_base(&config.api_base);

        // Zero elapsed-time budget disables the client's rate-limit retries
        let no_retry = ExponentialBackoffBuilder::new()
            .with_max_elapsed_time(Some(Duration::ZERO))
            .build();
        let client = Client::with_config(openai_config).with_backoff(no_retry);

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &LlmConfig {
        &self.config
    }
}

#[async_trait]
impl CompletionModel for LlmService {
    async fn complete(&self, prompt: &str) -> Result<String, LlmServiceError> {
        let message = ChatCompletionRequestUserMessageArgs::default()
            .content(prompt)
            .build()
            .map(ChatCompletionRequestMessage::User)
            .map_err(|e| LlmServiceError::Other(e.to_string()))?;

        let mut request_builder = CreateChatCompletionRequestArgs::default();
        request_builder
            .model(&self.config.model)
            .messages(vec![message]);

        if let Some(max_tokens) = self.config.max_tokens {
            request_builder.max_completion_tokens(max_tokens);
        }

        if let Some(temperature) = self.config.temperature {
            request_builder.temperature(temperature);
        }

        let request = request_builder
            .build()
            .map_err(|e| LlmServiceError::Other(e.to_string()))?;

        if self.config.debug {
            tracing::debug!(
                "Sending request: model={}, prompt_chars={}",
                self.config.model,
                prompt.chars().count()
            );
        }

        // Single attempt; the HTTP client's own defaults govern timeouts
        let response = self.client.chat().create(request).await?;

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .unwrap_or_default();

        if self.config.debug {
            tracing::debug!("Received response: {} chars", content.len());
        }

        Ok(content)
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}
