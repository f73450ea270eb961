use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};

use super::parser::{try_parse_classification, ParseError};
use super::ClassificationResult;
use crate::llm::{prompts, CompletionModel, LlmConfig, LlmService, LlmServiceError};

/// Number of characters of an unparseable response included in logs
const RAW_PREVIEW_CHARS: usize = 200;

/// Why a classification could not be produced
#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("no API key configured, classification disabled")]
    ConfigurationAbsent,

    #[error("LLM call failed: {0}")]
    Transport(#[from] LlmServiceError),

    #[error("LLM returned empty response")]
    EmptyResponse,

    #[error("LLM returned unparseable response ({source}): {preview}")]
    Unparseable { source: ParseError, preview: String },
}

/// Suggests a category and priority for a ticket description.
///
/// Every failure (missing key, transport error, empty or invalid output)
/// collapses to `None` at [`ClassificationService::classify`]; callers treat
/// that as "classification unavailable".
pub struct ClassificationService {
    config: LlmConfig,
    model: Arc<dyn CompletionModel>,
}

impl ClassificationService {
    pub fn new(config: LlmConfig, model: Arc<dyn CompletionModel>) -> Self {
        Self { config, model }
    }

    /// Build a service backed by the OpenAI-compatible client
    pub fn from_config(config: LlmConfig) -> Result<Self, LlmServiceError> {
        let service = LlmService::new(config.clone())?;
        Ok(Self::new(config, Arc::new(service)))
    }

    pub fn is_enabled(&self) -> bool {
        self.config.is_configured()
    }

    pub fn model_name(&self) -> &str {
        self.model.model_name()
    }

    /// Classify a description, returning `None` when no valid result is available
    pub async fn classify(&self, description: &str) -> Option<ClassificationResult> {
        match self.try_classify(description).await {
            Ok(result) => {
                info!(
                    "LLM classified ticket: category={}, priority={}",
                    result.category(),
                    result.priority()
                );
                Some(result)
            }
            Err(ClassifyError::ConfigurationAbsent) => {
                info!("LLM API key not set - skipping classification");
                None
            }
            Err(ClassifyError::Transport(e)) => {
                error!("LLM classification failed: {}: {}", e.kind(), e);
                None
            }
            Err(e @ ClassifyError::EmptyResponse) => {
                warn!("{}", e);
                None
            }
            Err(e @ ClassifyError::Unparseable { .. }) => {
                warn!("{}", e);
                None
            }
        }
    }

    /// Classify a description, reporting which stage failed
    pub async fn try_classify(&self, description: &str) -> Result<ClassificationResult, ClassifyError> {
        if !self.config.is_configured() {
            return Err(ClassifyError::ConfigurationAbsent);
        }

        let prompt = prompts::build_classification_prompt(description);

        let raw = self.model.complete(&prompt).await?;

        if raw.trim().is_empty() {
            return Err(ClassifyError::EmptyResponse);
        }

        try_parse_classification(&raw).map_err(|source| ClassifyError::Unparseable {
            source,
            preview: raw.chars().take(RAW_PREVIEW_CHARS).collect(),
        })
    }
}
