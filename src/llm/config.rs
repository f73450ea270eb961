use std::env;

/// Gemini's OpenAI-compatible chat completions endpoint
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/openai";

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Configuration for LLM service
#[derive(Clone)]
pub struct LlmConfig {
    /// API key; empty means classification is disabled
    pub api_key: String,

    /// Model to use (e.g., "gemini-2.5-flash")
    pub model: String,

    /// API base URL of an OpenAI-compatible endpoint
    pub api_base: String,

    /// Maximum tokens for the response; provider default when unset
    pub max_tokens: Option<u32>,

    /// Sampling temperature (0.0-2.0); provider default when unset
    pub temperature: Option<f32>,

    /// Enable debug logging
    pub debug: bool,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            max_tokens: None,
            temperature: None,
            debug: false,
        }
    }
}

// Keeps the key out of logs and panic messages
impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("api_key", &if self.is_configured() { "<set>" } else { "<unset>" })
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("debug", &self.debug)
            .finish()
    }
}

impl LlmConfig {
    /// Build a configuration with the given key and default settings
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    /// Load configuration from environment variables.
    ///
    /// A missing key is not an error: the returned config reports
    /// `is_configured() == false` and classification stays disabled.
    pub fn from_env() -> Self {
        Self::from_env_internal(true)
    }

    /// Load configuration from environment variables with optional dotenv loading
    #[cfg(test)]
    fn from_env_no_dotenv() -> Self {
        Self::from_env_internal(false)
    }

    fn from_env_internal(load_dotenv: bool) -> Self {
        // Load .env file if it exists and not disabled
        if load_dotenv {
            let _ = dotenv::dotenv();
        }

        let api_key = env::var("GEMINI_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| env::var("LLM_API_KEY").ok())
            .unwrap_or_default();

        let mut config = Self {
            api_key: api_key.trim().to_string(),
            ..Default::default()
        };

        // Override defaults with environment variables if present
        if let Ok(model) = env::var("LLM_MODEL") {
            if !model.trim().is_empty() {
                config.model = model.trim().to_string();
            }
        }

        if let Ok(api_base) = env::var("LLM_API_BASE") {
            if !api_base.trim().is_empty() {
                config.api_base = api_base.trim().to_string();
            }
        }

        if let Ok(max_tokens) = env::var("LLM_MAX_TOKENS") {
            if let Ok(tokens) = max_tokens.parse::<u32>() {
                if tokens > 0 {
                    config.max_tokens = Some(tokens);
                }
            }
        }

        if let Ok(temperature) = env::var("LLM_TEMPERATURE") {
            if let Ok(temp) = temperature.parse::<f32>() {
                if (0.0..=2.0).contains(&temp) {
                    config.temperature = Some(temp);
                }
            }
        }

        if let Ok(debug) = env::var("LLM_DEBUG") {
            config.debug = debug.to_lowercase() == "true" || debug == "1";
        }

        config
    }

    /// Whether an API credential is present
    pub fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.model.trim().is_empty() {
            return Err("Model name is empty".to_string());
        }

        if self.api_base.trim().is_empty() {
            return Err("API base URL is empty".to_string());
        }

        if let Some(temperature) = self.temperature {
            if !(0.0..=2.0).contains(&temperature) {
                return Err(format!(
                    "Temperature must be between 0.0 and 2.0, got {}",
                    temperature
                ));
            }
        }

        if self.max_tokens == Some(0) {
            return Err("Max tokens must be greater than 0".to_string());
        }

        Ok(())
    }
}
