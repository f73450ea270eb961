pub mod config;
pub mod prompts;
pub mod service;

pub use config::LlmConfig;
pub use service::{CompletionModel, LlmService, LlmServiceError};
