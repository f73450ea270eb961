use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use crate::api::{self, AppState};
use crate::classify::ClassificationService;
use crate::llm::LlmConfig;
use crate::tickets::{MemoryStore, TicketStore};

pub async fn handle_serve_command(
    host: String,
    port: u16,
    data_file: Option<PathBuf>,
    in_memory: bool,
) -> Result<()> {
    let llm_config = LlmConfig::from_env();
    let classifier = ClassificationService::from_config(llm_config)
        .context("Invalid LLM configuration")?;

    if classifier.is_enabled() {
        info!("✓ AI classification enabled (model: {})", classifier.model_name());
    } else {
        warn!("AI classification disabled - GEMINI_API_KEY not configured");
        warn!("  Tickets can still be created with manual category and priority");
    }

    let store: Arc<dyn TicketStore> = if in_memory {
        Arc::new(MemoryStore::new())
    } else {
        let path = data_file.unwrap_or_else(default_data_file);
        info!("📂 Ticket data file: {}", path.display());
        Arc::new(
            MemoryStore::open(&path)
                .await
                .with_context(|| format!("Failed to open ticket store at {}", path.display()))?,
        )
    };
    info!("Using {} ticket store", store.name());

    let state = AppState::new(store, Arc::new(classifier));
    api::serve(&format!("{}:{}", host, port), state).await
}

fn default_data_file() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("ticketpilot"))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tickets.json")
}
