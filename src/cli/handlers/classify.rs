use anyhow::{bail, Result};
use colored::Colorize;
use serde_json::json;
use tracing::info;

use crate::classify::{ClassificationService, ClassifyError, MIN_DESCRIPTION_CHARS};
use crate::cli::commands::OutputFormat;
use crate::llm::LlmConfig;

pub async fn handle_classify_command(description: String, format: OutputFormat) -> Result<()> {
    let description = description.trim();
    if description.chars().count() < MIN_DESCRIPTION_CHARS {
        bail!(
            "Description is too short for meaningful classification (minimum {} characters)",
            MIN_DESCRIPTION_CHARS
        );
    }

    let service = ClassificationService::from_config(LlmConfig::from_env())?;
    info!("🤖 Classifying with {}", service.model_name());

    let outcome = service.try_classify(description).await;

    match format {
        OutputFormat::Json => {
            let value = match &outcome {
                Ok(result) => serde_json::to_value(result)?,
                Err(e) => json!({ "error": "Classification unavailable", "reason": e.to_string() }),
            };
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        OutputFormat::Text => match &outcome {
            Ok(result) => {
                println!("{}", "✓ Suggested classification".green().bold());
                println!("  • Category: {}", result.category().to_string().cyan());
                println!("  • Priority: {}", result.priority().to_string().cyan());
            }
            Err(e) => {
                println!("{}", "⚠ Classification unavailable".yellow().bold());
                println!("  {}", e.to_string().dimmed());
                if matches!(e, ClassifyError::ConfigurationAbsent) {
                    println!("  Set GEMINI_API_KEY or LLM_API_KEY to enable AI classification");
                }
                println!("  Please select category and priority manually.");
            }
        },
    }

    Ok(())
}
