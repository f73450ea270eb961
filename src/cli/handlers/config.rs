use anyhow::Result;
use std::env;

use crate::llm::LlmConfig;

pub fn handle_config_command() -> Result<()> {
    // Load .env file if it exists
    let env_file_loaded = dotenv::dotenv().is_ok();
    let config = LlmConfig::from_env();

    println!("🔧 TicketPilot Configuration");
    println!("═══════════════════════════════════════");
    println!();

    println!("📦 Version Information:");
    println!("  • TicketPilot: v{}", env!("CARGO_PKG_VERSION"));
    println!("  • License: {}", env!("CARGO_PKG_LICENSE"));
    println!();

    println!("🌍 Environment Configuration:");

    if env_file_loaded {
        println!("  • .env file: ✅ Loaded");
    } else {
        println!("  • .env file: ⚠️  Not found (using system environment)");
    }

    if config.is_configured() {
        println!("  • API key: ✅ Set (hidden)");
    } else {
        println!("  • API key: ❌ Not set (GEMINI_API_KEY / LLM_API_KEY)");
    }

    println!("  • Model: {}", config.model);
    println!("  • API base: {}", config.api_base);

    match config.max_tokens {
        Some(tokens) => println!("  • Max tokens: {}", tokens),
        None => println!("  • Max tokens: provider default"),
    }

    match config.temperature {
        Some(temp) => println!("  • Temperature: {}", temp),
        None => println!("  • Temperature: provider default"),
    }

    println!("  • LLM_DEBUG: {}", config.debug);

    match env::var("RUST_LOG") {
        Ok(val) => println!("  • RUST_LOG: {}", val),
        Err(_) => println!("  • RUST_LOG: info (default)"),
    }

    println!();

    println!("🤖 Classification:");
    if config.is_configured() {
        println!("  • AI Classification: ✅ Enabled");
    } else {
        println!("  • AI Classification: ❌ Disabled (no API key)");
        println!("  • Fallback: manual category and priority selection");
    }

    if let Err(e) = config.validate() {
        println!("  • Configuration problem: {}", e);
    }

    println!();
    println!("💡 Tips:");
    if !config.is_configured() {
        println!("  • Set GEMINI_API_KEY to enable AI-suggested category and priority");
    }
    println!("  • Use RUST_LOG=debug for detailed logging");
    println!("  • Set TICKETPILOT_DATA_FILE to choose where tickets are stored");

    Ok(())
}
