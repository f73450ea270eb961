use anyhow::Result;
use clap::Parser;
use ticketpilot::cli::commands::{Cli, Commands};
use ticketpilot::cli::handlers::{
    handle_classify_command, handle_config_command, handle_serve_command,
};
use ticketpilot::cli::utils::{init_logging, print_info};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose, cli.log_format)?;

    // Execute command
    match cli.command {
        Commands::Serve {
            host,
            port,
            data_file,
            in_memory,
        } => handle_serve_command(host, port, data_file, in_memory).await,

        Commands::Classify { description, format } => {
            handle_classify_command(description, format).await
        }

        Commands::Config => handle_config_command(),

        Commands::Info => {
            print_info();
            Ok(())
        }
    }
}
