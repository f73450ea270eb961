use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "ticketpilot",
    about = "Support ticket tracking backend with LLM-assisted triage",
    version,
    author
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format for logs
    #[arg(long, value_enum, default_value = "text", global = true)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the ticket HTTP API
    Serve {
        /// Address to bind
        #[arg(long, env = "TICKETPILOT_HOST", default_value = "127.0.0.1")]
        host: String,

        /// Port to listen on
        #[arg(short, long, env = "TICKETPILOT_PORT", default_value_t = 8000)]
        port: u16,

        /// JSON file tickets are persisted to (default: <data dir>/ticketpilot/tickets.json)
        #[arg(long, env = "TICKETPILOT_DATA_FILE", conflicts_with = "in_memory")]
        data_file: Option<PathBuf>,

        /// Keep tickets in memory only; nothing is written to disk
        #[arg(long)]
        in_memory: bool,
    },

    /// Suggest a category and priority for a ticket description
    Classify {
        /// Ticket description (at least 10 characters)
        #[arg(value_name = "DESCRIPTION")]
        description: String,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Display current TicketPilot configuration
    Config,

    /// Show information about TicketPilot
    Info,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
