pub mod classify;
pub mod config;
pub mod serve;

// Re-export handler functions for convenience
pub use classify::handle_classify_command;
pub use config::handle_config_command;
pub use serve::handle_serve_command;
