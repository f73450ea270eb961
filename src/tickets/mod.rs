pub mod filter;
pub mod model;
pub mod stats;
pub mod store;

pub use filter::TicketFilter;
pub use model::{Category, NewTicket, Priority, Status, Ticket, TicketUpdate};
pub use stats::TicketStats;
pub use store::{MemoryStore, TicketStore};

/// Result type for ticket operations
pub type TicketResult<T> = Result<T, TicketError>;

/// Errors that can occur while handling tickets
#[derive(Debug, thiserror::Error)]
pub enum TicketError {
    #[error("{field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    #[error("Ticket {0} not found")]
    NotFound(u64),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl TicketError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for TicketError {
    fn from(e: std::io::Error) -> Self {
        Self::Storage(e.to_string())
    }
}

impl From<serde_json::Error> for TicketError {
    fn from(e: serde_json::Error) -> Self {
        Self::Storage(e.to_string())
    }
}
