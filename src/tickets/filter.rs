use serde::{Deserialize, Serialize};

use super::Ticket;

/// Query filters for listing tickets.
///
/// Every filter is optional and they combine with AND. Empty strings are
/// treated as absent. Enumerated filters compare the raw value, so an
/// unknown value simply matches nothing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TicketFilter {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    /// Case-insensitive substring matched against title or description
    #[serde(default)]
    pub search: Option<String>,
}

impl TicketFilter {
    pub fn matches(&self, ticket: &Ticket) -> bool {
        if let Some(category) = non_empty(&self.category) {
            if ticket.category.as_str() != category {
                return false;
            }
        }
        if let Some(priority) = non_empty(&self.priority) {
            if ticket.priority.as_str() != priority {
                return false;
            }
        }
        if let Some(status) = non_empty(&self.status) {
            if ticket.status.as_str() != status {
                return false;
            }
        }
        if let Some(search) = non_empty(&self.search) {
            let needle = search.to_lowercase();
            if !ticket.title.to_lowercase().contains(&needle)
                && !ticket.description.to_lowercase().contains(&needle)
            {
                return false;
            }
        }
        true
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
