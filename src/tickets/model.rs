use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::TicketError;

/// Maximum number of characters allowed in a ticket title
pub const MAX_TITLE_CHARS: usize = 200;

/// Support ticket category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Billing,
    Technical,
    Account,
    General,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Billing,
        Category::Technical,
        Category::Account,
        Category::General,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Billing => "billing",
            Category::Technical => "technical",
            Category::Account => "account",
            Category::General => "general",
        }
    }
}

/// Support ticket priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl Priority {
    pub const ALL: [Priority; 4] = [
        Priority::Low,
        Priority::Medium,
        Priority::High,
        Priority::Critical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Critical => "critical",
        }
    }
}

/// Lifecycle status of a ticket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    Open,
    InProgress,
    Resolved,
    Closed,
}

impl Status {
    pub const ALL: [Status; 4] = [
        Status::Open,
        Status::InProgress,
        Status::Resolved,
        Status::Closed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Open => "open",
            Status::InProgress => "in_progress",
            Status::Resolved => "resolved",
            Status::Closed => "closed",
        }
    }
}

/// Error returned when a string is not a member of one of the ticket enumerations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{value}' is not a valid {kind}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl FromStr for Category {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownVariant { kind: "category", value: s.to_string() })
    }
}

impl FromStr for Priority {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| UnknownVariant { kind: "priority", value: s.to_string() })
    }
}

impl FromStr for Status {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|st| st.as_str() == s)
            .ok_or_else(|| UnknownVariant { kind: "status", value: s.to_string() })
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored support ticket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub priority: Priority,
    pub status: Status,
    pub created_at: DateTime<Utc>,
}

/// Payload for creating a ticket
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTicket {
    pub title: String,
    pub description: String,
    pub category: Category,
    pub priority: Priority,
    #[serde(default)]
    pub status: Option<Status>,
}

impl NewTicket {
    pub fn validate(&self) -> Result<(), TicketError> {
        validate_title(&self.title)?;
        validate_description(&self.description)
    }

    /// Materialize the ticket with the id and timestamp assigned by the store
    pub fn into_ticket(self, id: u64, created_at: DateTime<Utc>) -> Ticket {
        Ticket {
            id,
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            category: self.category,
            priority: self.priority,
            status: self.status.unwrap_or_default(),
            created_at,
        }
    }
}

/// Partial update of a ticket; absent fields are left unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TicketUpdate {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub status: Option<Status>,
}

impl TicketUpdate {
    pub fn validate(&self) -> Result<(), TicketError> {
        if let Some(title) = &self.title {
            validate_title(title)?;
        }
        if let Some(description) = &self.description {
            validate_description(description)?;
        }
        Ok(())
    }

    pub fn apply_to(self, ticket: &mut Ticket) {
        if let Some(title) = self.title {
            ticket.title = title.trim().to_string();
        }
        if let Some(description) = self.description {
            ticket.description = description.trim().to_string();
        }
        if let Some(category) = self.category {
            ticket.category = category;
        }
        if let Some(priority) = self.priority {
            ticket.priority = priority;
        }
        if let Some(status) = self.status {
            ticket.status = status;
        }
    }
}

fn validate_title(title: &str) -> Result<(), TicketError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(TicketError::validation("title", "This field may not be blank."));
    }
    if title.chars().count() > MAX_TITLE_CHARS {
        return Err(TicketError::validation(
            "title",
            format!("Ensure this field has no more than {} characters.", MAX_TITLE_CHARS),
        ));
    }
    Ok(())
}

fn validate_description(description: &str) -> Result<(), TicketError> {
    if description.trim().is_empty() {
        return Err(TicketError::validation("description", "This field may not be blank."));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_ticket(title: &str, description: &str) -> NewTicket {
        NewTicket {
            title: title.to_string(),
            description: description.to_string(),
            category: Category::Technical,
            priority: Priority::High,
            status: None,
        }
    }

    #[test]
    fn test_enum_string_round_trip() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>().unwrap(), category);
        }
        for priority in Priority::ALL {
            assert_eq!(priority.to_string().parse::<Priority>().unwrap(), priority);
        }
        assert_eq!("in_progress".parse::<Status>().unwrap(), Status::InProgress);
    }

    #[test]
    fn test_from_str_is_exact() {
        let err = "Billing".parse::<Category>().unwrap_err();
        assert_eq!(err.kind, "category");
        assert_eq!(err.value, "Billing");
        assert!("weather".parse::<Category>().is_err());
        assert!("urgent".parse::<Priority>().is_err());
    }

    #[test]
    fn test_status_serializes_snake_case() {
        let json = serde_json::to_string(&Status::InProgress).unwrap();
        assert_eq!(json, "\"in_progress\"");
    }

    #[test]
    fn test_new_ticket_defaults_to_open() {
        let ticket = new_ticket("Login broken", "Cannot log in since yesterday")
            .into_ticket(7, Utc::now());
        assert_eq!(ticket.id, 7);
        assert_eq!(ticket.status, Status::Open);
    }

    #[test]
    fn test_validate_blank_title() {
        let err = new_ticket("   ", "Something happened").validate().unwrap_err();
        assert!(matches!(err, TicketError::Validation { field: "title", .. }));
    }

    #[test]
    fn test_validate_title_length() {
        let ok = new_ticket(&"a".repeat(MAX_TITLE_CHARS), "desc");
        assert!(ok.validate().is_ok());

        let too_long = new_ticket(&"a".repeat(MAX_TITLE_CHARS + 1), "desc");
        let err = too_long.validate().unwrap_err();
        assert!(err.to_string().contains("no more than 200 characters"));
    }

    #[test]
    fn test_validate_blank_description() {
        let err = new_ticket("Title", "").validate().unwrap_err();
        assert!(matches!(err, TicketError::Validation { field: "description", .. }));
    }

    #[test]
    fn test_update_applies_only_present_fields() {
        let mut ticket = new_ticket("Title", "Description").into_ticket(1, Utc::now());
        let update = TicketUpdate {
            status: Some(Status::Resolved),
            priority: Some(Priority::Low),
            ..Default::default()
        };
        update.apply_to(&mut ticket);

        assert_eq!(ticket.status, Status::Resolved);
        assert_eq!(ticket.priority, Priority::Low);
        assert_eq!(ticket.title, "Title");
        assert_eq!(ticket.category, Category::Technical);
    }

    #[test]
    fn test_text_fields_are_stored_trimmed() {
        let mut ticket = new_ticket("  Refund  ", "\n Charged twice for March \t")
            .into_ticket(1, Utc::now());
        assert_eq!(ticket.title, "Refund");
        assert_eq!(ticket.description, "Charged twice for March");

        let update = TicketUpdate {
            title: Some(" Refund issued ".to_string()),
            description: Some("  Resolved by support  ".to_string()),
            ..Default::default()
        };
        update.apply_to(&mut ticket);
        assert_eq!(ticket.title, "Refund issued");
        assert_eq!(ticket.description, "Resolved by support");
    }

    #[test]
    fn test_title_length_ignores_surrounding_whitespace() {
        let padded = format!("  {}  ", "a".repeat(MAX_TITLE_CHARS));
        assert!(new_ticket(&padded, "desc").validate().is_ok());
    }

    #[test]
    fn test_update_rejects_blank_title() {
        let update = TicketUpdate {
            title: Some(String::new()),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }

    #[test]
    fn test_new_ticket_rejects_unknown_category() {
        let body = r#"{"title": "t", "description": "d", "category": "banana", "priority": "low"}"#;
        assert!(serde_json::from_str::<NewTicket>(body).is_err());
    }
}
