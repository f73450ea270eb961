//! AI-suggested category and priority for ticket descriptions.

pub mod parser;
pub mod service;

use serde::{Deserialize, Serialize};

use crate::tickets::{Category, Priority};

pub use parser::{parse_classification, try_parse_classification, ParseError};
pub use service::{ClassificationService, ClassifyError};

/// Minimum description length (after trimming) callers must enforce before classifying
pub const MIN_DESCRIPTION_CHARS: usize = 10;

/// Input to a classification call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationRequest {
    #[serde(default)]
    pub description: String,
}

/// Validated category and priority suggestion.
///
/// Only built from model output that passed validation, so both fields are
/// always members of their enumerations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClassificationResult {
    suggested_category: Category,
    suggested_priority: Priority,
}

impl ClassificationResult {
    pub(crate) fn new(category: Category, priority: Priority) -> Self {
        Self {
            suggested_category: category,
            suggested_priority: priority,
        }
    }

    pub fn category(&self) -> Category {
        self.suggested_category
    }

    pub fn priority(&self) -> Priority {
        self.suggested_priority
    }
}
