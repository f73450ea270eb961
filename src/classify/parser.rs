//! Extraction and validation of classification results from raw model output.
//!
//! Model output is untrusted text: it may be wrapped in markdown fences,
//! surrounded by commentary, or contain values outside the allowed sets.
//! Nothing in here panics on any input.

use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

use super::ClassificationResult;
use crate::tickets::{Category, Priority};

/// Reasons a raw response could not be turned into a classification
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("no JSON object found in response")]
    NoJsonObject,

    #[error("malformed JSON: {0}")]
    Malformed(String),

    #[error("invalid values: category='{category}', priority='{priority}'")]
    InvalidValues { category: String, priority: String },
}

/// Shape the model is asked to produce. Unknown fields are ignored.
#[derive(Debug, Deserialize)]
struct ClassificationPayload {
    #[serde(default)]
    suggested_category: Option<String>,
    #[serde(default)]
    suggested_priority: Option<String>,
}

/// Parse raw model output into a validated classification.
///
/// Returns `None` when no valid result can be extracted; the reason is
/// logged at warning level.
pub fn parse_classification(raw: &str) -> Option<ClassificationResult> {
    match try_parse_classification(raw) {
        Ok(result) => Some(result),
        Err(e) => {
            warn!("Rejected LLM classification response: {}", e);
            None
        }
    }
}

/// Parse raw model output, reporting why extraction failed.
///
/// The greedy span from the first `{` to the last `}` is tried first. If it
/// decodes, its verdict is final. If it does not decode (for example because
/// the model echoed an example object before its answer), each outermost
/// balanced object is tried in order and the first valid one wins.
pub fn try_parse_classification(raw: &str) -> Result<ClassificationResult, ParseError> {
    let text = raw.trim();
    let greedy = greedy_json_span(text).ok_or(ParseError::NoJsonObject)?;

    let decode_error = match decode_and_validate(greedy) {
        Err(ParseError::Malformed(msg)) => msg,
        verdict => return verdict,
    };

    let mut first_invalid = None;
    for candidate in balanced_objects(text) {
        if candidate == greedy {
            continue;
        }
        match decode_and_validate(candidate) {
            Ok(result) => return Ok(result),
            Err(e @ ParseError::InvalidValues { .. }) if first_invalid.is_none() => {
                first_invalid = Some(e);
            }
            Err(_) => {}
        }
    }

    Err(first_invalid.unwrap_or(ParseError::Malformed(decode_error)))
}

/// Slice from the first `{` to the last `}` inclusive
fn greedy_json_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

/// Outermost brace-balanced `{...}` spans in order of appearance.
///
/// Braces inside JSON string literals are skipped. Unmatched braces are
/// ignored, so `{{{}` still yields the inner `{}`.
fn balanced_objects(text: &str) -> Vec<&str> {
    let mut stack: Vec<usize> = Vec::new();
    let mut spans: Vec<(usize, usize)> = Vec::new();
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in text.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            '"' if !stack.is_empty() => in_string = true,
            '{' => stack.push(i),
            '}' => {
                if let Some(start) = stack.pop() {
                    // Spans nested inside the one just closed sit at the tail
                    while spans.last().is_some_and(|&(s, _)| s > start) {
                        spans.pop();
                    }
                    spans.push((start, i));
                }
            }
            _ => {}
        }
    }

    spans.into_iter().map(|(s, e)| &text[s..=e]).collect()
}

fn decode_and_validate(block: &str) -> Result<ClassificationResult, ParseError> {
    let payload: ClassificationPayload =
        serde_json::from_str(block).map_err(|e| ParseError::Malformed(e.to_string()))?;

    let category = normalize(payload.suggested_category);
    let priority = normalize(payload.suggested_priority);

    match (category.parse::<Category>(), priority.parse::<Priority>()) {
        (Ok(category), Ok(priority)) => Ok(ClassificationResult::new(category, priority)),
        _ => Err(ParseError::InvalidValues { category, priority }),
    }
}

fn normalize(value: Option<String>) -> String {
    value.unwrap_or_default().trim().to_lowercase()
}
