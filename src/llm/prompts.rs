/// Placeholder replaced by the ticket description
pub const DESCRIPTION_PLACEHOLDER: &str = "{description}";

/// Fixed instruction template for ticket classification
pub const CLASSIFICATION_PROMPT: &str = "You are a support ticket classifier. \
Analyze the following support ticket description and classify it.

You must return ONLY a valid JSON object with exactly two fields:
- \"suggested_category\": must be one of: billing, technical, account, general
- \"suggested_priority\": must be one of: low, medium, high, critical

Classification guidelines:
- \"billing\": payment issues, charges, invoices, subscriptions, refunds, pricing
- \"technical\": bugs, errors, crashes, performance, integrations, API issues
- \"account\": login issues, password resets, profile changes, permissions, access
- \"general\": feature requests, questions, feedback, other inquiries

Priority guidelines:
- \"critical\": system down, data loss, security breach, complete inability to use service
- \"high\": significant functionality broken, major business impact, urgent deadline
- \"medium\": moderate inconvenience, workaround exists, non-urgent issues
- \"low\": minor cosmetic issues, general questions, feature requests

Ticket description:
{description}

Return ONLY the JSON object, no markdown, no explanation:";

/// Build the classification prompt for a ticket description.
///
/// The description is embedded verbatim. Only the first placeholder is
/// substituted so braces inside the description are never re-expanded.
pub fn build_classification_prompt(description: &str) -> String {
    CLASSIFICATION_PROMPT.replacen(DESCRIPTION_PLACEHOLDER, description, 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tickets::{Category, Priority};

    #[test]
    fn test_prompt_embeds_description_verbatim() {
        let description = "My card was charged twice \"today\" {urgent}\nplease help";
        let prompt = build_classification_prompt(description);

        assert!(prompt.contains(description));
        assert!(!prompt.contains(DESCRIPTION_PLACEHOLDER));
    }

    #[test]
    fn test_description_containing_placeholder_is_not_expanded() {
        let prompt = build_classification_prompt("literal {description} text");
        assert_eq!(prompt.matches("literal {description} text").count(), 1);
    }

    #[test]
    fn test_prompt_names_fields_and_all_values() {
        let prompt = build_classification_prompt("anything");

        assert!(prompt.contains("\"suggested_category\""));
        assert!(prompt.contains("\"suggested_priority\""));
        for category in Category::ALL {
            assert!(prompt.contains(&format!("- \"{}\":", category)));
        }
        for priority in Priority::ALL {
            assert!(prompt.contains(&format!("- \"{}\":", priority)));
        }
        assert!(prompt.contains("Return ONLY the JSON object"));
    }
}
