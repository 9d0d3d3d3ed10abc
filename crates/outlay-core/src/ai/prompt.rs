//! Categorization prompt construction
//!
//! Builds the natural-language prompt sent to the completion backend. The
//! prompt lists the user's categories and a bounded set of past labeled
//! expenses, then instructs the model to answer with a bare JSON object.
//! That instruction is the only schema enforcement available, so the reply
//! interpreter in [`super::parsing`] treats violations as expected input.

use std::fmt::Write;

use crate::error::{Error, Result};
use crate::models::Category;

use super::types::CategorizationExample;

/// Maximum number of past expenses included in a prompt
pub const MAX_PROMPT_EXAMPLES: usize = 20;

/// Build the categorization prompt
///
/// Category lines keep the caller-supplied order so that the same inputs
/// always produce the same prompt. The examples block is omitted entirely
/// when there are no labeled past expenses. Fails with a configuration error
/// when the category list is empty; the orchestrator short-circuits before
/// any network call in that case.
pub fn build_categorization_prompt(
    categories: &[Category],
    examples: &[CategorizationExample],
    description: &str,
    amount: f64,
) -> Result<String> {
    if categories.is_empty() {
        return Err(Error::Configuration(
            "No categories available for categorization".into(),
        ));
    }

    let mut categories_text = String::new();
    for category in categories {
        let _ = writeln!(
            categories_text,
            "- {}: {}",
            category.name,
            category.description.as_deref().unwrap_or("No description")
        );
    }
    let categories_text = categories_text.trim_end();

    let mut examples_text = String::new();
    if !examples.is_empty() {
        examples_text.push_str("\n\nPast expenses from this user:");
        for example in examples.iter().take(MAX_PROMPT_EXAMPLES) {
            let _ = write!(
                examples_text,
                "\n- \"{}\" (${:.2}) → {}",
                example.description, example.amount, example.category
            );
        }
    }

    Ok(format!(
        r#"You are categorizing an expense for a user. Learn from their past categorization patterns.

Available categories:
{categories_text}
{examples_text}

New expense to categorize:
- Description: {description}
- Amount: ${amount:.2}

Based on the user's past categorization patterns and the expense details, which category fits best?

Respond ONLY with a JSON object in this exact format:
{{"category": "exact category name", "confidence": 0.95}}

The category must be one from the available categories list. Confidence should be 0.0-1.0."#
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn category(name: &str, description: Option<&str>) -> Category {
        Category {
            id: Uuid::new_v4(),
            user_id: None,
            name: name.to_string(),
            description: description.map(String::from),
            color: "#000000".to_string(),
            icon: "tag".to_string(),
            is_default: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_empty_categories_is_configuration_error() {
        let result = build_categorization_prompt(&[], &[], "Lunch", 12.0);
        assert!(matches!(result, Err(Error::Configuration(_))));
    }

    #[test]
    fn test_category_lines_keep_order_and_fallback_description() {
        let categories = vec![
            category("Transport", Some("Rides and transit")),
            category("Food", None),
        ];
        let prompt = build_categorization_prompt(&categories, &[], "Lunch", 12.0).unwrap();

        let transport = prompt.find("- Transport: Rides and transit").unwrap();
        let food = prompt.find("- Food: No description").unwrap();
        assert!(transport < food);
    }

    #[test]
    fn test_examples_block_omitted_when_empty() {
        let categories = vec![category("Food", None)];
        let prompt = build_categorization_prompt(&categories, &[], "Lunch", 12.0).unwrap();
        assert!(!prompt.contains("Past expenses from this user"));
    }

    #[test]
    fn test_examples_rendered_with_two_decimal_amounts() {
        let categories = vec![category("Food", None)];
        let examples = vec![CategorizationExample {
            description: "Pizza night".to_string(),
            amount: 23.5,
            category: "Food".to_string(),
        }];
        let prompt =
            build_categorization_prompt(&categories, &examples, "Lunch", 12.0).unwrap();
        assert!(prompt.contains("Past expenses from this user:"));
        assert!(prompt.contains(r#"- "Pizza night" ($23.50) → Food"#));
    }

    #[test]
    fn test_examples_capped_at_twenty() {
        let categories = vec![category("Food", None)];
        let examples: Vec<CategorizationExample> = (0..30)
            .map(|i| CategorizationExample {
                description: format!("expense {}", i),
                amount: 1.0,
                category: "Food".to_string(),
            })
            .collect();
        let prompt =
            build_categorization_prompt(&categories, &examples, "Lunch", 12.0).unwrap();
        assert!(prompt.contains("expense 19"));
        assert!(!prompt.contains("expense 20"));
    }

    #[test]
    fn test_new_expense_amount_two_decimals() {
        let categories = vec![category("Food", None)];
        let prompt = build_categorization_prompt(&categories, &[], "Uber ride", 12.5).unwrap();
        assert!(prompt.contains("- Description: Uber ride"));
        assert!(prompt.contains("- Amount: $12.50"));
    }

    #[test]
    fn test_json_instruction_present() {
        let categories = vec![category("Food", None)];
        let prompt = build_categorization_prompt(&categories, &[], "Lunch", 12.0).unwrap();
        assert!(prompt.contains(r#"{"category": "exact category name", "confidence": 0.95}"#));
        assert!(prompt.contains("must be one from the available categories list"));
    }
}
