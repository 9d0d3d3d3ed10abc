//! Categorization orchestrator
//!
//! Composes the repository reads, prompt construction, completion call,
//! reply interpretation, and name resolution into one stateless operation.
//! Categorization is an optimization, not a correctness requirement of
//! expense creation, so every per-request failure collapses to
//! [`CategorizationResult::Absent`] instead of surfacing to the caller.

use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::Result;
use crate::models::Category;
use crate::store::{CategoryStore, ExpenseStore};

use super::parsing::parse_suggestion;
use super::prompt::{build_categorization_prompt, MAX_PROMPT_EXAMPLES};
use super::types::{CategorizationExample, CategorizationResult, CompletionOptions};
use super::{CompletionBackend, CompletionClient};

/// How many recent expenses to read when gathering prompt examples
const RECENT_EXPENSE_LIMIT: usize = 50;

/// Fixed completion settings for categorization: low temperature for
/// consistent picks, output capped to a short JSON reply.
const COMPLETION_OPTIONS: CompletionOptions = CompletionOptions {
    temperature: 0.3,
    max_tokens: 150,
};

/// Resolve an interpreted category name to an identifier
///
/// Case-insensitive exact match against the caller's categories; the first
/// match in caller-supplied order wins when names collide. No fuzzy or
/// partial matching.
pub fn resolve_category(name: &str, categories: &[Category]) -> Option<Uuid> {
    let wanted = name.trim().to_lowercase();
    categories
        .iter()
        .find(|c| c.name.to_lowercase() == wanted)
        .map(|c| c.id)
}

/// Expense categorization orchestrator
///
/// Holds the reusable completion client. Construct once at process start and
/// share by reference; every categorization request is independent with no
/// request-scoped mutable state.
#[derive(Clone)]
pub struct Categorizer {
    client: CompletionClient,
}

impl Categorizer {
    /// Create a categorizer with an injected completion client
    pub fn new(client: CompletionClient) -> Self {
        Self { client }
    }

    /// Create from environment variables
    ///
    /// Fails with a configuration error when the provider credential is
    /// missing; that is the only error this component ever raises.
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(CompletionClient::from_env()?))
    }

    /// Suggest a category for a new expense
    ///
    /// Always returns; provider outages, malformed replies, and unresolvable
    /// names all degrade to the absent result. With no categories to choose
    /// from the call short-circuits before any network traffic.
    pub async fn categorize<S>(
        &self,
        store: &S,
        user_id: Uuid,
        description: &str,
        amount: f64,
    ) -> CategorizationResult
    where
        S: CategoryStore + ExpenseStore,
    {
        match self.try_categorize(store, user_id, description, amount).await {
            Ok(result) => result,
            Err(e) => {
                warn!(error = %e, "AI categorization failed");
                CategorizationResult::Absent
            }
        }
    }

    async fn try_categorize<S>(
        &self,
        store: &S,
        user_id: Uuid,
        description: &str,
        amount: f64,
    ) -> Result<CategorizationResult>
    where
        S: CategoryStore + ExpenseStore,
    {
        let categories = CategoryStore::list(store, user_id).await?;
        if categories.is_empty() {
            debug!("No categories for user, skipping categorization");
            return Ok(CategorizationResult::Absent);
        }

        // Recent labeled expenses become prompt examples, newest first as the
        // store returns them.
        let recent = store.list_recent(user_id, RECENT_EXPENSE_LIMIT).await?;
        let examples: Vec<CategorizationExample> = recent
            .iter()
            .filter_map(|expense| {
                let category_id = expense.category_id?;
                let category = categories.iter().find(|c| c.id == category_id)?;
                Some(CategorizationExample {
                    description: expense.description.clone(),
                    amount: expense.amount,
                    category: category.name.clone(),
                })
            })
            .take(MAX_PROMPT_EXAMPLES)
            .collect();

        let prompt = build_categorization_prompt(&categories, &examples, description, amount)?;

        let raw = self.client.complete(&prompt, COMPLETION_OPTIONS).await?;
        debug!(model = %self.client.model(), response = %raw, "Provider reply");

        let suggestion = parse_suggestion(&raw)?;

        match resolve_category(&suggestion.category, &categories) {
            Some(category_id) => Ok(CategorizationResult::Suggested {
                category_id,
                // Passed through verbatim; the acceptance threshold is the
                // caller's policy.
                confidence: suggestion.confidence,
            }),
            None => {
                debug!(category = %suggestion.category, "Suggested category not in user's list");
                Ok(CategorizationResult::Absent)
            }
        }
    }
}
