//! AI categorization types
//!
//! These types are backend-agnostic and shared across the categorization
//! pipeline.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Minimum confidence for a suggestion to be applied to a new expense.
///
/// Fixed by policy, not configurable per call.
pub const CONFIDENCE_THRESHOLD: f64 = 0.5;

/// Options for a single completion request
#[derive(Debug, Clone, Copy)]
pub struct CompletionOptions {
    /// Sampling temperature. Categorization runs low to bias toward
    /// consistent picks.
    pub temperature: f32,
    /// Output length cap. The expected reply is a short JSON object.
    pub max_tokens: u32,
}

/// A past labeled expense used as a prompt example
///
/// Transient and derived: constructed fresh per request from the user's
/// expense history, never persisted.
#[derive(Debug, Clone)]
pub struct CategorizationExample {
    pub description: String,
    pub amount: f64,
    pub category: String,
}

/// Raw suggestion interpreted from a provider reply
///
/// The category is still a name at this point; resolution against the user's
/// category set happens afterwards. Confidence is unvalidated provider output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorySuggestion {
    pub category: String,
    pub confidence: f64,
}

/// Outcome of one categorization attempt
///
/// Either a resolved category with the provider's confidence, or nothing.
/// Every failure mode in the pipeline collapses to `Absent`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CategorizationResult {
    Suggested { category_id: Uuid, confidence: f64 },
    Absent,
}

impl CategorizationResult {
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Provider confidence, 0.0 when absent
    pub fn confidence(&self) -> f64 {
        match self {
            Self::Suggested { confidence, .. } => *confidence,
            Self::Absent => 0.0,
        }
    }

    /// The suggestion if it clears the acceptance threshold
    ///
    /// Confidence must be strictly greater than [`CONFIDENCE_THRESHOLD`] for
    /// the expense-creation workflow to apply it.
    pub fn accepted(&self) -> Option<(Uuid, f64)> {
        match self {
            Self::Suggested {
                category_id,
                confidence,
            } if *confidence > CONFIDENCE_THRESHOLD => Some((*category_id, *confidence)),
            _ => None,
        }
    }
}
