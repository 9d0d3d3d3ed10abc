//! Expense-creation workflow
//!
//! Creates expense rows, invoking the AI category suggester when the caller
//! did not pick a category. The suggestion is applied only when its
//! confidence clears the acceptance threshold; otherwise the expense is
//! created uncategorized with no AI fields set. Categorization completes or
//! fails before the row is written, so no store handle spans the provider
//! call.

use chrono::Utc;
use uuid::Uuid;

use crate::ai::Categorizer;
use crate::error::{Error, Result};
use crate::models::{Expense, NewExpense, MAX_DESCRIPTION_LEN};
use crate::store::{CategoryStore, ExpenseStore};

/// Expense-creation service
///
/// The categorizer is optional: without a configured provider, expenses are
/// simply created as submitted.
pub struct ExpenseService {
    categorizer: Option<Categorizer>,
}

impl ExpenseService {
    /// Create a service with an optional categorizer
    pub fn new(categorizer: Option<Categorizer>) -> Self {
        Self { categorizer }
    }

    /// Create a new expense
    ///
    /// When no category was supplied and a categorizer is configured, asks it
    /// for a suggestion and applies it if accepted, recording both the actual
    /// category and the AI fields. The AI step never fails expense creation.
    pub async fn create_expense<S>(
        &self,
        store: &S,
        user_id: Uuid,
        new: NewExpense,
    ) -> Result<Expense>
    where
        S: CategoryStore + ExpenseStore,
    {
        validate(&new)?;

        let mut category_id = new.category_id;
        let mut ai_suggested_category_id = None;
        let mut ai_confidence_score = None;

        if category_id.is_none() {
            if let Some(categorizer) = &self.categorizer {
                let result = categorizer
                    .categorize(store, user_id, &new.description, new.amount)
                    .await;
                if let Some((suggested_id, confidence)) = result.accepted() {
                    category_id = Some(suggested_id);
                    ai_suggested_category_id = Some(suggested_id);
                    ai_confidence_score = Some(confidence);
                }
            }
        }

        let now = Utc::now();
        let expense = Expense {
            id: Uuid::new_v4(),
            user_id,
            amount: new.amount,
            description: new.description,
            category_id,
            expense_date: new.expense_date,
            payment_method: new.payment_method,
            notes: new.notes,
            ai_suggested_category_id,
            ai_confidence_score,
            created_at: now,
            updated_at: now,
        };

        store.insert(expense).await
    }
}

fn validate(new: &NewExpense) -> Result<()> {
    if new.description.is_empty() {
        return Err(Error::InvalidData("Expense description is required".into()));
    }
    if new.description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(Error::InvalidData(format!(
            "Expense description exceeds {} characters",
            MAX_DESCRIPTION_LEN
        )));
    }
    if !new.amount.is_finite() || new.amount <= 0.0 {
        return Err(Error::InvalidData("Expense amount must be positive".into()));
    }
    Ok(())
}
