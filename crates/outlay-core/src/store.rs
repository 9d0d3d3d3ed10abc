//! Data-access seams for categories and expenses
//!
//! Persistence lives behind these traits. The categorization pipeline only
//! reads through them, and the expense-creation workflow writes a single row
//! after categorization has completed or failed, so no store handle is ever
//! held across the network call to the provider.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{Category, Expense};

/// Read access to a user's categories
#[async_trait]
pub trait CategoryStore: Send + Sync {
    /// List the categories visible to `user_id`: system defaults plus the
    /// user's own. The returned order must be stable across calls so that
    /// prompts built from it are reproducible.
    async fn list(&self, user_id: Uuid) -> Result<Vec<Category>>;

    /// Fetch a single visible category by id
    async fn get(&self, id: Uuid, user_id: Uuid) -> Result<Option<Category>>;
}

/// Access to a user's expenses
#[async_trait]
pub trait ExpenseStore: Send + Sync {
    /// List up to `limit` of the user's expenses, most recent first
    /// (expense date descending).
    async fn list_recent(&self, user_id: Uuid, limit: usize) -> Result<Vec<Expense>>;

    /// Persist a new expense row
    async fn insert(&self, expense: Expense) -> Result<Expense>;
}
