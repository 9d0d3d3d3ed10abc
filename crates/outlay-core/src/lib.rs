//! Outlay Core Library
//!
//! Shared functionality for the Outlay expense tracker backend:
//! - Domain models for categories and expenses
//! - Data-access traits with an in-memory implementation
//! - AI-assisted category suggestion (prompt building, reply interpretation,
//!   pluggable completion backends)
//! - Expense-creation workflow with the suggestion acceptance policy

pub mod ai;
pub mod error;
pub mod expense;
pub mod memory;
pub mod models;
pub mod store;

/// Test utilities including the mock provider server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use ai::{
    resolve_category, AnthropicBackend, CategorizationExample, CategorizationResult,
    Categorizer, CategorySuggestion, CompletionBackend, CompletionClient, CompletionOptions,
    MockBackend, CONFIDENCE_THRESHOLD,
};
pub use error::{Error, Result};
pub use expense::ExpenseService;
pub use memory::MemoryStore;
pub use models::{Category, Expense, NewExpense, PaymentMethod, MAX_DESCRIPTION_LEN};
pub use store::{CategoryStore, ExpenseStore};
