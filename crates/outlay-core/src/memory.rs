//! In-memory store implementation
//!
//! Backs the store traits with plain vectors behind a lock. Used by the test
//! suite and by embedders that don't need durable persistence.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{Category, Expense};
use crate::store::{CategoryStore, ExpenseStore};

/// In-memory category/expense store
///
/// Categories keep insertion order, which is what makes prompt construction
/// reproducible. Expenses are returned most recent first.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    categories: Vec<Category>,
    expenses: Vec<Expense>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    // Every critical section is a single vector operation, so a poisoned
    // lock cannot hold a half-applied update; recover the guard instead of
    // surfacing the poison.
    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Seed a category
    pub fn add_category(&self, category: Category) {
        self.write().categories.push(category);
    }

    /// Seed an expense
    pub fn add_expense(&self, expense: Expense) {
        self.write().expenses.push(expense);
    }

    /// Number of stored expenses
    pub fn expense_count(&self) -> usize {
        self.read().expenses.len()
    }

    /// Fetch a stored expense by id
    pub fn expense(&self, id: Uuid) -> Option<Expense> {
        self.read().expenses.iter().find(|e| e.id == id).cloned()
    }
}

#[async_trait]
impl CategoryStore for MemoryStore {
    async fn list(&self, user_id: Uuid) -> Result<Vec<Category>> {
        Ok(self
            .read()
            .categories
            .iter()
            .filter(|c| c.user_id.is_none() || c.user_id == Some(user_id))
            .cloned()
            .collect())
    }

    async fn get(&self, id: Uuid, user_id: Uuid) -> Result<Option<Category>> {
        Ok(self
            .read()
            .categories
            .iter()
            .find(|c| c.id == id && (c.user_id.is_none() || c.user_id == Some(user_id)))
            .cloned())
    }
}

#[async_trait]
impl ExpenseStore for MemoryStore {
    async fn list_recent(&self, user_id: Uuid, limit: usize) -> Result<Vec<Expense>> {
        let mut expenses: Vec<Expense> = self
            .read()
            .expenses
            .iter()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect();
        // Date descending, newest insert first on ties
        expenses.sort_by(|a, b| {
            b.expense_date
                .cmp(&a.expense_date)
                .then(b.created_at.cmp(&a.created_at))
        });
        expenses.truncate(limit);
        Ok(expenses)
    }

    async fn insert(&self, expense: Expense) -> Result<Expense> {
        self.write().expenses.push(expense.clone());
        Ok(expense)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PaymentMethod;
    use chrono::{NaiveDate, Utc};

    fn category(name: &str, user_id: Option<Uuid>) -> Category {
        Category {
            id: Uuid::new_v4(),
            user_id,
            name: name.to_string(),
            description: None,
            color: "#000000".to_string(),
            icon: "tag".to_string(),
            is_default: user_id.is_none(),
            created_at: Utc::now(),
        }
    }

    fn expense(user_id: Uuid, description: &str, date: NaiveDate) -> Expense {
        Expense {
            id: Uuid::new_v4(),
            user_id,
            amount: 10.0,
            description: description.to_string(),
            category_id: None,
            expense_date: date,
            payment_method: PaymentMethod::Card,
            notes: None,
            ai_suggested_category_id: None,
            ai_confidence_score: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_list_includes_defaults_and_owned() {
        let store = MemoryStore::new();
        let user = Uuid::new_v4();
        let other = Uuid::new_v4();
        store.add_category(category("Food", None));
        store.add_category(category("Gear", Some(user)));
        store.add_category(category("Private", Some(other)));

        let visible = store.list(user).await.unwrap();
        let names: Vec<&str> = visible.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Food", "Gear"]);
    }

    #[tokio::test]
    async fn test_list_preserves_insertion_order() {
        let store = MemoryStore::new();
        let user = Uuid::new_v4();
        for name in ["Transport", "Food", "Rent"] {
            store.add_category(category(name, None));
        }

        let visible = store.list(user).await.unwrap();
        let names: Vec<&str> = visible.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Transport", "Food", "Rent"]);
    }

    #[tokio::test]
    async fn test_list_recent_orders_by_date_descending() {
        let store = MemoryStore::new();
        let user = Uuid::new_v4();
        store.add_expense(expense(
            user,
            "old",
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        ));
        store.add_expense(expense(
            user,
            "new",
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        ));
        store.add_expense(expense(
            user,
            "mid",
            NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
        ));

        let recent = store.list_recent(user, 50).await.unwrap();
        let descriptions: Vec<&str> = recent.iter().map(|e| e.description.as_str()).collect();
        assert_eq!(descriptions, vec!["new", "mid", "old"]);
    }

    #[tokio::test]
    async fn test_list_recent_respects_limit_and_user() {
        let store = MemoryStore::new();
        let user = Uuid::new_v4();
        let other = Uuid::new_v4();
        for day in 1..=5 {
            store.add_expense(expense(
                user,
                "mine",
                NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            ));
        }
        store.add_expense(expense(
            other,
            "theirs",
            NaiveDate::from_ymd_opt(2024, 1, 6).unwrap(),
        ));

        let recent = store.list_recent(user, 3).await.unwrap();
        assert_eq!(recent.len(), 3);
        assert!(recent.iter().all(|e| e.user_id == user));
    }

    #[test]
    fn test_reads_survive_a_poisoned_lock() {
        use std::sync::Arc;

        let store = Arc::new(MemoryStore::new());
        store.add_category(category("Food", None));

        // Panic while holding the write guard to poison the lock
        let poisoner = Arc::clone(&store);
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.inner.write().unwrap();
            panic!("poison");
        })
        .join();
        assert!(store.inner.is_poisoned());

        assert_eq!(store.expense_count(), 0);
        store.add_category(category("Transport", None));
        let inner = store.read();
        assert_eq!(inner.categories.len(), 2);
    }
}
