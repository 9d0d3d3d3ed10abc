//! Domain models for Outlay

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An expense category
///
/// A category is either a system default (no owning user, visible to every
/// user) or owned by a single user. Only owned, non-default categories may be
/// edited or deleted, and only by their owner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    /// Owning user. `None` marks a system default visible to all users.
    pub user_id: Option<Uuid>,
    pub name: String,
    pub description: Option<String>,
    /// Hex color for UI display (e.g., "#FF5733")
    pub color: String,
    /// Icon name for UI display
    pub icon: String,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
}

impl Category {
    /// Whether `user_id` may modify or delete this category.
    ///
    /// Defaults are immutable via category management; owned categories are
    /// editable only by their owner.
    pub fn is_editable_by(&self, user_id: Uuid) -> bool {
        !self.is_default && self.user_id == Some(user_id)
    }
}

/// Payment method used for an expense
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Card,
    Cash,
    BankTransfer,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Card => "card",
            Self::Cash => "cash",
            Self::BankTransfer => "bank_transfer",
        }
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "card" => Ok(Self::Card),
            "cash" => Ok(Self::Cash),
            "bank_transfer" | "transfer" => Ok(Self::BankTransfer),
            _ => Err(format!("Unknown payment method: {}", s)),
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A recorded expense
///
/// The AI fields (`ai_suggested_category_id`, `ai_confidence_score`) are set
/// at most once, at creation time, and never recomputed afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Positive amount, rendered to two decimals
    pub amount: f64,
    /// Free-text description, 1-255 characters
    pub description: String,
    pub category_id: Option<Uuid>,
    pub expense_date: NaiveDate,
    pub payment_method: PaymentMethod,
    pub notes: Option<String>,
    /// Category the AI suggested at creation, if any
    pub ai_suggested_category_id: Option<Uuid>,
    /// Provider-reported confidence in [0.0, 1.0] for the AI suggestion
    pub ai_confidence_score: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating an expense
#[derive(Debug, Clone, Deserialize)]
pub struct NewExpense {
    pub amount: f64,
    pub description: String,
    /// Caller-chosen category. When absent the AI suggester may fill it in.
    pub category_id: Option<Uuid>,
    pub expense_date: NaiveDate,
    pub payment_method: PaymentMethod,
    pub notes: Option<String>,
}

/// Maximum length of an expense description
pub const MAX_DESCRIPTION_LEN: usize = 255;
