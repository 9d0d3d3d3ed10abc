//! AI-assisted expense categorization
//!
//! This module provides a backend-agnostic completion boundary plus the
//! pipeline that turns a new expense's description and amount into a
//! category suggestion:
//!
//! - `CompletionBackend` trait: text-in/text-out boundary to the LLM provider
//! - `CompletionClient` enum: concrete wrapper providing Clone + compile-time
//!   dispatch over the backends
//! - `prompt`: builds the bounded categorization prompt
//! - `parsing`: interprets the provider's unstructured reply
//! - `Categorizer`: orchestrates the pipeline and fails soft
//!
//! # Usage
//!
//! ```rust,ignore
//! // Construct once at process start
//! let categorizer = Categorizer::from_env()?;
//!
//! // Per expense-creation request
//! let result = categorizer.categorize(&store, user_id, "Uber ride", 12.50).await;
//! if let Some((category_id, confidence)) = result.accepted() {
//!     // apply the suggestion
//! }
//! ```
//!
//! # Configuration
//!
//! Environment variables:
//! - `AI_BACKEND`: Backend to use (anthropic, mock). Default: anthropic
//! - `ANTHROPIC_API_KEY`: Provider credential (required for anthropic backend)
//! - `ANTHROPIC_MODEL`, `ANTHROPIC_BASE_URL`, `ANTHROPIC_TIMEOUT_SECS`:
//!   Optional overrides

mod anthropic;
pub mod categorizer;
mod mock;
pub mod parsing;
pub mod prompt;
pub mod types;

pub use anthropic::{AnthropicBackend, DEFAULT_BASE_URL, DEFAULT_MODEL};
pub use categorizer::{resolve_category, Categorizer};
pub use mock::MockBackend;
pub use types::*;

use async_trait::async_trait;
use tracing::warn;

use crate::error::Result;

/// Trait defining the completion provider boundary
///
/// The provider is untrusted, potentially slow, and potentially malformed:
/// implementations return the raw reply text and leave all interpretation to
/// the caller. Backends must be Send + Sync for use across async tasks.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Send a prompt and return the provider's raw text reply
    async fn complete(&self, prompt: &str, options: CompletionOptions) -> Result<String>;

    /// Get the model name (for logging)
    fn model(&self) -> &str;

    /// Get the host URL (for logging)
    fn host(&self) -> &str;
}

/// Concrete completion client enum
///
/// Provides Clone and compile-time dispatch without Box<dyn> overhead.
#[derive(Clone)]
pub enum CompletionClient {
    /// Anthropic Messages API backend
    Anthropic(AnthropicBackend),
    /// Mock backend for testing
    Mock(MockBackend),
}

impl CompletionClient {
    /// Create a completion client from environment variables
    ///
    /// Checks `AI_BACKEND` to determine which backend to use:
    /// - `anthropic` (default): Uses ANTHROPIC_API_KEY and friends
    /// - `mock`: Creates a mock backend for testing
    ///
    /// Fails with a configuration error when the selected backend's
    /// credential is missing.
    pub fn from_env() -> Result<Self> {
        let backend = std::env::var("AI_BACKEND").unwrap_or_else(|_| "anthropic".to_string());

        match backend.to_lowercase().as_str() {
            "anthropic" => AnthropicBackend::from_env().map(CompletionClient::Anthropic),
            "mock" => Ok(CompletionClient::Mock(MockBackend::new())),
            _ => {
                warn!(backend = %backend, "Unknown AI_BACKEND, falling back to anthropic");
                AnthropicBackend::from_env().map(CompletionClient::Anthropic)
            }
        }
    }

    /// Create a mock backend for testing
    pub fn mock() -> Self {
        CompletionClient::Mock(MockBackend::new())
    }

    /// Create a new instance with a different model
    pub fn with_model(&self, model: &str) -> Self {
        match self {
            CompletionClient::Anthropic(b) => CompletionClient::Anthropic(b.with_model(model)),
            CompletionClient::Mock(b) => CompletionClient::Mock(b.clone()),
        }
    }
}

// Implement CompletionBackend for CompletionClient by delegating to the inner backend
#[async_trait]
impl CompletionBackend for CompletionClient {
    async fn complete(&self, prompt: &str, options: CompletionOptions) -> Result<String> {
        match self {
            CompletionClient::Anthropic(b) => b.complete(prompt, options).await,
            CompletionClient::Mock(b) => b.complete(prompt, options).await,
        }
    }

    fn model(&self) -> &str {
        match self {
            CompletionClient::Anthropic(b) => b.model(),
            CompletionClient::Mock(b) => b.model(),
        }
    }

    fn host(&self) -> &str {
        match self {
            CompletionClient::Anthropic(b) => b.host(),
            CompletionClient::Mock(b) => b.host(),
        }
    }
}
