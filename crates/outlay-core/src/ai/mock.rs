//! Mock backend for testing
//!
//! Provides scripted completion replies without a running provider. Useful
//! for unit tests and development.

use crate::error::{Error, Result};

use super::types::CompletionOptions;
use super::CompletionBackend;

/// Mock completion backend
///
/// With no scripted reply it picks the first category listed in the prompt
/// and answers with high confidence. Tests that need exact payloads use
/// [`MockBackend::with_reply`]; failure paths use [`MockBackend::failing`].
#[derive(Clone, Default)]
pub struct MockBackend {
    reply: Option<String>,
    fail: bool,
}

impl MockBackend {
    /// Create a mock that answers with the first listed category
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock that always returns `reply` verbatim
    pub fn with_reply(reply: impl Into<String>) -> Self {
        Self {
            reply: Some(reply.into()),
            fail: false,
        }
    }

    /// Create a mock that fails every request like an unreachable provider
    pub fn failing() -> Self {
        Self {
            reply: None,
            fail: true,
        }
    }
}

/// Pull the first `- Name: ...` line out of the prompt's category list
fn first_listed_category(prompt: &str) -> Option<&str> {
    let after = prompt.split_once("Available categories:")?.1;
    for line in after.lines() {
        if let Some(rest) = line.trim().strip_prefix("- ") {
            let name = rest.split(':').next().unwrap_or(rest).trim();
            if !name.is_empty() {
                return Some(name);
            }
        }
    }
    None
}

#[async_trait::async_trait]
impl CompletionBackend for MockBackend {
    async fn complete(&self, prompt: &str, _options: CompletionOptions) -> Result<String> {
        if self.fail {
            return Err(Error::Provider("mock provider failure".into()));
        }
        if let Some(reply) = &self.reply {
            return Ok(reply.clone());
        }
        let category = first_listed_category(prompt).unwrap_or("Other");
        Ok(format!(
            r#"{{"category": "{}", "confidence": 0.9}}"#,
            category
        ))
    }

    fn model(&self) -> &str {
        "mock"
    }

    fn host(&self) -> &str {
        "mock://localhost"
    }
}
