//! Reasoning port
//!
//! The opaque backend every agent thinks with: a prompt goes in, text comes
//! out. Each role gets its own injected port so roles can run on different
//! models.

use async_trait::async_trait;
use thiserror::Error;

/// Errors raised by a reasoning backend.
///
/// Every variant counts against the session's consecutive-failure budget.
#[derive(Error, Debug, Clone)]
pub enum ReasoningError {
    #[error("Reasoning backend unavailable: {0}")]
    Unavailable(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Timeout")]
    Timeout,

    #[error("Invalid backend response: {0}")]
    InvalidResponse(String),
}

#[async_trait]
pub trait ReasoningPort: Send + Sync {
    /// Send one prompt and return the complete response text.
    async fn think(&self, prompt: &str) -> Result<String, ReasoningError>;
}
