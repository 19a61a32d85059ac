//! Completion service boundary: the request model, prompt rendering, and
//! the Gemini HTTP client.

pub mod error;
pub mod gemini;
pub mod prompt;

pub use {
    error::{Error, Result},
    gemini::{GeminiClient, GeminiConfig},
    prompt::{CompletionRequest, ConversationTurn, Role, render_prompt},
};

use async_trait::async_trait;

/// Stateless text-completion client.
///
/// One call per invocation, no automatic retry: a failed call surfaces as
/// an [`Error`] and the caller abandons the unit of work.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Generate the model's answer for a fully built request.
    async fn complete(&self, request: &CompletionRequest) -> Result<String>;
}
