//! The one seam between the reading pipeline and the hosted model.

use async_trait::async_trait;

use crate::error_handler::AiLlmError;

/// A single-shot text completion backend.
///
/// Implementations receive a `(system, user)` prompt pair and return the
/// assistant text verbatim. There is no streaming and no retry: one call,
/// one answer or one error.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Sends the prompt pair and waits for the generated text.
    ///
    /// # Errors
    /// Returns [`AiLlmError`] on missing credentials, transport failures,
    /// non-2xx responses or undecodable payloads.
    async fn complete(&self, system: &str, user: &str) -> Result<String, AiLlmError>;

    /// Model identifier used for every call.
    fn model(&self) -> &str;
}
