//! Typed error for the reading-engine crate.

use ai_llm_service::AiLlmError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReadingError {
    /// The completion call failed (credentials, transport, upstream status).
    #[error(transparent)]
    Llm(#[from] AiLlmError),
}
