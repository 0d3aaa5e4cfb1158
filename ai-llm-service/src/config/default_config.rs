//! Default chat completion config loaded from environment variables.
//!
//! # Environment variables
//!
//! - `TENET_MODEL`            = model identifier (default [`DEFAULT_MODEL`])
//! - `OPENAI_API_KEY`         = provider credential (optional here, required per call)
//! - `OPENAI_BASE_URL`        = API base URL (default [`DEFAULT_ENDPOINT`])
//! - `TENET_LLM_TIMEOUT_SECS` = optional request timeout (u64)
//! - `LLM_MAX_TOKENS`         = optional max tokens (u32)
//!
//! The loader takes a lookup function instead of touching the process
//! environment directly, so callers can feed it a map in tests.

use crate::{
    config::llm_model_config::LlmModelConfig,
    error_handler::{AiLlmError, ConfigError, validate_http_endpoint},
};

/// Model used when `TENET_MODEL` is unset.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Public OpenAI API base.
pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com";

/// Fixed sampling temperature for readings.
pub const READING_TEMPERATURE: f32 = 0.8;

/// Constructs the chat completion config used for readings.
///
/// # Defaults
/// - `temperature = Some(0.8)`
/// - `timeout_secs = None` (no explicit timeout)
///
/// # Errors
/// - [`ConfigError::InvalidNumber`] for malformed numeric variables
/// - [`ConfigError::InvalidFormat`] if `OPENAI_BASE_URL` is not http(s)
pub fn config_openai_chat<F>(lookup: F) -> Result<LlmModelConfig, AiLlmError>
where
    F: Fn(&str) -> Option<String>,
{
    let non_empty = |k: &str| lookup(k).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

    let model = non_empty("TENET_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());
    let endpoint = non_empty("OPENAI_BASE_URL").unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
    validate_http_endpoint("OPENAI_BASE_URL", &endpoint)?;

    let timeout_secs = match non_empty("TENET_LLM_TIMEOUT_SECS") {
        Some(v) => Some(v.parse::<u64>().map_err(|_| ConfigError::InvalidNumber {
            var: "TENET_LLM_TIMEOUT_SECS",
            reason: "expected u64",
        })?),
        None => None,
    };
    let max_tokens = match non_empty("LLM_MAX_TOKENS") {
        Some(v) => Some(v.parse::<u32>().map_err(|_| ConfigError::InvalidNumber {
            var: "LLM_MAX_TOKENS",
            reason: "expected u32",
        })?),
        None => None,
    };

    Ok(LlmModelConfig {
        model,
        endpoint,
        api_key: non_empty("OPENAI_API_KEY"),
        max_tokens,
        temperature: Some(READING_TEMPERATURE),
        top_p: None,
        timeout_secs,
    })
}

/// Same as [`config_openai_chat`], reading the process environment.
pub fn config_openai_chat_from_env() -> Result<LlmModelConfig, AiLlmError> {
    config_openai_chat(|k| std::env::var(k).ok())
}
