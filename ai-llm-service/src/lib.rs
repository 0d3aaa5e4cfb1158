//! Hosted LLM completion client shared by the TENET services.
//!
//! The crate exposes a single seam, [`CompletionClient`], plus one
//! implementation talking to an OpenAI-compatible chat completion API
//! ([`services::open_ai_service::OpenAiService`]). Construct the client once,
//! wrap it in `Arc` and hand clones to dependents.

pub mod completion;
pub mod config;
pub mod error_handler;
pub mod services;
pub mod telemetry;

pub use completion::CompletionClient;
pub use config::llm_model_config::LlmModelConfig;
pub use error_handler::{AiLlmError, ConfigError, HttpError, ProviderError};
pub use services::open_ai_service::OpenAiService;
