//! Service configuration, read once at startup.
//!
//! | Variable             | Default           |
//! |----------------------|-------------------|
//! | `TENET_API_KEYS`     | empty (rejects all) |
//! | `TENET_KB_PATH`      | `data/cards.json` |
//! | `TENET_DEFAULT_DECK` | `tarot_demo`      |
//! | `TENET_DRAW_SEED`    | unset (entropy)   |
//! | `PORT`               | `8080`            |
//!
//! Model and provider variables are resolved by
//! [`ai_llm_service::config::default_config::config_openai_chat`].

use std::path::PathBuf;

use ai_llm_service::{AiLlmError, LlmModelConfig, config::default_config::config_openai_chat};
use reading_engine::DrawSource;
use thiserror::Error;

use crate::core::auth::ApiKeyAllowList;

pub const DEFAULT_KB_PATH: &str = "data/cards.json";
pub const DEFAULT_DECK: &str = "tarot_demo";
pub const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid number in {var}: {reason}")]
    InvalidNumber {
        var: &'static str,
        reason: &'static str,
    },

    #[error(transparent)]
    Llm(#[from] AiLlmError),
}

/// Immutable configuration handed to the router state.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub api_keys: ApiKeyAllowList,
    pub kb_path: PathBuf,
    pub default_deck: String,
    pub llm: LlmModelConfig,
    pub draw_source: DrawSource,
    pub port: u16,
}

impl ServiceConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// Load through an arbitrary key lookup (a map in tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |k: &str| lookup(k).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let api_keys = ApiKeyAllowList::parse(&lookup("TENET_API_KEYS").unwrap_or_default());

        let port = match non_empty("PORT") {
            Some(p) => p.parse::<u16>().map_err(|_| ConfigError::InvalidNumber {
                var: "PORT",
                reason: "expected u16 (0..=65535)",
            })?,
            None => DEFAULT_PORT,
        };

        let draw_source = match non_empty("TENET_DRAW_SEED") {
            Some(s) => DrawSource::Seeded(s.parse::<u64>().map_err(|_| ConfigError::InvalidNumber {
                var: "TENET_DRAW_SEED",
                reason: "expected u64",
            })?),
            None => DrawSource::Entropy,
        };

        Ok(Self {
            api_keys,
            kb_path: non_empty("TENET_KB_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_KB_PATH)),
            default_deck: non_empty("TENET_DEFAULT_DECK").unwrap_or_else(|| DEFAULT_DECK.to_string()),
            llm: config_openai_chat(&lookup)?,
            draw_source,
            port,
        })
    }
}
