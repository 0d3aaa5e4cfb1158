use std::sync::Arc;

use ai_llm_service::OpenAiService;
use reading_engine::{KnowledgeBase, LabeledTextParser, ReadingEngine};
use tracing::{info, warn};

use crate::core::config::{ConfigError, ServiceConfig};

/// Shared state for all HTTP handlers. Built once at startup, never mutated.
#[derive(Clone)]
pub struct AppState {
    /// Configuration snapshot taken at startup.
    pub config: ServiceConfig,
    /// Knowledge base + completion client + parser.
    pub engine: ReadingEngine,
}

impl AppState {
    pub fn new(config: ServiceConfig, engine: ReadingEngine) -> Self {
        Self { config, engine }
    }

    /// Loads the knowledge base and builds the hosted completion client.
    pub fn from_config(config: ServiceConfig) -> Result<Self, ConfigError> {
        if config.api_keys.is_empty() {
            warn!("TENET_API_KEYS is empty: every request will be rejected");
        }

        let deck = Arc::new(KnowledgeBase::load_or_fallback(&config.kb_path));
        let llm = Arc::new(OpenAiService::new(config.llm.clone())?);
        let engine = ReadingEngine::new(deck, llm, Arc::new(LabeledTextParser));

        info!(
            api_keys = config.api_keys.len(),
            cards = engine.deck().len(),
            model = %engine.model(),
            default_deck = %config.default_deck,
            draw_source = ?config.draw_source,
            "application state ready"
        );

        Ok(Self::new(config, engine))
    }
}
