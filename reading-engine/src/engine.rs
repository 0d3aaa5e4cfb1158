//! The reading pipeline.

use std::sync::Arc;

use ai_llm_service::CompletionClient;
use rand::Rng;
use tracing::{debug, info, instrument};

use crate::{
    cards::{Card, KnowledgeBase},
    context::{Context, classify},
    draw::{DrawSource, draw_cards},
    error::ReadingError,
    parser::{CardSection, ReadingParser},
    prompt::{build_system_prompt, build_user_prompt},
};

/// The only spread currently offered.
pub const SPREAD_THREE_CARDS: &str = "three_cards_v1";

/// Cards drawn for [`SPREAD_THREE_CARDS`].
pub const THREE_CARDS: usize = 3;

/// Everything decided before the completion call.
#[derive(Debug, Clone)]
pub struct PreparedReading {
    pub context: Context,
    pub cards: Vec<Card>,
    pub system_prompt: String,
    pub user_prompt: String,
}

/// Final structured reading.
#[derive(Debug, Clone)]
pub struct Reading {
    pub context: Context,
    pub cards: Vec<Card>,
    pub intro: String,
    pub sections: Vec<CardSection>,
    pub synthesis: String,
    /// Model identifier that produced the text.
    pub model: String,
}

/// Knowledge base + completion client + parser, shared read-only by requests.
#[derive(Clone)]
pub struct ReadingEngine {
    deck: Arc<KnowledgeBase>,
    llm: Arc<dyn CompletionClient>,
    parser: Arc<dyn ReadingParser>,
}

impl ReadingEngine {
    pub fn new(
        deck: Arc<KnowledgeBase>,
        llm: Arc<dyn CompletionClient>,
        parser: Arc<dyn ReadingParser>,
    ) -> Self {
        Self { deck, llm, parser }
    }

    pub fn deck(&self) -> &KnowledgeBase {
        &self.deck
    }

    pub fn model(&self) -> &str {
        self.llm.model()
    }

    /// Classifies the question, draws three cards with `rng` and builds the
    /// prompt pair. Pure apart from the random source.
    pub fn prepare<R>(&self, question: &str, language: &str, rng: &mut R) -> PreparedReading
    where
        R: Rng + ?Sized,
    {
        let cards = draw_cards(self.deck.cards(), THREE_CARDS, rng);
        self.assemble(question, language, cards)
    }

    /// Like [`ReadingEngine::prepare`], drawing from a configured [`DrawSource`].
    pub fn prepare_from(&self, question: &str, language: &str, source: DrawSource) -> PreparedReading {
        let cards = source.draw(self.deck.cards(), THREE_CARDS);
        self.assemble(question, language, cards)
    }

    /// Classifies the question and builds the prompt pair around drawn cards.
    fn assemble(&self, question: &str, language: &str, cards: Vec<Card>) -> PreparedReading {
        let context = classify(question).context;
        debug!(
            %context,
            cards = ?cards.iter().map(|c| c.name.as_str()).collect::<Vec<_>>(),
            "reading prepared"
        );

        PreparedReading {
            context,
            system_prompt: build_system_prompt(context),
            user_prompt: build_user_prompt(question, context, &cards, language),
            cards,
        }
    }

    /// Sends the prepared prompts to the model and parses the answer.
    ///
    /// # Errors
    /// Propagates the completion failure as [`ReadingError::Llm`].
    #[instrument(name = "reading_generate", skip_all, fields(context = %prepared.context, model = %self.llm.model()))]
    pub async fn generate(&self, prepared: PreparedReading) -> Result<Reading, ReadingError> {
        let raw = self
            .llm
            .complete(&prepared.system_prompt, &prepared.user_prompt)
            .await?;

        let parsed = self.parser.parse(&raw);

        info!(
            sections = parsed.sections.len(),
            has_synthesis = !parsed.synthesis.is_empty(),
            raw_len = raw.len(),
            "reading generated"
        );

        Ok(Reading {
            context: prepared.context,
            cards: prepared.cards,
            intro: parsed.intro,
            sections: parsed.sections,
            synthesis: parsed.synthesis,
            model: self.llm.model().to_string(),
        })
    }
}
