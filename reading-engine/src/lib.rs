//! Reading pipeline: question → context → cards → prompt → completion → sections.
//!
//! Public entry point is [`ReadingEngine`]. Its synchronous half
//! ([`ReadingEngine::prepare`]) classifies the question, draws cards with a
//! caller-provided random source and builds the prompt pair; the async half
//! ([`ReadingEngine::generate`]) performs the single completion call and
//! parses the answer into intro, labeled sections and synthesis.

pub mod cards;
pub mod context;
pub mod draw;
pub mod engine;
mod error;
pub mod parser;
pub mod prompt;

pub use cards::{Card, KnowledgeBase};
pub use context::{Classification, Context, classify};
pub use draw::{DrawSource, draw_cards};
pub use engine::{PreparedReading, Reading, ReadingEngine, SPREAD_THREE_CARDS, THREE_CARDS};
pub use error::ReadingError;
pub use parser::{CardSection, LabeledTextParser, ParsedReading, ReadingParser};
