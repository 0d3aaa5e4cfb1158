use reading_engine::{CardSection, Context};
use serde::Serialize;

/// Response payload for `POST /v1/reading` (flattened next to `ok`).
#[derive(Debug, Serialize)]
pub struct ReadingResponse {
    pub context: Context,
    pub intro: String,
    pub card_sections: Vec<CardSection>,
    pub synthesis: String,
    pub meta: ReadingMeta,
    pub safety: SafetyFlags,
}

#[derive(Debug, Serialize)]
pub struct ReadingMeta {
    /// Model identifier that generated the text.
    pub version: String,
    pub deck: String,
    pub spread: String,
    pub language: String,
    /// Drawn card names in spread order.
    pub cards: Vec<String>,
}

/// Editorial guarantees of every reading.
#[derive(Debug, Serialize)]
pub struct SafetyFlags {
    pub no_predictions: bool,
    pub no_certainty: bool,
    pub no_prescriptions: bool,
}

impl Default for SafetyFlags {
    fn default() -> Self {
        Self {
            no_predictions: true,
            no_certainty: true,
            no_prescriptions: true,
        }
    }
}
