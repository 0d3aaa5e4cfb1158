//! POST /v1/reading: three-card reading generated by the hosted model.

use std::sync::Arc;

use axum::{body::Bytes, extract::State, http::StatusCode, response::Response};
use reading_engine::SPREAD_THREE_CARDS;
use tracing::{debug, info, instrument, warn};

use crate::{
    core::{app_state::AppState, http::response_envelope::ApiResponse},
    error_handler::{AppError, AppResult},
    routes::reading::{
        reading_request::ReadingRequest,
        reading_response::{ReadingMeta, ReadingResponse, SafetyFlags},
    },
};

/// Minimum question length, in characters, after trimming.
pub const MIN_QUESTION_CHARS: usize = 5;

pub const DEFAULT_LANGUAGE: &str = "it";

const SHORT_QUESTION_MESSAGE: &str = "Inserisci una domanda più completa.";

/// Handler: POST /v1/reading
///
/// The body is parsed leniently: invalid JSON or a non-object body is
/// treated as `{}` and then fails question validation. Optional fields of
/// the wrong type fall back to their defaults.
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:8080/v1/reading \
///   -H 'authorization: Bearer $TENET_KEY' \
///   -H 'content-type: application/json' \
///   -d '{"question":"Dovrei lasciare il mio lavoro attuale?"}'
/// ```
#[instrument(name = "reading_route", skip_all)]
pub async fn reading_route(State(state): State<Arc<AppState>>, body: Bytes) -> AppResult<Response> {
    let req = ReadingRequest::from_body(&body).unwrap_or_else(|e| {
        debug!(error = %e, body_len = body.len(), "reading: unparsable body treated as empty");
        ReadingRequest::default()
    });

    let question = req.question.as_deref().unwrap_or_default().trim();
    if question.chars().count() < MIN_QUESTION_CHARS {
        warn!(question_chars = question.chars().count(), "reading: question too short");
        return Err(AppError::BadRequest(SHORT_QUESTION_MESSAGE.into()));
    }

    let spread = match req.spread.as_deref() {
        None => SPREAD_THREE_CARDS,
        Some(s) if s == SPREAD_THREE_CARDS => SPREAD_THREE_CARDS,
        Some(other) => {
            warn!(spread = %other, "reading: unsupported spread");
            return Err(AppError::BadRequest(format!("Unsupported spread: {other}")));
        }
    };

    let language = non_blank(req.language).unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());
    let deck = non_blank(req.deck).unwrap_or_else(|| state.config.default_deck.clone());

    let prepared = state
        .engine
        .prepare_from(question, &language, state.config.draw_source);
    let reading = state.engine.generate(prepared).await?;

    info!(
        context = %reading.context,
        sections = reading.sections.len(),
        %deck,
        %language,
        "reading: completed"
    );

    let body = ReadingResponse {
        context: reading.context,
        intro: reading.intro,
        card_sections: reading.sections,
        synthesis: reading.synthesis,
        meta: ReadingMeta {
            version: reading.model,
            deck,
            spread: spread.to_string(),
            language,
            cards: reading.cards.into_iter().map(|c| c.name).collect(),
        },
        safety: SafetyFlags::default(),
    };

    Ok(ApiResponse::success(body).into_response_with_status(StatusCode::OK))
}

fn non_blank(s: Option<String>) -> Option<String> {
    s.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}
