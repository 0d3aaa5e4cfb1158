use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::warn;

use crate::{
    core::{app_state::AppState, auth::extract_bearer},
    error_handler::AppError,
};

/// Rejects requests whose bearer token is not in the allow-list.
pub async fn require_api_key(
    State(state): State<Arc<AppState>>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(extract_bearer);

    let authorized = token.is_some_and(|t| state.config.api_keys.is_allowed(t));
    if authorized {
        return next.run(req).await;
    }

    warn!(
        method = %req.method(),
        path = %req.uri().path(),
        has_token = token.is_some(),
        "rejected request: invalid TENET API key"
    );
    AppError::Unauthorized.into_response()
}
