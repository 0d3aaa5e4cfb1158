use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::Response};
use tracing::{debug, instrument};

use crate::{
    core::{app_state::AppState, http::response_envelope::ApiResponse},
    routes::health::health_response::HealthResponse,
};

pub const SERVICE_NAME: &str = "tenet-core";

/// Handler: GET /health
///
/// Reports configuration only; the upstream model is not probed.
///
/// # Example
/// ```bash
/// curl http://127.0.0.1:8080/health -H 'authorization: Bearer $TENET_KEY'
/// ```
#[instrument(name = "health_route", skip(state))]
pub async fn health_route(State(state): State<Arc<AppState>>) -> Response {
    let body = HealthResponse {
        service: SERVICE_NAME,
        version: env!("CARGO_PKG_VERSION"),
        model: state.engine.model().to_string(),
        mode: "live",
    };
    debug!(model = %body.model, "health: ok");

    ApiResponse::success(body).into_response_with_status(StatusCode::OK)
}
