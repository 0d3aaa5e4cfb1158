use serde::Serialize;

/// Response payload for `GET /health` (flattened next to `ok`).
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub service: &'static str,
    pub version: &'static str,
    /// Model identifier readings are generated with.
    pub model: String,
    pub mode: &'static str,
}
