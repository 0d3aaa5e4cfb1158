use std::error::Error;

use ai_llm_service::telemetry;
use tracing::Level;
use tracing_subscriber::{
    Layer, filter::filter_fn, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Load environment variables from .env file when present.
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            return Err(e.into());
        }
    }

    let filter = telemetry::env_filter_with_level("info", Level::INFO);

    // The LLM client logs through its own layer; keep it out of the main one.
    let app_layer = fmt::layer()
        .compact()
        .with_target(false)
        .with_filter(filter_fn(|meta| !meta.target().starts_with(telemetry::TARGET_PREFIX)));

    tracing_subscriber::registry()
        .with(filter)
        .with(app_layer)
        .with(telemetry::layer())
        .init();

    api::start().await?;

    Ok(())
}
