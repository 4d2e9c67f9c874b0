//! planfit — survey-driven workout and meal plan generator.

use std::sync::Arc;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use planfit_providers::{GeminiClient, ProviderConfig, TextGenerator};
use planfit_web::config::ServerConfig;
use planfit_web::server::PlanServer;
use planfit_web::session::{MemorySessionStore, SessionStore};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig::from_env()?;

    let provider_config =
        ProviderConfig::gemini(config.api_key.clone()).with_model(config.model.clone());
    let generator: Arc<dyn TextGenerator> = Arc::new(GeminiClient::new(provider_config)?);
    let store: Arc<dyn SessionStore> = Arc::new(MemorySessionStore::new(config.session_ttl));

    let server = PlanServer::new(config, store, generator);
    server.start().await?;

    Ok(())
}
