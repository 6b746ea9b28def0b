use anyhow::{Context, Result};
use rent_estimator::api::{router, AppState};
use rent_estimator::config::Config;
use rent_estimator::params::load_parameters;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("🏠 Starting rent estimator API server...");

    // Load environment variables
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    // Parameters are loaded once and held as an immutable snapshot
    let parameters = load_parameters(&config.parameters_path)
        .with_context(|| format!("Failed to load parameters from {:?}", config.parameters_path))?;

    info!("✅ Parameter table ready (reference city: {})", config.reference_city);

    let state = AppState {
        parameters,
        reference_city: Arc::from(config.reference_city.as_str()),
    };

    let app = router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    info!("🚀 Server running on http://{}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
