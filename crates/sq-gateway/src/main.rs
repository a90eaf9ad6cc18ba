//! ShopQuery gateway — natural-language product search server.
//!
//! Turns shopper text into structured filters with a local language model,
//! hardens the price bounds against the literal query, and filters the
//! store catalog.

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use sq_gateway::config::GatewayConfig;
use sq_gateway::routes::build_router;
use sq_gateway::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "sq-gateway starting");

    let config_path = std::env::args().nth(1);
    let config = GatewayConfig::load(config_path.as_deref())?;
    tracing::info!(
        config_path = config_path.as_deref().unwrap_or("<defaults>"),
        ollama_host = %config.ollama.host,
        model = %config.ollama.model,
        catalog_url = %config.catalog.url,
        "config loaded"
    );

    let state = AppState::from_config(&config)?;
    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "listening");

    axum::serve(listener, app).await?;

    Ok(())
}
