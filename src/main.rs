//! Network Analysis Service — Binary Entrypoint
//! Boots the Axum HTTP server over in-memory stores, wiring routes, shared
//! state, and the Prometheus exporter.

use std::sync::Arc;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use misinfo_network_analyzer::api::{self, AppState};
use misinfo_network_analyzer::config::EngineConfig;
use misinfo_network_analyzer::metrics::Metrics;
use misinfo_network_analyzer::orchestrator::NetworkAnalyzer;
use misinfo_network_analyzer::store::{
    CachedAuthorStore, MemoryAuthorStore, MemoryConnectionStore,
};
use misinfo_network_analyzer::verify::NewsClient;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("misinfo_network_analyzer=info,warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op elsewhere.
    let _ = dotenvy::dotenv();
    init_tracing();

    let config = EngineConfig::from_env();
    let news = Arc::new(NewsClient::from_env(config.timeouts.news_ms));

    let authors = Arc::new(CachedAuthorStore::new(MemoryAuthorStore::new()));
    let connections = Arc::new(MemoryConnectionStore::new());
    let analyzer = Arc::new(NetworkAnalyzer::new(
        authors.clone(),
        connections.clone(),
        config,
    ));

    let metrics = Metrics::init();
    let state = AppState {
        analyzer,
        authors,
        connections,
        news,
    };
    let app = api::router(state).merge(metrics.router());

    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8003".to_string());
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "network analyzer listening");
    axum::serve(listener, app).await?;
    Ok(())
}
