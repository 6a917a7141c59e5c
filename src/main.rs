mod api_doc;
mod auth;
mod config;
mod content;
mod defaults;
mod error;
mod handlers;
mod models;
mod response;
mod router;
mod routes;
mod state;
mod store;

use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;
use defaults::DefaultContent;
use state::AppState;
use store::{ContentStore, KvBackend};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "docs_kv_api=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("docs-kv-api starting");

    let config = Config::from_env()?;
    config.log_startup();

    let backend = KvBackend::from_config(&config).await?;
    backend
        .health_check()
        .await
        .context("Store health check failed")?;
    tracing::info!("Store health check passed");

    let addr = format!("{}:{}", config.service_host, config.service_port);
    let state = AppState {
        store: ContentStore::new(backend, DefaultContent::seeded(Utc::now())),
        config: Arc::new(config),
    };
    let app = router::build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("docs-kv-api stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
