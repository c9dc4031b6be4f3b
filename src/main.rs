use std::sync::Arc;

use anyhow::Context;
use linkmap::{
    config::{AppConfig, StoreBackend},
    shortcode::ShortCodes,
    store::{MappingStore, MemoryStore, SqliteStore},
    AppState,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// ── Entry point ────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env; a missing file is fine, env vars may already be set
    dotenvy::dotenv().ok();

    // Initialise structured logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "linkmap=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration from environment
    let config = AppConfig::from_env()?;
    tracing::info!("Starting linkmap on {}", config.bind_addr());

    // Build the store once; every request shares this handle.
    let mut sqlite: Option<Arc<SqliteStore>> = None;
    let store: Arc<dyn MappingStore> = match config.store_backend {
        StoreBackend::Sqlite => {
            let db = Arc::new(
                SqliteStore::connect(&config.database_url, &config.mapping_table)
                    .await
                    .with_context(|| format!("failed to open store at {}", config.database_url))?,
            );
            tracing::info!("Using SQLite store at {}", config.database_url);
            sqlite = Some(db.clone());
            db
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; mappings are lost on exit");
            Arc::new(MemoryStore::new())
        }
    };

    let codes = ShortCodes::new(config.code_strategy, config.code_length, config.code_attempts);
    let state = Arc::new(AppState::new(store, codes));
    let app = linkmap::router(state);

    // ── Serve ──────────────────────────────────────────────────────────────
    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    tracing::info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(db) = sqlite {
        db.close().await;
    }
    tracing::info!("Shut down cleanly");

    Ok(())
}

/// Resolve on Ctrl+C, or SIGTERM on unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining connections");
}
