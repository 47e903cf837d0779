//! blog-gateway server entry point.
//!
//! Starts the Axum HTTP server with REST and WebSocket endpoints.

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use blog_gateway::api;
use blog_gateway::app_state::AppState;
use blog_gateway::config::{GatewayConfig, LogFormat};
use blog_gateway::domain::ConnectionRegistry;
use blog_gateway::persistence::{BlogStore, PostgresBlogStore};
use blog_gateway::service::BlogService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = GatewayConfig::from_env()
        .map_err(|e| anyhow::anyhow!("invalid configuration: {e}"))?;

    // Initialize tracing
    init_tracing(config.log_format);
    tracing::info!(addr = %config.listen_addr, "starting blog-gateway");

    // Build persistence layer
    let store = if config.persistence_enabled {
        BlogStore::Postgres(
            PostgresBlogStore::connect(&config)
                .await
                .context("failed to connect to postgres")?,
        )
    } else {
        BlogStore::in_memory()
    };
    tracing::info!(backend = store.backend(), "blog store ready");

    // Build domain and service layers
    let registry = Arc::new(ConnectionRegistry::new());
    let blog_service = Arc::new(BlogService::new(Arc::new(store), Arc::clone(&registry)));

    // Build application state
    let app_state = AppState {
        blog_service,
        registry: Arc::clone(&registry),
        ws_send_buffer: config.ws_send_buffer,
        allowed_origins: config.cors_allowed_origins.into(),
    };

    let app = api::build_app(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(registry))
        .await
        .context("server error")?;

    tracing::info!("server stopped");
    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}

/// Resolves on Ctrl-C or SIGTERM, then closes every WebSocket session.
async fn shutdown_signal(registry: Arc<ConnectionRegistry>) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }

    let closed = registry.close_all().await;
    tracing::info!(sessions = closed, "shutdown signal received, sessions closed");
}
