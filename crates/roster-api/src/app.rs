//! Application builder: wires store, services and router into a served app.

use std::sync::Arc;

use axum::Router;

use roster_core::config::{AppConfig, DatabaseBackend};
use roster_core::error::AppError;
use roster_database::{DatabasePool, MemoryUserStore, UserRepository, UserStore};
use roster_service::mail::build_transport;

use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    build_router(state)
}

/// Opens the configured user store. The pool is returned so it can be closed
/// on shutdown.
pub async fn open_store(
    config: &AppConfig,
) -> Result<(Arc<dyn UserStore>, Option<DatabasePool>), AppError> {
    match config.database.backend {
        DatabaseBackend::Postgres => {
            let pool = DatabasePool::connect(&config.database).await?;
            let store: Arc<dyn UserStore> = Arc::new(UserRepository::new(pool.pool().clone()));
            Ok((store, Some(pool)))
        }
        DatabaseBackend::Memory => {
            tracing::warn!("Using the in-memory user store; data is lost on exit");
            Ok((Arc::new(MemoryUserStore::new()), None))
        }
    }
}

/// Runs the Roster server with the given configuration.
pub async fn run_server(config: AppConfig) -> Result<(), AppError> {
    tracing::info!(environment = ?config.environment, "Starting Roster server...");

    let (store, pool) = open_store(&config).await?;
    let transport = build_transport(&config.mail)?;
    tracing::info!(transport = transport.name(), "Mail transport ready");

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::new(config, store, transport)?;
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("Roster server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    if let Some(pool) = pool {
        pool.close().await;
    }
    tracing::info!("Roster server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
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

    tracing::info!("Shutdown signal received");
}
