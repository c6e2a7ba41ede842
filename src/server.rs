//! HTTP server initialization and runtime setup.
//!
//! Wires the store, services and click pipeline together, then runs the Axum
//! server until a shutdown signal arrives.

use crate::application::services::{LinkService, StatsService};
use crate::config::Config;
use crate::domain::click_worker::{ClickPipeline, ClickWorkerHandle};
use crate::domain::repositories::UrlRepository;
use crate::infrastructure::persistence::MemoryUrlRepository;
use crate::routes::app_router;
use crate::state::AppState;
use crate::utils::id_generator::IdGenerator;

use anyhow::Result;
use axum::ServiceExt;
use axum::extract::Request;
use std::net::SocketAddr;
use std::sync::Arc;

/// Builds the application state and spawns the click worker.
///
/// Must be called from within a Tokio runtime. The worker keeps running until
/// every clone of the returned state is dropped.
pub fn build_state(config: &Config) -> (AppState, ClickWorkerHandle) {
    let repository = Arc::new(MemoryUrlRepository::new());

    let generator = IdGenerator::new(config.id_length, config.id_max_attempts);
    let link_service = Arc::new(LinkService::new(repository.clone(), generator));
    let stats_service = Arc::new(StatsService::new(repository.clone()));

    let click_repository: Arc<dyn UrlRepository> = repository;
    let (click_sender, worker) = ClickPipeline::spawn(click_repository, config.click_queue_bound());
    tracing::info!("Click worker started");

    let state = AppState::new(
        link_service,
        stats_service,
        click_sender,
        config.public_base_url(),
    );

    (state, worker)
}

/// Runs the HTTP server with the given configuration.
///
/// On Ctrl-C or SIGTERM the server stops accepting connections, finishes
/// in-flight requests, and waits for the click worker to apply every queued
/// click before returning.
///
/// # Errors
///
/// Returns an error if:
/// - The listen address is invalid or cannot be bound
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let (state, worker) = build_state(&config);

    let app = app_router(state);

    let addr: SocketAddr = config.listen_addr().parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped, draining click queue");
    let applied = worker.join().await?;
    tracing::info!(applied, "Shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
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
                tracing::error!("Failed to listen for SIGTERM: {}", e);
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
