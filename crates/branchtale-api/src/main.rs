//! Branchtale API server entry point.

use std::sync::Arc;

use branchtale_api::config::Settings;
use branchtale_api::error::AppError;
use branchtale_api::routes;
use branchtale_api::state::AppState;
use branchtale_content::application::loader::{DirectoryGraphLoader, load_catalog};
use branchtale_core::clock::SystemClock;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting Branchtale API server");

    let settings = Settings::from_env()?;

    let loader = DirectoryGraphLoader::new(&settings.adventures_dir);
    let catalog = load_catalog(loader.root()).await?;
    tracing::info!(
        adventures = catalog.len(),
        dir = %loader.root().display(),
        "catalog loaded"
    );

    let app_state = AppState::new(catalog, Arc::new(loader), Arc::new(SystemClock));
    let registry = Arc::clone(&app_state.registry);

    // TODO: Replace CorsLayer::permissive() with restricted origins for production.
    let app = routes::router(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = settings.socket_addr()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    registry.stop_all().await;
    tracing::info!("Branchtale API server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "cannot listen for shutdown signal");
    }
}
