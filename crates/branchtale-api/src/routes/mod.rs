//! HTTP routes.

pub mod adventures;
pub mod health;
pub mod surfaces;

use axum::Router;

use crate::state::AppState;

/// Builds the application router without middleware layers.
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(health::router())
        .nest("/api/v1/adventures", adventures::router())
        .nest("/api/v1/surfaces", surfaces::router())
        .with_state(state)
}
