//! Routes for rendered surfaces: viewing, reacting, deleting, stopping.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Json, Router, routing::get, routing::post};
use branchtale_core::command::Command;
use branchtale_core::presentation::{SurfaceHandle, UserId};
use branchtale_session::domain::commands::StopAdventure;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::board::SurfaceView;
use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /{handle}/reactions.
#[derive(Debug, Deserialize)]
pub struct ReactionRequest {
    /// The reacting user.
    pub user_id: u64,
    /// The selected glyph.
    pub glyph: String,
}

/// Response body for POST /{handle}/reactions.
#[derive(Debug, Serialize)]
pub struct ReactionResponse {
    /// How many sessions received the reaction.
    pub delivered: usize,
}

/// Response body for POST /{handle}/stop.
#[derive(Debug, Serialize)]
pub struct StopResponse {
    /// Whether a running session was stopped.
    pub stopped: bool,
}

/// GET /{handle}
async fn get_surface(
    State(state): State<AppState>,
    Path(handle): Path<Uuid>,
) -> Result<Json<SurfaceView>, ApiError> {
    let handle = SurfaceHandle(handle);
    state
        .board
        .snapshot(handle)
        .map(Json)
        .ok_or(ApiError::SurfaceNotFound(handle))
}

/// POST /{handle}/reactions
#[instrument(skip(state, request), fields(user = request.user_id, glyph = %request.glyph))]
async fn react(
    State(state): State<AppState>,
    Path(handle): Path<Uuid>,
    Json(request): Json<ReactionRequest>,
) -> Result<(StatusCode, Json<ReactionResponse>), ApiError> {
    let handle = SurfaceHandle(handle);
    let delivered = state
        .board
        .react(handle, UserId(request.user_id), &request.glyph)
        .ok_or(ApiError::SurfaceNotFound(handle))?;

    info!(surface = %handle, delivered, "reaction posted");
    Ok((StatusCode::ACCEPTED, Json(ReactionResponse { delivered })))
}

/// DELETE /{handle}
#[instrument(skip(state))]
async fn remove_surface(
    State(state): State<AppState>,
    Path(handle): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let handle = SurfaceHandle(handle);
    if !state.board.remove(handle) {
        return Err(ApiError::SurfaceNotFound(handle));
    }
    info!(surface = %handle, "surface removed");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /{handle}/stop
#[instrument(skip(state))]
async fn stop_session(
    State(state): State<AppState>,
    Path(handle): Path<Uuid>,
) -> Json<StopResponse> {
    let command = StopAdventure {
        correlation_id: Uuid::new_v4(),
        surface: SurfaceHandle(handle),
    };
    info!(
        correlation_id = %command.correlation_id,
        command_type = command.command_type(),
        "handling stop_adventure command"
    );

    let stopped = state.registry.stop(command.surface).await;
    Json(StopResponse { stopped })
}

/// Returns the router for surfaces.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{handle}", get(get_surface).delete(remove_surface))
        .route("/{handle}/reactions", post(react))
        .route("/{handle}/stop", post(stop_session))
}
