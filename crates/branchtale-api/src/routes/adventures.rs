//! Routes for the "adventure" and "adventures" commands.

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Json, Router, routing::get};
use branchtale_core::command::Command;
use branchtale_core::presentation::{SurfaceHandle, UserId};
use branchtale_session::application::controller::{self, Started};
use branchtale_session::domain::commands::StartAdventure;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::board::SurfaceView;
use crate::error::ApiError;
use crate::state::AppState;

/// One catalog entry, with its 1-based index.
#[derive(Debug, Serialize)]
pub struct AdventureSummary {
    /// Position in the listing; usable as a selector.
    pub index: usize,
    /// Game id; usable as a selector.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Description.
    pub description: String,
    /// Seconds allowed per choice.
    pub timeout_seconds: u64,
}

/// Request body for POST /.
#[derive(Debug, Deserialize)]
pub struct StartRequest {
    /// The player starting the adventure.
    pub user_id: u64,
    /// Game id or 1-based index. Absent or blank lists the catalog.
    #[serde(default)]
    pub selector: Option<String>,
}

/// Response body for POST /.
#[derive(Debug, Serialize)]
pub struct StartResponse {
    /// The surface the response was rendered to.
    pub surface: SurfaceHandle,
    /// Whether a session is now running on the surface.
    pub session: bool,
    /// The surface as the player sees it.
    pub view: Option<SurfaceView>,
}

/// Cleans a raw command argument: surrounding whitespace and backticks are
/// dropped and a blank argument counts as absent.
#[must_use]
pub fn clean_selector(raw: Option<&str>) -> Option<String> {
    let cleaned = raw?.trim().trim_matches('`').trim();
    (!cleaned.is_empty()).then(|| cleaned.to_owned())
}

/// GET /
async fn list_adventures(State(state): State<AppState>) -> Json<Vec<AdventureSummary>> {
    let summaries = state
        .services
        .catalog
        .list_all()
        .iter()
        .enumerate()
        .map(|(position, game)| AdventureSummary {
            index: position + 1,
            id: game.id.clone(),
            name: game.name.clone(),
            description: game.description.clone(),
            timeout_seconds: game.timeout_seconds,
        })
        .collect();
    Json(summaries)
}

/// POST /
#[instrument(skip(state, request), fields(user = request.user_id))]
async fn start_adventure(
    State(state): State<AppState>,
    Json(request): Json<StartRequest>,
) -> Result<(StatusCode, Json<StartResponse>), ApiError> {
    let command = StartAdventure {
        correlation_id: Uuid::new_v4(),
        user: UserId(request.user_id),
        selector: clean_selector(request.selector.as_deref()),
    };

    info!(
        correlation_id = %command.correlation_id,
        command_type = command.command_type(),
        selector = ?command.selector,
        "handling adventure command"
    );

    let (status, surface, session) = match controller::start(&state.services, &command).await? {
        Started::Listing(surface) => (StatusCode::OK, surface, false),
        Started::Session(handle) => {
            let surface = handle.surface();
            state.registry.insert(handle);
            (StatusCode::CREATED, surface, true)
        }
    };

    Ok((
        status,
        Json(StartResponse {
            surface,
            session,
            view: state.board.snapshot(surface),
        }),
    ))
}

/// Returns the router for the adventure commands.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_adventures).post(start_adventure))
}
