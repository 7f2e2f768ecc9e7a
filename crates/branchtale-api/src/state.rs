//! Shared application state.

use std::sync::Arc;

use branchtale_content::application::loader::GraphLoader;
use branchtale_content::domain::catalog::GameCatalog;
use branchtale_core::clock::Clock;
use branchtale_session::application::controller::SessionServices;
use branchtale_session::application::registry::SessionRegistry;

use crate::board::SurfaceBoard;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Collaborators handed to every session.
    pub services: SessionServices,
    /// The surfaces players see and react to.
    pub board: Arc<SurfaceBoard>,
    /// Running sessions, by surface.
    pub registry: Arc<SessionRegistry>,
}

impl AppState {
    /// Create new application state. The board serves as both the
    /// presentation channel and the input source of every session.
    #[must_use]
    pub fn new(catalog: GameCatalog, loader: Arc<dyn GraphLoader>, clock: Arc<dyn Clock>) -> Self {
        let board = Arc::new(SurfaceBoard::new());
        let services = SessionServices {
            catalog: Arc::new(catalog),
            loader,
            channel: board.clone(),
            input: board.clone(),
            clock,
        };
        Self {
            services,
            board,
            registry: Arc::new(SessionRegistry::new()),
        }
    }
}
