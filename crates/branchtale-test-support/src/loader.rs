//! Test graph loader serving graphs from memory.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use branchtale_content::application::loader::GraphLoader;
use branchtale_content::domain::graph::GameGraph;
use branchtale_core::error::DomainError;

/// A loader backed by an in-memory map. Games can be withdrawn mid-test to
/// simulate a story disappearing between a session and its replay.
#[derive(Debug, Default)]
pub struct StaticGraphLoader {
    graphs: Mutex<HashMap<String, Arc<GameGraph>>>,
    loads: AtomicUsize,
}

impl StaticGraphLoader {
    /// Creates an empty loader.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a game.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn with_game(self, game_id: &str, graph: GameGraph) -> Self {
        self.graphs
            .lock()
            .unwrap()
            .insert(game_id.to_owned(), Arc::new(graph));
        self
    }

    /// Withdraws a game; later loads report it as not found.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn withdraw(&self, game_id: &str) {
        self.graphs.lock().unwrap().remove(game_id);
    }

    /// Number of `load` calls so far.
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GraphLoader for StaticGraphLoader {
    async fn load(&self, game_id: &str) -> Result<Arc<GameGraph>, DomainError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        self.graphs
            .lock()
            .unwrap()
            .get(game_id)
            .cloned()
            .ok_or_else(|| DomainError::GameNotFound(game_id.to_owned()))
    }
}
