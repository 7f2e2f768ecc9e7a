//! Loading catalogs and story graphs from disk.
//!
//! A content directory holds `available_games.json` plus one
//! `<game_id>.json` story file per catalogued adventure. Graphs are parsed
//! once and shared as `Arc<GameGraph>` between every session of that game.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use branchtale_core::error::DomainError;
use tokio::sync::RwLock;
use tracing::{debug, error};

use crate::domain::catalog::{GameCatalog, GameInfo};
use crate::domain::graph::GameGraph;

/// File name of the catalog inside a content directory.
pub const CATALOG_FILE: &str = "available_games.json";

/// Capability to obtain the story graph for a resolved game id.
#[async_trait]
pub trait GraphLoader: Send + Sync {
    /// Loads the graph for `game_id`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::GameNotFound` if no story exists for the id.
    /// Other variants signal broken content or I/O failures.
    async fn load(&self, game_id: &str) -> Result<Arc<GameGraph>, DomainError>;
}

/// Reads the catalog from `<dir>/available_games.json`.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if the file cannot be read or
/// parsed, and `DomainError::Validation` if it declares duplicate ids.
pub async fn load_catalog(dir: &Path) -> Result<GameCatalog, DomainError> {
    let path = dir.join(CATALOG_FILE);
    let source = tokio::fs::read_to_string(&path).await.map_err(|e| {
        DomainError::Infrastructure(format!("cannot read {}: {e}", path.display()))
    })?;
    let games: Vec<GameInfo> = serde_json::from_str(&source)
        .map_err(|e| DomainError::Infrastructure(format!("catalog parse failed: {e}")))?;
    GameCatalog::new(games)
}

/// Loads story files from a content directory, caching parsed graphs.
#[derive(Debug)]
pub struct DirectoryGraphLoader {
    root: PathBuf,
    cache: RwLock<HashMap<String, Arc<GameGraph>>>,
}

impl DirectoryGraphLoader {
    /// Creates a loader rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// The content directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn story_path(&self, game_id: &str) -> Option<PathBuf> {
        let bare = !game_id.is_empty()
            && !game_id.contains(['/', '\\'])
            && game_id != "."
            && game_id != "..";
        bare.then(|| self.root.join(format!("{game_id}.json")))
    }
}

#[async_trait]
impl GraphLoader for DirectoryGraphLoader {
    async fn load(&self, game_id: &str) -> Result<Arc<GameGraph>, DomainError> {
        if let Some(graph) = self.cache.read().await.get(game_id) {
            return Ok(Arc::clone(graph));
        }

        let path = self
            .story_path(game_id)
            .ok_or_else(|| DomainError::GameNotFound(game_id.to_owned()))?;

        let source = match tokio::fs::read_to_string(&path).await {
            Ok(source) => source,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                error!(game_id, path = %path.display(), "story file not found");
                return Err(DomainError::GameNotFound(game_id.to_owned()));
            }
            Err(e) => {
                return Err(DomainError::Infrastructure(format!(
                    "cannot read {}: {e}",
                    path.display()
                )));
            }
        };

        let graph = Arc::new(GameGraph::from_json(&source)?);
        debug!(game_id, rooms = graph.other_rooms.len() + 1, "story graph loaded");

        let mut cache = self.cache.write().await;
        let shared = cache
            .entry(game_id.to_owned())
            .or_insert_with(|| Arc::clone(&graph));
        Ok(Arc::clone(shared))
    }
}
