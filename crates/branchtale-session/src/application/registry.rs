//! Live sessions of the process, keyed by surface.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use branchtale_core::presentation::SurfaceHandle;
use tracing::info;

use super::controller::SessionHandle;

/// Tracks running sessions so they can be stopped by surface or all at once.
///
/// Sessions that ended on their own are pruned whenever the registry is
/// touched.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: Mutex<HashMap<SurfaceHandle, SessionHandle>>,
}

impl SessionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a session under its surface. A session already registered
    /// for that surface is asked to stop.
    pub fn insert(&self, handle: SessionHandle) {
        let mut sessions = self.lock();
        if let Some(mut previous) = sessions.insert(handle.surface(), handle) {
            previous.request_stop();
        }
    }

    /// Whether a live session renders to `surface`.
    #[must_use]
    pub fn contains(&self, surface: SurfaceHandle) -> bool {
        self.lock().contains_key(&surface)
    }

    /// Number of live sessions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether no session is live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stops the session on `surface` and waits for it. Returns `false` if
    /// no live session renders there.
    pub async fn stop(&self, surface: SurfaceHandle) -> bool {
        let handle = self.lock().remove(&surface);
        match handle {
            Some(handle) => {
                handle.stop().await;
                true
            }
            None => false,
        }
    }

    /// Stops every live session and waits for all of them.
    pub async fn stop_all(&self) {
        let handles: Vec<SessionHandle> = self.lock().drain().map(|(_, handle)| handle).collect();
        info!(sessions = handles.len(), "stopping all sessions");
        for handle in handles {
            handle.stop().await;
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<SurfaceHandle, SessionHandle>> {
        let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        sessions.retain(|_, handle| !handle.is_finished());
        sessions
    }
}
