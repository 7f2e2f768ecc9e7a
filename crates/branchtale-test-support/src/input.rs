//! Test input source that lets a test play the platform's event feed.

use std::collections::HashMap;
use std::sync::Mutex;

use branchtale_core::input::{InputEvent, InputSource, Subscription, SubscriptionId};
use branchtale_core::presentation::{SurfaceHandle, UserId};
use tokio::sync::mpsc;
use uuid::Uuid;

type Subscriber = (SurfaceHandle, mpsc::UnboundedSender<InputEvent>);

/// An input source driven by hand from tests.
#[derive(Debug, Default)]
pub struct ManualInputSource {
    subscribers: Mutex<HashMap<SubscriptionId, Subscriber>>,
    revoked: Mutex<Vec<SubscriptionId>>,
}

impl ManualInputSource {
    /// Creates a source with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Delivers `event` to every subscriber of its surface and returns how
    /// many received it.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn emit(&self, event: &InputEvent) -> usize {
        let subscribers = self.subscribers.lock().unwrap();
        subscribers
            .values()
            .filter(|(surface, _)| *surface == event.surface())
            .filter(|(_, sender)| sender.send(event.clone()).is_ok())
            .count()
    }

    /// Shorthand for emitting a selection.
    pub fn select(&self, surface: SurfaceHandle, user: UserId, token: &str) -> usize {
        self.emit(&InputEvent::Selection {
            surface,
            user,
            token: token.to_owned(),
        })
    }

    /// Shorthand for emitting a surface removal.
    pub fn remove_surface(&self, surface: SurfaceHandle) -> usize {
        self.emit(&InputEvent::SurfaceRemoved { surface })
    }

    /// Number of live subscriptions.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn active_count(&self) -> usize {
        self.subscribers.lock().unwrap().len()
    }

    /// Number of subscriptions revoked so far (each counted once).
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn revoked_count(&self) -> usize {
        self.revoked.lock().unwrap().len()
    }
}

impl InputSource for ManualInputSource {
    fn subscribe(&self, surface: SurfaceHandle) -> Subscription {
        let (sender, receiver) = mpsc::unbounded_channel();
        let id = SubscriptionId(Uuid::new_v4());
        self.subscribers
            .lock()
            .unwrap()
            .insert(id, (surface, sender));
        Subscription::new(id, receiver)
    }

    fn revoke(&self, id: SubscriptionId) {
        if self.subscribers.lock().unwrap().remove(&id).is_some() {
            self.revoked.lock().unwrap().push(id);
        }
    }
}
