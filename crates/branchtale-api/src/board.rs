//! In-memory surface board.
//!
//! Stands in for the chat platform. Every rendered surface is kept here with
//! its payload, its latest notice and the glyphs currently offered on it.
//! Reactions and removals posted over HTTP are fanned out to the sessions
//! subscribed to the surface.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use branchtale_core::error::DomainError;
use branchtale_core::input::{InputEvent, InputSource, Subscription, SubscriptionId};
use branchtale_core::presentation::{Payload, PresentationChannel, SurfaceHandle, UserId};
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::debug;
use uuid::Uuid;

/// What a player sees on one surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SurfaceView {
    /// The surface handle.
    pub handle: SurfaceHandle,
    /// Rendered content.
    pub payload: Payload,
    /// Latest notice attached to the surface.
    pub notice: Option<String>,
    /// Glyphs the player can react with, in order.
    pub affordances: Vec<String>,
}

type Subscriber = (SurfaceHandle, mpsc::UnboundedSender<InputEvent>);

/// Presentation channel and input source backed by process memory.
#[derive(Debug, Default)]
pub struct SurfaceBoard {
    surfaces: Mutex<HashMap<SurfaceHandle, SurfaceView>>,
    subscribers: Mutex<HashMap<SubscriptionId, Subscriber>>,
}

impl SurfaceBoard {
    /// Creates an empty board.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of a surface, if it exists.
    #[must_use]
    pub fn snapshot(&self, handle: SurfaceHandle) -> Option<SurfaceView> {
        lock(&self.surfaces).get(&handle).cloned()
    }

    /// Posts a reaction and returns how many sessions received it.
    /// Returns `None` if the surface does not exist.
    #[must_use]
    pub fn react(&self, handle: SurfaceHandle, user: UserId, glyph: &str) -> Option<usize> {
        if !lock(&self.surfaces).contains_key(&handle) {
            return None;
        }
        Some(self.dispatch(&InputEvent::Selection {
            surface: handle,
            user,
            token: glyph.to_owned(),
        }))
    }

    /// Deletes a surface and tells its sessions. Returns `false` if the
    /// surface did not exist.
    pub fn remove(&self, handle: SurfaceHandle) -> bool {
        if lock(&self.surfaces).remove(&handle).is_none() {
            return false;
        }
        self.dispatch(&InputEvent::SurfaceRemoved { surface: handle });
        true
    }

    /// Number of live input subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        lock(&self.subscribers).len()
    }

    fn dispatch(&self, event: &InputEvent) -> usize {
        let delivered = lock(&self.subscribers)
            .values()
            .filter(|(surface, _)| *surface == event.surface())
            .filter(|(_, sender)| sender.send(event.clone()).is_ok())
            .count();
        debug!(surface = %event.surface(), delivered, "input dispatched");
        delivered
    }

    fn with_surface<T>(
        &self,
        handle: SurfaceHandle,
        edit: impl FnOnce(&mut SurfaceView) -> T,
    ) -> Result<T, DomainError> {
        lock(&self.surfaces)
            .get_mut(&handle)
            .map(edit)
            .ok_or_else(|| DomainError::Presentation(format!("unknown surface {handle}")))
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[async_trait]
impl PresentationChannel for SurfaceBoard {
    async fn send(&self, payload: &Payload) -> Result<SurfaceHandle, DomainError> {
        let handle = SurfaceHandle::new();
        lock(&self.surfaces).insert(
            handle,
            SurfaceView {
                handle,
                payload: payload.clone(),
                notice: None,
                affordances: Vec::new(),
            },
        );
        Ok(handle)
    }

    async fn update(&self, handle: SurfaceHandle, payload: &Payload) -> Result<(), DomainError> {
        self.with_surface(handle, |view| view.payload = payload.clone())
    }

    async fn notify(&self, handle: SurfaceHandle, text: &str) -> Result<(), DomainError> {
        self.with_surface(handle, |view| view.notice = Some(text.to_owned()))
    }

    async fn clear_affordances(&self, handle: SurfaceHandle) -> Result<(), DomainError> {
        self.with_surface(handle, |view| view.affordances.clear())
    }

    async fn offer_affordances(
        &self,
        handle: SurfaceHandle,
        glyphs: &[String],
    ) -> Result<(), DomainError> {
        self.with_surface(handle, |view| {
            for glyph in glyphs {
                if !view.affordances.contains(glyph) {
                    view.affordances.push(glyph.clone());
                }
            }
        })
    }
}

impl InputSource for SurfaceBoard {
    fn subscribe(&self, surface: SurfaceHandle) -> Subscription {
        let (sender, receiver) = mpsc::unbounded_channel();
        let id = SubscriptionId(Uuid::new_v4());
        lock(&self.subscribers).insert(id, (surface, sender));
        Subscription::new(id, receiver)
    }

    fn revoke(&self, id: SubscriptionId) {
        lock(&self.subscribers).remove(&id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(body: &str) -> Payload {
        Payload {
            author_line: "Test".to_owned(),
            body: body.to_owned(),
            picture_ref: None,
            footer: String::new(),
            accent: None,
        }
    }

    #[tokio::test]
    async fn test_send_update_and_affordances_are_visible_in_snapshot() {
        // Arrange
        let board = SurfaceBoard::new();
        let handle = board.send(&payload("one")).await.unwrap();

        // Act
        board.update(handle, &payload("two")).await.unwrap();
        board
            .offer_affordances(handle, &["🅰".to_owned(), "🅱".to_owned()])
            .await
            .unwrap();
        board.notify(handle, "heads up").await.unwrap();

        // Assert
        let view = board.snapshot(handle).unwrap();
        assert_eq!(view.payload.body, "two");
        assert_eq!(view.affordances, ["🅰", "🅱"]);
        assert_eq!(view.notice.as_deref(), Some("heads up"));

        board.clear_affordances(handle).await.unwrap();
        assert!(board.snapshot(handle).unwrap().affordances.is_empty());
    }

    #[tokio::test]
    async fn test_calls_on_unknown_surface_fail_with_presentation_error() {
        let board = SurfaceBoard::new();
        let handle = SurfaceHandle::new();

        let update = board.update(handle, &payload("x")).await;
        let clear = board.clear_affordances(handle).await;

        assert!(matches!(update, Err(DomainError::Presentation(_))));
        assert!(matches!(clear, Err(DomainError::Presentation(_))));
    }

    #[tokio::test]
    async fn test_reactions_reach_only_subscribers_of_that_surface() {
        // Arrange
        let board = SurfaceBoard::new();
        let first = board.send(&payload("a")).await.unwrap();
        let second = board.send(&payload("b")).await.unwrap();
        let mut on_first = board.subscribe(first);
        let _on_second = board.subscribe(second);

        // Act
        let delivered = board.react(first, UserId(3), "🌾");

        // Assert
        assert_eq!(delivered, Some(1));
        assert_eq!(
            on_first.next().await,
            Some(InputEvent::Selection {
                surface: first,
                user: UserId(3),
                token: "🌾".to_owned(),
            })
        );
        assert_eq!(board.react(SurfaceHandle::new(), UserId(3), "🌾"), None);
    }

    #[tokio::test]
    async fn test_remove_notifies_subscribers_and_forgets_surface() {
        let board = SurfaceBoard::new();
        let handle = board.send(&payload("a")).await.unwrap();
        let mut subscription = board.subscribe(handle);

        assert!(board.remove(handle));

        assert_eq!(
            subscription.next().await,
            Some(InputEvent::SurfaceRemoved { surface: handle })
        );
        assert!(board.snapshot(handle).is_none());
        assert!(!board.remove(handle));
    }

    #[tokio::test]
    async fn test_revoke_drops_subscriber() {
        let board = SurfaceBoard::new();
        let handle = board.send(&payload("a")).await.unwrap();
        let subscription = board.subscribe(handle);

        board.revoke(subscription.id());
        board.revoke(subscription.id());

        assert_eq!(board.subscriber_count(), 0);
        assert_eq!(board.react(handle, UserId(1), "🌾"), Some(0));
    }
}
