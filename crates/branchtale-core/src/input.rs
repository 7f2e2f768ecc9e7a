//! Input boundary: where a session's player input comes from.
//!
//! A session subscribes to the events of its own surface and receives a
//! [`Subscription`]. The subscription is the only link between the input
//! source and the session; revoking it detaches the session.

use tokio::sync::mpsc;
use uuid::Uuid;

use crate::presentation::{SurfaceHandle, UserId};

/// Identifier of one input subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub Uuid);

/// An input event delivered by the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// A user selected a glyph on a surface.
    Selection {
        /// The surface the selection was made on.
        surface: SurfaceHandle,
        /// The user who made the selection.
        user: UserId,
        /// The selected glyph.
        token: String,
    },
    /// A surface was removed by the host.
    SurfaceRemoved {
        /// The removed surface.
        surface: SurfaceHandle,
    },
}

impl InputEvent {
    /// The surface this event concerns.
    #[must_use]
    pub fn surface(&self) -> SurfaceHandle {
        match self {
            Self::Selection { surface, .. } | Self::SurfaceRemoved { surface } => *surface,
        }
    }
}

/// A live stream of input events for one session.
#[derive(Debug)]
pub struct Subscription {
    id: SubscriptionId,
    events: mpsc::UnboundedReceiver<InputEvent>,
}

impl Subscription {
    /// Creates a subscription with the given id, reading from `events`.
    #[must_use]
    pub fn new(id: SubscriptionId, events: mpsc::UnboundedReceiver<InputEvent>) -> Self {
        Self { id, events }
    }

    /// Returns the subscription identifier.
    #[must_use]
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Waits for the next event. Returns `None` once the source has dropped
    /// the sending side.
    pub async fn next(&mut self) -> Option<InputEvent> {
        self.events.recv().await
    }
}

/// The platform's event feed.
pub trait InputSource: Send + Sync {
    /// Subscribes to input events for `surface`.
    fn subscribe(&self, surface: SurfaceHandle) -> Subscription;

    /// Revokes a subscription. Revoking an unknown or already revoked
    /// subscription is a no-op.
    fn revoke(&self, id: SubscriptionId);
}
