//! Presentation boundary: where a session renders itself.
//!
//! The chat platform (messages, embeds, reactions) lives behind
//! [`PresentationChannel`]. The session core only ever produces a
//! [`Payload`] plus the ordered set of glyphs the player may select.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Opaque handle to a rendered surface (a chat message, in practice).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SurfaceHandle(pub Uuid);

impl SurfaceHandle {
    /// Creates a fresh, unique handle.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SurfaceHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SurfaceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Identifier of a platform user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Content of one rendered surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payload {
    /// Title/author line.
    pub author_line: String,
    /// Main body text.
    pub body: String,
    /// Picture reference (file name) to attach, if any.
    pub picture_ref: Option<String>,
    /// Footer line.
    pub footer: String,
    /// Accent colour as `0xRRGGBB`, if the platform supports one.
    pub accent: Option<u32>,
}

/// The platform transport a session renders to.
///
/// All calls are asynchronous boundary calls; the session core performs no
/// further coordination beyond ordering them.
#[async_trait]
pub trait PresentationChannel: Send + Sync {
    /// Publishes a new surface and returns its handle.
    async fn send(&self, payload: &Payload) -> Result<SurfaceHandle, DomainError>;

    /// Replaces the content of an existing surface.
    async fn update(&self, handle: SurfaceHandle, payload: &Payload) -> Result<(), DomainError>;

    /// Attaches a plain-text notice to an existing surface.
    async fn notify(&self, handle: SurfaceHandle, text: &str) -> Result<(), DomainError>;

    /// Removes every selectable affordance from a surface.
    async fn clear_affordances(&self, handle: SurfaceHandle) -> Result<(), DomainError>;

    /// Offers the given glyphs, in order, as selectable affordances.
    async fn offer_affordances(
        &self,
        handle: SurfaceHandle,
        glyphs: &[String],
    ) -> Result<(), DomainError>;
}
