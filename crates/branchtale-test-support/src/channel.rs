//! Test presentation channel that records every call made by a session.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use branchtale_core::error::DomainError;
use branchtale_core::presentation::{Payload, PresentationChannel, SurfaceHandle};

/// One recorded `PresentationChannel` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelCall {
    /// `send`, with the handle that was returned.
    Send(SurfaceHandle, Payload),
    /// `update`.
    Update(SurfaceHandle, Payload),
    /// `notify`.
    Notify(SurfaceHandle, String),
    /// `clear_affordances`.
    ClearAffordances(SurfaceHandle),
    /// `offer_affordances`.
    OfferAffordances(SurfaceHandle, Vec<String>),
}

/// A channel that records all calls and always hands out fresh surfaces.
///
/// Affordance and update failures can be switched on to simulate a surface
/// that was deleted on the platform side. Failed calls are still recorded.
#[derive(Debug, Default)]
pub struct RecordingChannel {
    calls: Mutex<Vec<ChannelCall>>,
    fail_affordances: AtomicBool,
    fail_updates: AtomicBool,
}

impl RecordingChannel {
    /// Creates a channel where every call succeeds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `clear_affordances` and `offer_affordances` fail from now on.
    pub fn fail_affordances(&self) {
        self.fail_affordances.store(true, Ordering::SeqCst);
    }

    /// Makes `update` and `notify` fail from now on.
    pub fn fail_updates(&self) {
        self.fail_updates.store(true, Ordering::SeqCst);
    }

    /// Returns a snapshot of all recorded calls.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn calls(&self) -> Vec<ChannelCall> {
        self.calls.lock().unwrap().clone()
    }

    /// The most recently sent or updated payload.
    pub fn last_payload(&self) -> Option<Payload> {
        self.calls().into_iter().rev().find_map(|call| match call {
            ChannelCall::Send(_, payload) | ChannelCall::Update(_, payload) => Some(payload),
            _ => None,
        })
    }

    /// Glyphs currently offered on `surface`, replaying clears and offers.
    pub fn offered(&self, surface: SurfaceHandle) -> Vec<String> {
        let mut offered = Vec::new();
        for call in self.calls() {
            match call {
                ChannelCall::ClearAffordances(handle) if handle == surface => offered.clear(),
                ChannelCall::OfferAffordances(handle, glyphs) if handle == surface => {
                    offered.extend(glyphs);
                }
                _ => {}
            }
        }
        offered
    }

    /// Every notice text, in order.
    pub fn notices(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                ChannelCall::Notify(_, text) => Some(text),
                _ => None,
            })
            .collect()
    }

    /// Handles returned by `send`, in order.
    pub fn sent_surfaces(&self) -> Vec<SurfaceHandle> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                ChannelCall::Send(handle, _) => Some(handle),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: ChannelCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn check(flag: &AtomicBool) -> Result<(), DomainError> {
        if flag.load(Ordering::SeqCst) {
            Err(DomainError::Presentation("unknown message".into()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl PresentationChannel for RecordingChannel {
    async fn send(&self, payload: &Payload) -> Result<SurfaceHandle, DomainError> {
        let handle = SurfaceHandle::new();
        self.record(ChannelCall::Send(handle, payload.clone()));
        Ok(handle)
    }

    async fn update(&self, handle: SurfaceHandle, payload: &Payload) -> Result<(), DomainError> {
        self.record(ChannelCall::Update(handle, payload.clone()));
        Self::check(&self.fail_updates)
    }

    async fn notify(&self, handle: SurfaceHandle, text: &str) -> Result<(), DomainError> {
        self.record(ChannelCall::Notify(handle, text.to_owned()));
        Self::check(&self.fail_updates)
    }

    async fn clear_affordances(&self, handle: SurfaceHandle) -> Result<(), DomainError> {
        self.record(ChannelCall::ClearAffordances(handle));
        Self::check(&self.fail_affordances)
    }

    async fn offer_affordances(
        &self,
        handle: SurfaceHandle,
        glyphs: &[String],
    ) -> Result<(), DomainError> {
        self.record(ChannelCall::OfferAffordances(handle, glyphs.to_vec()));
        Self::check(&self.fail_affordances)
    }
}
