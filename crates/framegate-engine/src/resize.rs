//! Resize coordinator: GUI-thread size changes into the decoder's size handle.

use std::sync::Arc;

use crate::session::Session;
use crate::surface::SurfaceSize;

/// What happened to a resize notification.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ResizeOutcome {
    /// Pushed into the bound size handle.
    Forwarded,
    /// No decoder handle bound yet. Not queued, not retried: the bind-time
    /// push of the then-current size is the only recovery.
    Dropped,
}

pub struct ResizeCoordinator {
    session: Arc<Session>,
}

impl ResizeCoordinator {
    pub fn new(session: Arc<Session>) -> Self {
        Self { session }
    }

    /// Handles one size-changed notification, synchronously on the GUI thread.
    ///
    /// The native surface is resized first so a concurrent bind reads the new
    /// size. Nothing waits for the decoder to act on the push.
    pub fn on_resized(&self, size: SurfaceSize) -> ResizeOutcome {
        self.session.surface().resize(size);

        if self.session.forward_size(size) {
            log::debug!("render target resized to {size}");
            ResizeOutcome::Forwarded
        } else {
            log::debug!("resize to {size} dropped; no decoder handle bound yet");
            ResizeOutcome::Dropped
        }
    }
}
