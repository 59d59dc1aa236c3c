//! Startup sequencer: issues "begin playback" once the context exists.
//!
//! Playback waits for the session's "context ready" signal (first completed
//! render pass). An optional fallback deadline still attempts playback if that
//! signal never comes; any failure then surfaces through the decoder.

use std::time::{Duration, Instant};

use crate::media::MediaRef;

/// Why playback was issued.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum StartTrigger {
    ContextReady,
    Fallback,
}

/// A playback command, produced at most once per sequencer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackCommand {
    pub media: MediaRef,
    pub trigger: StartTrigger,
}

/// One-shot gate in front of the decoder's play command. Not cancellable.
#[derive(Debug)]
pub struct StartupSequencer {
    media: Option<MediaRef>,
    deadline: Option<Instant>,
}

impl StartupSequencer {
    /// Starts the sequencer at `now`. `fallback == None` waits for the ready
    /// signal indefinitely.
    pub fn new(media: MediaRef, fallback: Option<Duration>, now: Instant) -> Self {
        Self {
            media: Some(media),
            deadline: fallback.map(|delay| now + delay),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.media.is_some()
    }

    /// Fallback deadline, while still pending.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.deadline.filter(|_| self.is_pending())
    }

    /// The context is known to exist. Returns the command the first time.
    pub fn on_context_ready(&mut self) -> Option<PlaybackCommand> {
        self.fire(StartTrigger::ContextReady)
    }

    /// Checks the fallback deadline.
    pub fn poll(&mut self, now: Instant) -> Option<PlaybackCommand> {
        match self.next_deadline() {
            Some(deadline) if now >= deadline => {
                log::warn!("context not confirmed before the startup deadline; starting playback anyway");
                self.fire(StartTrigger::Fallback)
            }
            _ => None,
        }
    }

    fn fire(&mut self, trigger: StartTrigger) -> Option<PlaybackCommand> {
        let media = self.media.take()?;
        log::info!("starting playback of {media} ({trigger:?})");
        Some(PlaybackCommand { media, trigger })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::bridge::{EngineCallbacks, WindowSizeHandle};
    use crate::session::{Session, SessionState};
    use crate::surface::SurfaceSize;
    use crate::test_support::FakeContext;

    const MS: Duration = Duration::from_millis(1);

    fn media() -> MediaRef {
        MediaRef::Uri("rtsp://cam.local/stream".to_string())
    }

    #[test]
    fn ready_signal_issues_playback_once() {
        let t0 = Instant::now();
        let mut seq = StartupSequencer::new(media(), Some(500 * MS), t0);

        let cmd = seq.on_context_ready().expect("first ready signal fires");
        assert_eq!(cmd.trigger, StartTrigger::ContextReady);
        assert_eq!(cmd.media, media());

        assert_eq!(seq.on_context_ready(), None);
        assert_eq!(seq.poll(t0 + 10_000 * MS), None);
        assert_eq!(seq.next_deadline(), None);
    }

    #[test]
    fn fallback_fires_only_after_deadline() {
        let t0 = Instant::now();
        let mut seq = StartupSequencer::new(media(), Some(500 * MS), t0);

        assert_eq!(seq.next_deadline(), Some(t0 + 500 * MS));
        assert_eq!(seq.poll(t0 + 499 * MS), None);

        let cmd = seq.poll(t0 + 500 * MS).expect("deadline reached");
        assert_eq!(cmd.trigger, StartTrigger::Fallback);
        assert!(!seq.is_pending());
        assert_eq!(seq.on_context_ready(), None);
    }

    #[test]
    fn without_fallback_only_the_ready_signal_fires() {
        let t0 = Instant::now();
        let mut seq = StartupSequencer::new(media(), None, t0);
        assert_eq!(seq.next_deadline(), None);
        assert_eq!(seq.poll(t0 + 3_600_000 * MS), None);
        assert!(seq.on_context_ready().is_some());
    }

    #[test]
    fn fallback_before_surface_exists_still_plays_once() {
        let t0 = Instant::now();
        let session = Arc::new(Session::new());
        session.decoder_attached();
        let mut seq = StartupSequencer::new(media(), Some(500 * MS), t0);

        // The deadline passes before the window is realized.
        let mut issued = 0;
        for step in 0..10u32 {
            if seq.poll(t0 + step * 100 * MS).is_some() {
                issued += 1;
            }
        }
        assert_eq!(issued, 1);

        // The decoder starts rendering; acquisitions fail until the surface exists.
        assert!(!session.acquire_context(true));
        assert!(!session.acquire_context(true));

        let (native, _probe) = FakeContext::new();
        session.realize(Box::new(native), SurfaceSize::new(800, 800));
        assert!(session.acquire_context(true));
        assert!(session.acquire_context(false));

        // The ready signal that follows must not replay the command.
        assert_eq!(session.record_render_pass(), Some(SessionState::Active));
        assert_eq!(seq.on_context_ready(), None);
    }

    #[test]
    fn handle_bound_before_surface_exists_gets_creation_size() {
        let t0 = Instant::now();
        let session = Arc::new(Session::new());
        session.decoder_attached();
        let mut seq = StartupSequencer::new(media(), Some(500 * MS), t0);
        assert!(seq.poll(t0 + 500 * MS).is_some());

        // Decoder thread starts early and binds against the unrealized surface.
        let handle = WindowSizeHandle::new();
        session.bind_window_callback(handle.clone());
        assert_eq!(handle.size(), Some(SurfaceSize::default()));

        let (native, _probe) = FakeContext::new();
        session.realize(Box::new(native), SurfaceSize::new(800, 800));
        assert!(session.acquire_context(true));
        assert!(session.acquire_context(false));

        // No Resized event is needed for the decoder to see the window size.
        assert_eq!(handle.size(), Some(SurfaceSize::new(800, 800)));
        assert_eq!(handle.updates(), 2);
    }
}
