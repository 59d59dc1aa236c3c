//! Render driver: keeps the GL surface serviced from the GUI thread.
//!
//! The driver does no visible rendering; the decoder presents frames through
//! the engine bridge. It exists to run GUI-side render passes at a fixed
//! cadence (which proves the context exists and does the one-time GL init)
//! and to notice when the surface has been destroyed.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::bridge::EngineCallbacks;
use crate::gl::GlFunctions;
use crate::session::{Session, SessionState};
use crate::time::Ticker;

/// Default cadence. Only needs to be frequent enough to keep the surface
/// responsive; it is not a frame rate.
pub const DEFAULT_TICK: Duration = Duration::from_millis(50);

const CLEAR_COLOR: [f32; 4] = [0.0, 0.0, 0.0, 1.0];

/// Result of one scheduling check.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Tick {
    /// Not due yet.
    Idle { next: Instant },
    /// Due: request one repaint, then come back at `next`.
    Repaint { next: Instant },
    /// The surface is gone; the loop is over.
    Stopped,
}

/// Result of one GUI-side render pass.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum RenderPass {
    /// `activated` is `true` for the pass that moved the session to `Active`.
    Completed { activated: bool },
    /// Context unavailable (held by the decoder, or the driver refused to
    /// bind or unbind it).
    Skipped,
    Stopped,
}

pub struct RenderDriver {
    session: Arc<Session>,
    ticker: Ticker,

    /// Capability binding for the context; dropped when the surface dies.
    gl: Option<GlFunctions>,
    gl_init_done: bool,

    stopped: bool,
    passes: u64,
}

impl RenderDriver {
    /// Starts the loop. Call once the session's surface has been realized: an
    /// invalid surface on the first tick stops the driver for good.
    pub fn new(session: Arc<Session>, tick: Duration, now: Instant) -> Self {
        Self {
            session,
            ticker: Ticker::new(tick, now),
            gl: None,
            gl_init_done: false,
            stopped: false,
            passes: 0,
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Completed GUI-side render passes.
    pub fn passes(&self) -> u64 {
        self.passes
    }

    pub fn has_gl(&self) -> bool {
        self.gl.is_some()
    }

    /// When the event loop should wake the driver next. `None` once stopped.
    pub fn next_deadline(&self) -> Option<Instant> {
        (!self.stopped).then(|| self.ticker.deadline())
    }

    /// One loop iteration.
    ///
    /// An invalid surface ends the loop permanently; there is no restart.
    pub fn tick(&mut self, now: Instant) -> Tick {
        if self.stopped {
            return Tick::Stopped;
        }
        if !self.ticker.is_due(now) {
            return Tick::Idle {
                next: self.ticker.deadline(),
            };
        }

        if !self.session.surface().is_valid() {
            self.stop();
            return Tick::Stopped;
        }

        let next = self.ticker.advance(now);
        Tick::Repaint { next }
    }

    /// The repaint requested by [`tick`](Self::tick).
    pub fn render_pass(&mut self) -> RenderPass {
        if self.stopped {
            return RenderPass::Stopped;
        }

        let surface = self.session.surface();
        if !surface.make_current() {
            log::trace!("render pass skipped; context unavailable");
            return RenderPass::Skipped;
        }

        if !self.gl_init_done {
            self.gl_init_done = true;
            self.gl = self.init_gl();
        }
        self.paint();

        if !surface.release() {
            log::warn!("render pass could not release the context; pass not counted");
            return RenderPass::Skipped;
        }
        self.passes += 1;

        let activated = self.session.record_render_pass() == Some(SessionState::Active);
        RenderPass::Completed { activated }
    }

    /// Paint hook. Presentation is driven by the decoder's swap requests, so
    /// there is nothing to draw here.
    fn paint(&self) {}

    fn init_gl(&self) -> Option<GlFunctions> {
        let Some(gl) = GlFunctions::load(|name| self.session.resolve_function(name)) else {
            log::warn!("GL entry points unavailable; skipping GL init");
            return None;
        };
        // SAFETY: called between a successful make_current and release.
        unsafe { gl.set_clear_color(CLEAR_COLOR) };
        Some(gl)
    }

    fn stop(&mut self) {
        self.stopped = true;
        self.gl = None;
        self.session.tear_down();
        log::info!(
            "surface invalid; render driver stopped after {} ticks, {} passes",
            self.ticker.index(),
            self.passes
        );
    }
}
