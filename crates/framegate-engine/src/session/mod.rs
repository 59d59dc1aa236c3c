//! Playback session: the one object shared by the GUI thread and the decoder.
//!
//! A `Session` owns the context surface, the bound size handle and the
//! lifecycle state. The GUI-side components (render driver, resize
//! coordinator) and the decoder-side bridge all receive the same
//! `Arc<Session>` at construction.

mod state;

use std::ffi::{CString, c_void};
use std::ptr;

use parking_lot::Mutex;

use crate::bridge::{EngineCallbacks, WindowSizeHandle};
use crate::surface::{ContextSurface, NativeContext, SurfaceSize};

pub use state::SessionState;
use state::Lifecycle;

pub struct Session {
    surface: ContextSurface,
    size_handle: Mutex<Option<WindowSizeHandle>>,
    lifecycle: Mutex<Lifecycle>,
}

impl Session {
    pub fn new() -> Self {
        Self {
            surface: ContextSurface::new(),
            size_handle: Mutex::new(None),
            lifecycle: Mutex::new(Lifecycle::default()),
        }
    }

    pub fn surface(&self) -> &ContextSurface {
        &self.surface
    }

    pub fn state(&self) -> SessionState {
        self.lifecycle.lock().state()
    }

    /// Installs the window's native context. Returns the new state if the
    /// session moved.
    ///
    /// A decoder that bound its size handle before the window existed saw an
    /// empty size; it receives the creation size here.
    pub fn realize(&self, native: Box<dyn NativeContext>, size: SurfaceSize) -> Option<SessionState> {
        if !self.surface.realize(native, size) {
            return None;
        }
        self.forward_size(size);
        self.transition(Lifecycle::surface_realized)
    }

    /// Records that a decoder has been given this session's callbacks.
    pub fn decoder_attached(&self) -> Option<SessionState> {
        self.transition(Lifecycle::decoder_attached)
    }

    /// Records a completed render pass. Returns `Some(Active)` exactly once,
    /// when the pass proves the context exists for an attached decoder.
    pub fn record_render_pass(&self) -> Option<SessionState> {
        self.transition(Lifecycle::render_pass_done)
    }

    /// Invalidates the surface and ends the session.
    pub fn tear_down(&self) -> Option<SessionState> {
        self.surface.invalidate();
        self.transition(Lifecycle::tear_down)
    }

    /// Pushes `size` into the bound handle. `false` when no decoder has bound
    /// one yet; nothing is queued in that case.
    pub fn forward_size(&self, size: SurfaceSize) -> bool {
        match self.size_handle.lock().as_ref() {
            Some(handle) => {
                handle.set_size(size);
                true
            }
            None => false,
        }
    }

    /// Handle bound by the decoder, if any.
    pub fn bound_handle(&self) -> Option<WindowSizeHandle> {
        self.size_handle.lock().clone()
    }

    fn transition(&self, fact: fn(&mut Lifecycle)) -> Option<SessionState> {
        let changed = self.lifecycle.lock().apply(fact);
        if let Some(state) = changed {
            log::info!("session -> {state:?}");
        }
        changed
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineCallbacks for Session {
    fn resolve_function(&self, name: &str) -> *const c_void {
        let Ok(c_name) = CString::new(name) else {
            return ptr::null();
        };
        let address = self.surface.proc_address(&c_name);
        if address.is_null() {
            log::debug!("GL entry point {name} unresolved");
        }
        address
    }

    fn acquire_context(&self, entering: bool) -> bool {
        if entering {
            self.surface.make_current()
        } else {
            self.surface.release()
        }
    }

    fn swap(&self) {
        self.surface.swap_buffers();
    }

    fn bind_window_callback(&self, handle: WindowSizeHandle) {
        // The slot lock orders this against `forward_size`: a resize either
        // sees the new handle or has already updated the size read here.
        let mut slot = self.size_handle.lock();

        if let Some(previous) = slot.as_ref() {
            if !previous.same_as(&handle) {
                log::debug!("decoder rebound its window callback");
            }
        }

        let size = self.surface.size();
        handle.set_size(size);
        *slot = Some(handle);

        log::info!("decoder window callback bound at {size}");
    }
}
