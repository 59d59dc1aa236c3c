//! Engine bridge: what a decoder render thread may ask of the GL window.
//!
//! The decoder never sees the context surface directly. It gets an
//! `Arc<dyn EngineCallbacks>` and a [`WindowSizeHandle`] it created itself,
//! and everything it learns comes back as a pointer, a boolean, or a size.

mod handle;

use std::ffi::c_void;

pub use handle::WindowSizeHandle;

/// Callbacks invoked from the decoder's render thread.
///
/// None of these panic or return errors; failure shows up as a null pointer
/// or `false`, because the calling thread belongs to the decoder and must stay
/// responsive.
pub trait EngineCallbacks: Send + Sync {
    /// Driver entry point for `name`; null means "unsupported".
    fn resolve_function(&self, name: &str) -> *const c_void;

    /// `entering == true` binds the context to the calling thread, `false`
    /// releases it. On `false` the caller skips this render pass.
    ///
    /// Enter and exit calls come in pairs from a single thread at a time.
    fn acquire_context(&self, entering: bool) -> bool;

    /// Presents the back buffer. Best effort.
    fn swap(&self);

    /// Hands over the handle through which the decoder learns its
    /// render-target size. The current size is pushed into it immediately.
    fn bind_window_callback(&self, handle: WindowSizeHandle);
}
