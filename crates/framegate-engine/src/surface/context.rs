use std::ffi::{CStr, c_void};
use std::ptr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, ThreadId};

use parking_lot::Mutex;

use super::{NativeError, SurfaceSize};

/// Native primitives of a GL context bound to one window surface.
///
/// Implementations do no bookkeeping of their own; [`ContextSurface`] decides
/// when each call is allowed.
pub trait NativeContext: Send {
    /// Binds the context and its surface to the calling thread.
    fn make_current(&mut self) -> Result<(), NativeError>;

    /// Unbinds the context from the calling thread.
    fn make_not_current(&mut self) -> Result<(), NativeError>;

    /// Presents the back buffer. The context is current on the calling thread.
    fn swap_buffers(&mut self) -> Result<(), NativeError>;

    /// Resizes the drawable. Never called with an empty size.
    fn resize(&mut self, size: SurfaceSize);

    /// Driver entry point for `name`, or null when unsupported.
    fn proc_address(&self, name: &CStr) -> *const c_void;
}

struct Inner {
    native: Option<Box<dyn NativeContext>>,

    /// Thread that last made the context current and has not released it yet.
    holder: Option<ThreadId>,

    size: SurfaceSize,

    /// Set once the surface has been invalidated; a destroyed surface is never
    /// realized again.
    destroyed: bool,
}

/// GL context plus the record of who may use it.
///
/// Ownership moves between threads only through [`make_current`] and
/// [`release`]. The internal lock guards the bookkeeping and the short native
/// calls; it is never held while the holder draws.
///
/// [`make_current`]: ContextSurface::make_current
/// [`release`]: ContextSurface::release
pub struct ContextSurface {
    inner: Mutex<Inner>,
    valid: AtomicBool,
}

impl ContextSurface {
    /// Creates an unrealized surface. It is invalid until [`realize`](Self::realize).
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                native: None,
                holder: None,
                size: SurfaceSize::default(),
                destroyed: false,
            }),
            valid: AtomicBool::new(false),
        }
    }

    /// Installs the native context created for the window.
    ///
    /// Returns `false` and drops `native` when a context is already installed
    /// or the surface has been destroyed.
    pub fn realize(&self, native: Box<dyn NativeContext>, size: SurfaceSize) -> bool {
        let mut inner = self.inner.lock();

        if inner.destroyed {
            log::warn!("ignoring realization of a destroyed surface");
            return false;
        }
        if inner.native.is_some() {
            log::debug!("surface already realized; keeping the existing context");
            return false;
        }

        inner.native = Some(native);
        inner.size = size;
        self.valid.store(true, Ordering::Release);

        log::info!("context surface realized at {size}");
        true
    }

    pub fn is_valid(&self) -> bool {
        self.valid.load(Ordering::Acquire)
    }

    /// Binds the context to the calling thread.
    ///
    /// Returns `false` when the surface is invalid, another thread holds the
    /// context, or the driver refuses. Calling it again from the holder is a
    /// no-op that returns `true`.
    pub fn make_current(&self) -> bool {
        let me = thread::current().id();
        let mut inner = self.inner.lock();

        if !self.is_valid() {
            return false;
        }

        match inner.holder {
            Some(holder) if holder == me => return true,
            Some(holder) => {
                log::trace!("context held by {holder:?}; {me:?} must wait for release");
                return false;
            }
            None => {}
        }

        let Some(native) = inner.native.as_mut() else {
            return false;
        };

        if let Err(err) = native.make_current() {
            log::warn!("{err}");
            return false;
        }

        inner.holder = Some(me);
        true
    }

    /// Unbinds the context from the calling thread.
    ///
    /// Returns `false` when the caller is not the holder or the surface is no
    /// longer valid. A surface invalidated while held drops its native context
    /// here, on the thread that held it.
    pub fn release(&self) -> bool {
        let me = thread::current().id();
        let mut inner = self.inner.lock();

        if inner.holder != Some(me) {
            log::trace!("release from {me:?}, which does not hold the context");
            return false;
        }

        let mut released = match inner.native.as_mut() {
            Some(native) => match native.make_not_current() {
                Ok(()) => true,
                Err(err) => {
                    log::warn!("{err}");
                    false
                }
            },
            None => false,
        };
        inner.holder = None;

        if inner.destroyed {
            inner.native = None;
            released = false;
        }

        released
    }

    /// Presents the back buffer.
    ///
    /// Only the holder may present; any other call is refused without touching
    /// the driver. Failures are logged, never returned.
    pub fn swap_buffers(&self) {
        let me = thread::current().id();
        let mut inner = self.inner.lock();

        if inner.holder != Some(me) {
            log::warn!("swap from {me:?} refused: context not held by this thread");
            return;
        }
        if inner.destroyed {
            return;
        }

        if let Some(native) = inner.native.as_mut() {
            if let Err(err) = native.swap_buffers() {
                log::debug!("{err}");
            }
        }
    }

    /// `true` when the calling thread holds the context.
    pub fn is_current(&self) -> bool {
        self.inner.lock().holder == Some(thread::current().id())
    }

    /// Current drawable size.
    pub fn size(&self) -> SurfaceSize {
        self.inner.lock().size
    }

    /// Records a new drawable size and resizes the native surface when it is
    /// non-empty.
    pub fn resize(&self, size: SurfaceSize) {
        let mut inner = self.inner.lock();
        inner.size = size;

        if size.is_empty() || inner.destroyed {
            return;
        }
        if let Some(native) = inner.native.as_mut() {
            native.resize(size);
        }
    }

    /// Looks up a driver entry point. Null when unsupported or unrealized.
    pub fn proc_address(&self, name: &CStr) -> *const c_void {
        let inner = self.inner.lock();
        match inner.native.as_ref() {
            Some(native) if !inner.destroyed => native.proc_address(name),
            _ => ptr::null(),
        }
    }

    /// Marks the surface destroyed.
    ///
    /// The native context is dropped immediately when nobody holds it,
    /// otherwise on the holder's next [`release`](Self::release). Returns
    /// `true` on the first call only.
    pub fn invalidate(&self) -> bool {
        let mut inner = self.inner.lock();
        if inner.destroyed {
            return false;
        }

        inner.destroyed = true;
        self.valid.store(false, Ordering::Release);

        if inner.holder.is_none() {
            inner.native = None;
        } else {
            log::debug!("surface invalidated while held; deferring context drop to release");
        }

        log::info!("context surface invalidated");
        true
    }
}

impl Default for ContextSurface {
    fn default() -> Self {
        Self::new()
    }
}
