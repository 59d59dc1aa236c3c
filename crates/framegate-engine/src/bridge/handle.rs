use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

use crate::surface::SurfaceSize;

#[derive(Default)]
struct Slot {
    size: Mutex<Option<SurfaceSize>>,
    updates: AtomicU64,
}

/// Render-target size as seen by the decoder.
///
/// Created by the decoder, handed to the engine once through
/// `bind_window_callback`, then written by the GUI thread and read by the
/// decoder's render thread. Clones share the same slot.
#[derive(Clone, Default)]
pub struct WindowSizeHandle {
    slot: Arc<Slot>,
}

impl WindowSizeHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_size(&self, size: SurfaceSize) {
        *self.slot.size.lock() = Some(size);
        self.slot.updates.fetch_add(1, Ordering::Release);
    }

    /// Last size pushed, or `None` before the engine has bound the handle.
    pub fn size(&self) -> Option<SurfaceSize> {
        *self.slot.size.lock()
    }

    /// Number of pushes so far. Lets a render loop skip viewport work when
    /// nothing changed.
    pub fn updates(&self) -> u64 {
        self.slot.updates.load(Ordering::Acquire)
    }

    pub fn same_as(&self, other: &WindowSizeHandle) -> bool {
        Arc::ptr_eq(&self.slot, &other.slot)
    }
}

impl std::fmt::Debug for WindowSizeHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WindowSizeHandle")
            .field("size", &self.size())
            .field("updates", &self.updates())
            .finish()
    }
}
