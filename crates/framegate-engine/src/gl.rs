//! The handful of GL 1.1 entry points the engine and the pattern decoder call.
//!
//! Entry points are resolved at runtime through whatever resolver the caller
//! has (the surface on the GUI thread, the engine bridge on a decoder thread),
//! so no GL loader crate is needed.

use std::ffi::c_void;
use std::mem;

use crate::surface::SurfaceSize;

pub const COLOR_BUFFER_BIT: u32 = 0x0000_4000;

type ClearColorFn = unsafe extern "system" fn(f32, f32, f32, f32);
type ClearFn = unsafe extern "system" fn(u32);
type ViewportFn = unsafe extern "system" fn(i32, i32, i32, i32);

/// Resolved GL function table.
///
/// Holding one is the "capability binding" for a context: it is only
/// meaningful while that context exists, and every call requires the context
/// to be current on the calling thread.
#[derive(Clone, Copy)]
pub struct GlFunctions {
    clear_color: ClearColorFn,
    clear: ClearFn,
    viewport: ViewportFn,
}

impl GlFunctions {
    /// Resolves every entry point; `None` if any of them is missing.
    pub fn load(mut resolve: impl FnMut(&str) -> *const c_void) -> Option<Self> {
        let clear_color = resolve("glClearColor");
        let clear = resolve("glClear");
        let viewport = resolve("glViewport");

        if clear_color.is_null() || clear.is_null() || viewport.is_null() {
            return None;
        }

        // SAFETY: non-null addresses handed out by the driver for these names
        // have the GL 1.1 signatures above.
        unsafe {
            Some(Self {
                clear_color: mem::transmute::<*const c_void, ClearColorFn>(clear_color),
                clear: mem::transmute::<*const c_void, ClearFn>(clear),
                viewport: mem::transmute::<*const c_void, ViewportFn>(viewport),
            })
        }
    }

    /// # Safety
    /// The context these functions were resolved for must be current on the
    /// calling thread.
    pub unsafe fn set_clear_color(&self, rgba: [f32; 4]) {
        let [r, g, b, a] = rgba;
        unsafe { (self.clear_color)(r, g, b, a) }
    }

    /// Clears the colour buffer.
    ///
    /// # Safety
    /// See [`set_clear_color`](Self::set_clear_color).
    pub unsafe fn clear(&self) {
        unsafe { (self.clear)(COLOR_BUFFER_BIT) }
    }

    /// # Safety
    /// See [`set_clear_color`](Self::set_clear_color).
    pub unsafe fn viewport(&self, size: SurfaceSize) {
        let width = i32::try_from(size.width).unwrap_or(i32::MAX);
        let height = i32::try_from(size.height).unwrap_or(i32::MAX);
        unsafe { (self.viewport)(0, 0, width, height) }
    }
}

impl std::fmt::Debug for GlFunctions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlFunctions").finish_non_exhaustive()
    }
}
