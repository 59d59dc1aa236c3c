use std::ffi::{CStr, c_void};
use std::num::NonZeroU32;
use std::panic::{self, AssertUnwindSafe};

use glutin::config::{Config, ConfigTemplateBuilder, GlConfig};
use glutin::context::{
    ContextApi, ContextAttributesBuilder, NotCurrentGlContext, PossiblyCurrentContext,
    PossiblyCurrentGlContext,
};
use glutin::display::{GetGlDisplay, GlDisplay};
use glutin::surface::{GlSurface, Surface, SwapInterval, WindowSurface};
use glutin_winit::{DisplayBuilder, GlWindow};
use raw_window_handle::HasWindowHandle;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window, WindowAttributes};

use super::{ContextCreationError, GlInit, NativeContext, NativeError, SurfaceSize};

/// glutin-backed GL context and window surface.
pub struct GlutinContext {
    context: PossiblyCurrentContext,
    surface: Surface<WindowSurface>,
}

// SAFETY: glutin marks current-capable contexts !Send because a context must
// not be current on two threads at once. `ContextSurface` serializes every
// call behind its lock and only lets the recorded holder thread bind, swap or
// unbind, so the context moves between threads only while it is not current.
unsafe impl Send for GlutinContext {}

impl GlutinContext {
    /// Creates the window together with a GL context bound to it.
    ///
    /// The context is left not current on every thread; the first user
    /// acquires it through `ContextSurface::make_current`.
    pub fn realize(
        event_loop: &ActiveEventLoop,
        attributes: WindowAttributes,
        init: &GlInit,
    ) -> Result<(Window, Self), ContextCreationError> {
        let template = ConfigTemplateBuilder::new()
            .with_alpha_size(init.alpha_size)
            .with_transparency(false);

        let built = catch_no_config(|| {
            DisplayBuilder::new()
                .with_window_attributes(Some(attributes))
                .build(event_loop, template, pick_config)
        })
        .map_err(|NoConfig| {
            ContextCreationError::Config("the display offers no config for this template".to_string())
        })?;
        let (window, config) = built.map_err(|e| ContextCreationError::Config(e.to_string()))?;

        let window = window.ok_or_else(|| {
            ContextCreationError::WindowHandle("display builder produced no window".to_string())
        })?;

        let raw_handle = window
            .window_handle()
            .map_err(|e| ContextCreationError::WindowHandle(e.to_string()))?
            .as_raw();

        let display = config.display();
        let desktop = ContextAttributesBuilder::new().build(Some(raw_handle));
        let gles = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::Gles(None))
            .build(Some(raw_handle));

        // SAFETY: `raw_handle` belongs to `window`, which outlives the context.
        let not_current = match unsafe { display.create_context(&config, &desktop) } {
            Ok(context) => context,
            Err(err) if init.gles_fallback => {
                log::warn!("desktop GL context unavailable ({err}); trying GLES");
                unsafe { display.create_context(&config, &gles) }
                    .map_err(ContextCreationError::Context)?
            }
            Err(err) => return Err(ContextCreationError::Context(err)),
        };

        let surface_attributes = window
            .build_surface_attributes(Default::default())
            .map_err(|e| ContextCreationError::WindowHandle(e.to_string()))?;

        // SAFETY: same window as above.
        let surface = unsafe { display.create_window_surface(&config, &surface_attributes) }
            .map_err(ContextCreationError::Surface)?;

        let context = not_current
            .make_current(&surface)
            .map_err(ContextCreationError::Context)?;

        let interval = if init.vsync {
            SwapInterval::Wait(NonZeroU32::MIN)
        } else {
            SwapInterval::DontWait
        };
        if let Err(err) = surface.set_swap_interval(&context, interval) {
            log::warn!("could not set swap interval: {err}");
        }

        context
            .make_not_current_in_place()
            .map_err(ContextCreationError::Context)?;

        log::info!("GL context created ({} samples)", config.num_samples());

        Ok((window, Self { context, surface }))
    }
}

/// Unwind payload raised by [`pick_config`] when the display lists nothing.
///
/// glutin-winit's picker has to return a `Config`, so an empty list can only
/// leave it by unwinding; [`catch_no_config`] turns that back into an error.
#[derive(Debug)]
struct NoConfig;

fn pick_config(configs: Box<dyn Iterator<Item = Config> + '_>) -> Config {
    // Multisampling only costs the decoder; it presents full frames.
    match fewest_samples(configs, |config| config.num_samples()) {
        Some(config) => config,
        None => panic::panic_any(NoConfig),
    }
}

fn fewest_samples<C>(configs: impl Iterator<Item = C>, samples: impl Fn(&C) -> u8) -> Option<C> {
    configs.min_by_key(samples)
}

/// Runs `build`, mapping a [`NoConfig`] unwind to `Err`. Any other panic keeps
/// unwinding.
fn catch_no_config<T>(build: impl FnOnce() -> T) -> Result<T, NoConfig> {
    match panic::catch_unwind(AssertUnwindSafe(build)) {
        Ok(value) => Ok(value),
        Err(payload) => match payload.downcast::<NoConfig>() {
            Ok(_) => Err(NoConfig),
            Err(other) => panic::resume_unwind(other),
        },
    }
}

impl NativeContext for GlutinContext {
    fn make_current(&mut self) -> Result<(), NativeError> {
        self.context
            .make_current(&self.surface)
            .map_err(|e| NativeError::new("make_current", e))
    }

    fn make_not_current(&mut self) -> Result<(), NativeError> {
        self.context
            .make_not_current_in_place()
            .map_err(|e| NativeError::new("make_not_current", e))
    }

    fn swap_buffers(&mut self) -> Result<(), NativeError> {
        self.surface
            .swap_buffers(&self.context)
            .map_err(|e| NativeError::new("swap_buffers", e))
    }

    fn resize(&mut self, size: SurfaceSize) {
        if let (Some(width), Some(height)) =
            (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
        {
            self.surface.resize(&self.context, width, height);
        }
    }

    fn proc_address(&self, name: &CStr) -> *const c_void {
        self.context.display().get_proc_address(name)
    }
}
