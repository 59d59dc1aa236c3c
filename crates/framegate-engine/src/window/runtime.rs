use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::decoder::Decoder;
use crate::driver::{DEFAULT_TICK, RenderDriver, RenderPass, Tick};
use crate::media::MediaRef;
use crate::resize::ResizeCoordinator;
use crate::session::Session;
use crate::startup::{PlaybackCommand, StartupSequencer};
use crate::surface::{GlInit, GlutinContext, NativeContext, SurfaceSize};

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,

    /// Render driver cadence.
    pub tick_interval: Duration,

    /// Start playback anyway if the context has not been confirmed after this
    /// long. `None` waits for confirmation indefinitely.
    pub startup_fallback: Option<Duration>,

    pub gl: GlInit,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "framegate".to_string(),
            initial_size: LogicalSize::new(800.0, 800.0),
            tick_interval: DEFAULT_TICK,
            startup_fallback: Some(Duration::from_secs(2)),
            gl: GlInit::default(),
        }
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens the window, attaches `decoder` to a fresh session and plays
    /// `media` once the GL context exists. Returns when the window closes.
    pub fn run(config: RuntimeConfig, media: MediaRef, decoder: Box<dyn Decoder>) -> Result<()> {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = PlayerState::new(config, media, decoder);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.fatal.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

struct PlayerState {
    config: RuntimeConfig,
    session: Arc<Session>,
    decoder: Box<dyn Decoder>,

    resize: ResizeCoordinator,
    startup: StartupSequencer,
    driver: Option<RenderDriver>,

    // Dropped after the session has let go of the GL surface.
    window: Option<Window>,

    fatal: Option<anyhow::Error>,
    exit_requested: bool,
}

impl PlayerState {
    fn new(config: RuntimeConfig, media: MediaRef, mut decoder: Box<dyn Decoder>) -> Self {
        let session = Arc::new(Session::new());

        decoder.attach(session.clone());
        session.decoder_attached();

        Self {
            resize: ResizeCoordinator::new(Arc::clone(&session)),
            startup: StartupSequencer::new(media, config.startup_fallback, Instant::now()),
            config,
            session,
            decoder,
            driver: None,
            window: None,
            fatal: None,
            exit_requested: false,
        }
    }

    fn request_exit(&mut self, event_loop: &ActiveEventLoop) {
        self.exit_requested = true;
        event_loop.exit();
    }

    fn realize_window(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attributes = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        let (window, native) = GlutinContext::realize(event_loop, attributes, &self.config.gl)
            .context("GL context creation failed")?;

        self.install_surface(Box::new(native), window.inner_size().into());
        self.window = Some(window);
        Ok(())
    }

    /// Hands the realized context to the session and starts the render driver.
    fn install_surface(&mut self, native: Box<dyn NativeContext>, size: SurfaceSize) {
        self.session.realize(native, size);
        self.driver = Some(RenderDriver::new(
            Arc::clone(&self.session),
            self.config.tick_interval,
            Instant::now(),
        ));
    }

    /// Runs the requested render pass; the pass that activates the session
    /// releases the startup gate.
    fn redraw(&mut self) {
        let Some(driver) = self.driver.as_mut() else {
            return;
        };
        if driver.render_pass() == (RenderPass::Completed { activated: true }) {
            if let Some(command) = self.startup.on_context_ready() {
                self.start_playback(command);
            }
        }
    }

    fn start_playback(&mut self, command: PlaybackCommand) {
        if let Err(err) = self.decoder.play(&command.media) {
            log::error!("decoder could not start {}: {err}", command.media);
        }
    }

    /// Stops the decoder (so it no longer holds the context) and marks the
    /// surface destroyed. The render driver notices on its next tick.
    fn begin_shutdown(&mut self) {
        self.decoder.stop();
        self.session.surface().invalidate();
    }

    fn next_wakeup(&self) -> Option<Instant> {
        let driver = self.driver.as_ref().and_then(RenderDriver::next_deadline);
        let startup = self.startup.next_deadline();
        match (driver, startup) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }
}

impl ApplicationHandler for PlayerState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() || self.exit_requested {
            return;
        }

        if let Err(err) = self.realize_window(event_loop) {
            log::error!("{err:#}");
            self.decoder.stop();
            self.session.tear_down();
            self.fatal = Some(err);
            self.request_exit(event_loop);
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        let now = Instant::now();

        if let Some(command) = self.startup.poll(now) {
            self.start_playback(command);
        }

        if let Some(driver) = self.driver.as_mut() {
            match driver.tick(now) {
                Tick::Repaint { .. } => {
                    if let Some(window) = &self.window {
                        window.request_redraw();
                    }
                }
                Tick::Idle { .. } => {}
                Tick::Stopped => {
                    self.driver = None;
                    self.window = None;
                    self.request_exit(event_loop);
                    return;
                }
            }
        }

        match self.next_wakeup() {
            Some(deadline) => event_loop.set_control_flow(ControlFlow::WaitUntil(deadline)),
            None => event_loop.set_control_flow(ControlFlow::Wait),
        }
    }

    fn window_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.window.as_ref().map(Window::id) != Some(window_id) {
            return;
        }

        match event {
            WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                log::info!("window closing");
                self.begin_shutdown();
            }

            WindowEvent::Resized(size) => {
                self.resize.on_resized(size.into());
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(window) = &self.window {
                    self.resize.on_resized(window.inner_size().into());
                }
            }

            WindowEvent::RedrawRequested => self.redraw(),

            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.decoder.stop();
        self.session.tear_down();
        self.driver = None;
        self.window = None;
    }
}
