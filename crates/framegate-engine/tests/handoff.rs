//! Drives a real decoder render thread against a session on the test thread,
//! which plays the GUI thread's part.

use std::ffi::{CStr, c_void};
use std::ptr;
use std::sync::Arc;
use std::thread::{self, ThreadId};
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use framegate_engine::decoder::{Decoder, PatternConfig, PatternDecoder};
use framegate_engine::driver::{RenderDriver, RenderPass, Tick};
use framegate_engine::media::MediaRef;
use framegate_engine::resize::ResizeCoordinator;
use framegate_engine::session::{Session, SessionState};
use framegate_engine::startup::{StartTrigger, StartupSequencer};
use framegate_engine::surface::{NativeContext, NativeError, SurfaceSize};

#[derive(Default)]
struct Driver {
    current_on: Option<ThreadId>,
    swaps_by: Vec<ThreadId>,
    swaps_while_not_current: usize,
}

/// Native context that checks the one-thread-at-a-time rule itself.
struct StrictContext {
    state: Arc<Mutex<Driver>>,
}

impl NativeContext for StrictContext {
    fn make_current(&mut self) -> Result<(), NativeError> {
        let mut state = self.state.lock();
        let me = thread::current().id();
        if state.current_on.is_some_and(|t| t != me) {
            return Err(NativeError::new("make_current", "current on another thread"));
        }
        state.current_on = Some(me);
        Ok(())
    }

    fn make_not_current(&mut self) -> Result<(), NativeError> {
        self.state.lock().current_on = None;
        Ok(())
    }

    fn swap_buffers(&mut self) -> Result<(), NativeError> {
        let mut state = self.state.lock();
        let me = thread::current().id();
        if state.current_on != Some(me) {
            state.swaps_while_not_current += 1;
        }
        state.swaps_by.push(me);
        Ok(())
    }

    fn resize(&mut self, _size: SurfaceSize) {}

    fn proc_address(&self, _name: &CStr) -> *const c_void {
        ptr::null()
    }
}

fn wait_until(what: &str, mut cond: impl FnMut() -> bool) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while !cond() {
        assert!(Instant::now() < deadline, "timed out waiting for {what}");
        thread::sleep(Duration::from_millis(2));
    }
}

#[test]
fn decoder_thread_and_gui_thread_share_the_context_safely() {
    let t0 = Instant::now();
    let driver_state = Arc::new(Mutex::new(Driver::default()));

    let session = Arc::new(Session::new());
    let mut decoder = PatternDecoder::new(PatternConfig {
        frame_interval: Duration::from_millis(1),
        ..PatternConfig::default()
    });
    decoder.attach(session.clone());
    session.decoder_attached();

    let mut startup = StartupSequencer::new(
        MediaRef::Uri("test://pattern".to_string()),
        Some(Duration::from_secs(60)),
        t0,
    );

    // Window realized at 800x800; the driver's first iteration proves the context.
    session.realize(
        Box::new(StrictContext {
            state: Arc::clone(&driver_state),
        }),
        SurfaceSize::new(800, 800),
    );
    let mut driver = RenderDriver::new(Arc::clone(&session), Duration::from_millis(50), t0);
    let resize = ResizeCoordinator::new(Arc::clone(&session));

    assert!(matches!(driver.tick(t0), Tick::Repaint { .. }));
    assert_eq!(driver.render_pass(), RenderPass::Completed { activated: true });
    assert_eq!(session.state(), SessionState::Active);

    let command = startup.on_context_ready().expect("playback gated on readiness");
    assert_eq!(command.trigger, StartTrigger::ContextReady);
    decoder.play(&command.media).unwrap();
    assert!(startup.on_context_ready().is_none());

    // The decoder binds its handle and receives the current size.
    wait_until("size handle bind", || session.bound_handle().is_some());
    let handle = session.bound_handle().unwrap();
    assert_eq!(handle.size(), Some(SurfaceSize::new(800, 800)));

    // GUI keeps ticking while the decoder renders.
    let mut completed = 0;
    let mut now = t0;
    for _ in 0..20 {
        now += Duration::from_millis(50);
        if let Tick::Repaint { .. } = driver.tick(now) {
            if let RenderPass::Completed { .. } = driver.render_pass() {
                completed += 1;
            }
        }
        thread::sleep(Duration::from_millis(1));
    }
    assert!(driver.passes() >= 1 + completed);

    resize.on_resized(SurfaceSize::new(400, 300));
    assert_eq!(handle.size(), Some(SurfaceSize::new(400, 300)));

    wait_until("decoder frames", || driver_state.lock().swaps_by.len() >= 10);

    // Window closes: decoder stops first, then the surface dies.
    decoder.stop();
    session.surface().invalidate();
    assert_eq!(driver.tick(now + Duration::from_millis(50)), Tick::Stopped);
    assert_eq!(driver.tick(now + Duration::from_millis(100)), Tick::Stopped);
    assert_eq!(session.state(), SessionState::TornDown);

    let state = driver_state.lock();
    assert_eq!(state.swaps_while_not_current, 0);
    assert!(state.current_on.is_none());
    let gui = thread::current().id();
    assert!(state.swaps_by.iter().all(|t| *t != gui), "the GUI thread never presents");
}
