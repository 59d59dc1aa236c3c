use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::bridge::{EngineCallbacks, WindowSizeHandle};
use crate::gl::GlFunctions;
use crate::media::MediaRef;

use super::{Decoder, DecoderError};

/// Pattern decoder configuration.
#[derive(Debug, Clone)]
pub struct PatternConfig {
    /// Target time between presented frames.
    pub frame_interval: Duration,

    /// Seconds for one full trip around the colour wheel.
    pub cycle_secs: f32,
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            frame_interval: Duration::from_millis(16),
            cycle_secs: 6.0,
        }
    }
}

struct Worker {
    stop: Arc<AtomicBool>,
    thread: JoinHandle<()>,
}

/// Stand-in decoder: a render thread that follows the full bridge protocol
/// (bind size handle, resolve entry points, acquire, draw, swap, release) and
/// clears each frame to a colour that cycles over time.
pub struct PatternDecoder {
    config: PatternConfig,
    engine: Option<Arc<dyn EngineCallbacks>>,
    worker: Option<Worker>,
}

impl PatternDecoder {
    pub fn new(config: PatternConfig) -> Self {
        Self {
            config,
            engine: None,
            worker: None,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.worker.is_some()
    }
}

impl Decoder for PatternDecoder {
    fn attach(&mut self, engine: Arc<dyn EngineCallbacks>) {
        self.engine = Some(engine);
    }

    fn play(&mut self, media: &MediaRef) -> Result<(), DecoderError> {
        let engine = self.engine.clone().ok_or(DecoderError::NotAttached)?;
        if self.worker.is_some() {
            return Err(DecoderError::AlreadyPlaying);
        }

        let stop = Arc::new(AtomicBool::new(false));
        let thread = thread::Builder::new()
            .name("pattern-render".to_string())
            .spawn({
                let stop = Arc::clone(&stop);
                let config = self.config.clone();
                move || render_loop(engine, config, stop)
            })
            .map_err(DecoderError::Spawn)?;

        log::info!("pattern decoder playing {media}");
        self.worker = Some(Worker { stop, thread });
        Ok(())
    }

    fn stop(&mut self) {
        let Some(worker) = self.worker.take() else {
            return;
        };
        worker.stop.store(true, Ordering::Release);
        if worker.thread.join().is_err() {
            log::error!("pattern render thread panicked");
        }
    }
}

impl Drop for PatternDecoder {
    fn drop(&mut self) {
        self.stop();
    }
}

fn render_loop(engine: Arc<dyn EngineCallbacks>, config: PatternConfig, stop: Arc<AtomicBool>) {
    let size = WindowSizeHandle::new();
    engine.bind_window_callback(size.clone());

    let started = Instant::now();
    let mut gl: Option<GlFunctions> = None;
    let mut gl_missing_logged = false;
    let mut viewport_seen = None;
    let mut frames: u64 = 0;
    let mut skipped: u64 = 0;

    while !stop.load(Ordering::Acquire) {
        let frame_start = Instant::now();

        if engine.acquire_context(true) {
            if gl.is_none() {
                gl = GlFunctions::load(|name| engine.resolve_function(name));
                if gl.is_none() && !gl_missing_logged {
                    log::warn!("pattern decoder: GL entry points unavailable; presenting without drawing");
                    gl_missing_logged = true;
                }
            }

            if let Some(gl) = &gl {
                let updates = size.updates();
                // SAFETY: between a successful acquire and the matching release.
                unsafe {
                    if viewport_seen != Some(updates) {
                        if let Some(target) = size.size() {
                            gl.viewport(target);
                        }
                        viewport_seen = Some(updates);
                    }
                    gl.set_clear_color(pattern_color(started.elapsed(), config.cycle_secs));
                    gl.clear();
                }
            }

            engine.swap();
            engine.acquire_context(false);
            frames += 1;
        } else {
            skipped += 1;
        }

        if let Some(rest) = config.frame_interval.checked_sub(frame_start.elapsed()) {
            thread::sleep(rest);
        }
    }

    log::info!("pattern decoder stopped after {frames} frames ({skipped} skipped)");
}

/// Fully saturated hue for `elapsed`, as opaque RGBA.
fn pattern_color(elapsed: Duration, cycle_secs: f32) -> [f32; 4] {
    let cycle = cycle_secs.max(f32::EPSILON);
    let hue = (elapsed.as_secs_f32() / cycle).fract() * 6.0;
    let x = 1.0 - (hue % 2.0 - 1.0).abs();

    let (r, g, b) = match hue as u32 {
        0 => (1.0, x, 0.0),
        1 => (x, 1.0, 0.0),
        2 => (0.0, 1.0, x),
        3 => (0.0, x, 1.0),
        4 => (x, 0.0, 1.0),
        _ => (1.0, 0.0, x),
    };
    [r, g, b, 1.0]
}
