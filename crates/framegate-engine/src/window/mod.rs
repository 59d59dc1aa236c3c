//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and the GL window, and wires window events to
//! the session's GUI-side components.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig};
pub use winit::dpi::LogicalSize;
