//! Framegate engine crate.
//!
//! Lets a decoder render thread borrow the OpenGL context of a window that is
//! owned and driven by the GUI event loop, without copying pixels in between.

pub mod bridge;
pub mod decoder;
pub mod driver;
pub mod gl;
pub mod media;
pub mod resize;
pub mod session;
pub mod startup;
pub mod surface;
pub mod time;
pub mod window;

pub mod logging;

#[cfg(test)]
mod test_support;
