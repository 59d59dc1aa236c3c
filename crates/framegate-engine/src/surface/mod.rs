//! OpenGL context surface.
//!
//! This module is responsible for:
//! - creating the native GL context bound to a window (glutin backend)
//! - tracking which thread currently holds that context
//! - presenting, resizing and tearing the surface down

mod context;
mod error;
mod init;
mod native;
mod size;

pub use context::{ContextSurface, NativeContext};
pub use error::{ContextCreationError, NativeError};
pub use init::GlInit;
pub use native::GlutinContext;
pub use size::SurfaceSize;
