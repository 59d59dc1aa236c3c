//! Decoder side of the bridge.
//!
//! A decoder owns a render thread that draws into the GL window through
//! [`EngineCallbacks`]. Real media engines plug in by implementing
//! [`Decoder`]; [`PatternDecoder`] is a built-in stand-in that renders a test
//! pattern.

mod pattern;

use std::sync::Arc;

use crate::bridge::EngineCallbacks;
use crate::media::MediaRef;

pub use pattern::{PatternConfig, PatternDecoder};

/// Errors reported by a decoder's own channel.
#[derive(Debug, thiserror::Error)]
pub enum DecoderError {
    #[error("decoder has no engine attached")]
    NotAttached,

    #[error("playback already started")]
    AlreadyPlaying,

    #[error("failed to spawn the decoder render thread")]
    Spawn(#[source] std::io::Error),
}

/// A decoder session driven by the GUI thread.
pub trait Decoder: Send {
    /// Gives the decoder the callbacks its render thread will use.
    fn attach(&mut self, engine: Arc<dyn EngineCallbacks>);

    /// Begins playback of `media`. Called at most once per session.
    fn play(&mut self, media: &MediaRef) -> Result<(), DecoderError>;

    /// Stops rendering and joins the render thread. Once this returns the
    /// decoder holds no GL context. Idempotent.
    fn stop(&mut self);
}
