/// Failure to bring up a GL context for a window. Fatal to the session.
#[derive(Debug, thiserror::Error)]
pub enum ContextCreationError {
    #[error("no compatible GL config for this window: {0}")]
    Config(String),

    #[error("window handle unavailable: {0}")]
    WindowHandle(String),

    #[error("failed to create GL context")]
    Context(#[source] glutin::error::Error),

    #[error("failed to create GL window surface")]
    Surface(#[source] glutin::error::Error),
}

/// A native context operation that failed after creation.
///
/// These never leave the surface layer as errors; callers see `false`.
#[derive(Debug, thiserror::Error)]
#[error("{op} failed: {message}")]
pub struct NativeError {
    pub op: &'static str,
    pub message: String,
}

impl NativeError {
    pub fn new(op: &'static str, err: impl std::fmt::Display) -> Self {
        Self {
            op,
            message: err.to_string(),
        }
    }
}
