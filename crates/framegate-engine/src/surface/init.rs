/// Initialization parameters for the GL layer.
///
/// Keep this minimal; add flags only when a backend requires one.
#[derive(Debug, Clone)]
pub struct GlInit {
    /// Block `swap_buffers` on vertical sync.
    ///
    /// Off by default: the decoder paces its own presentation, and a blocking
    /// swap would hold the context longer than the frame needs.
    pub vsync: bool,

    /// Requested alpha channel bits for the config.
    pub alpha_size: u8,

    /// Retry with an OpenGL ES context when desktop GL creation fails.
    pub gles_fallback: bool,
}

impl Default for GlInit {
    fn default() -> Self {
        Self {
            vsync: false,
            alpha_size: 8,
            gles_fallback: true,
        }
    }
}
