//! Media reference handed to the decoder when playback starts.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Invalid media reference. Reported before any window or decoder exists.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("no media reference given")]
    Missing,

    #[error("media file not found: {}", .0.display())]
    NotFound(PathBuf),
}

/// A local path or a URI with a scheme (`rtsp://...`, `file:///...`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaRef {
    Path(PathBuf),
    Uri(String),
}

impl MediaRef {
    /// Parses an operator-supplied reference.
    ///
    /// URIs are passed through untouched; resolving them is the decoder's job.
    /// Local paths must exist.
    pub fn parse(input: &str) -> Result<Self, ConfigError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ConfigError::Missing);
        }

        if has_scheme(input) {
            return Ok(Self::Uri(input.to_string()));
        }

        let path = Path::new(input);
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        Ok(Self::Path(path.to_path_buf()))
    }
}

impl FromStr for MediaRef {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for MediaRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(path) => write!(f, "{}", path.display()),
            Self::Uri(uri) => f.write_str(uri),
        }
    }
}

/// RFC 3986 scheme followed by `://`. Single letters are rejected so that
/// `C://video.mp4` style Windows paths stay paths.
fn has_scheme(input: &str) -> bool {
    let Some((scheme, _)) = input.split_once("://") else {
        return false;
    };
    let mut chars = scheme.chars();
    scheme.len() > 1
        && chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}
