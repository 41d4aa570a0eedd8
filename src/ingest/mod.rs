//! Frame sources.
//!
//! This module provides the sources the player pulls frames from:
//! - Local video files (feature: ingest-file-ffmpeg)
//! - Synthetic `stub://` streams (default, testing)
//!
//! A source is opened once, reports its `SessionInfo`, yields frames until it
//! runs dry and is then closed exactly once by its owner. Running dry is not an
//! error: `read` returns `Ok(None)`.

use anyhow::Result;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::frame::{Frame, SessionInfo};

pub mod file;
#[cfg(feature = "ingest-file-ffmpeg")]
pub(crate) mod file_ffmpeg;
mod synthetic;

pub use file::{FileSource, FileStats};

/// Scheme prefix for synthetic streams.
pub const STUB_SCHEME: &str = "stub://";

/// Startup failures when opening a video.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error(
        "video file {} not found! Please ensure the video file exists in the data directory.",
        .0.display()
    )]
    NotFound(PathBuf),

    #[error("could not open video file {}: {reason}", path.display())]
    OpenFailed { path: PathBuf, reason: String },
}

impl SourceError {
    pub fn open_failed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::OpenFailed {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Where the player gets its frames.
pub trait FrameSource {
    /// Metadata captured when the source was opened.
    fn session(&self) -> SessionInfo;

    /// Next frame, or `None` once the stream is exhausted (or closed).
    fn read(&mut self) -> Result<Option<Frame>>;

    /// Release the underlying decoder. Calling it more than once is harmless.
    fn close(&mut self);
}

impl<T: FrameSource + ?Sized> FrameSource for Box<T> {
    fn session(&self) -> SessionInfo {
        (**self).session()
    }

    fn read(&mut self) -> Result<Option<Frame>> {
        (**self).read()
    }

    fn close(&mut self) {
        (**self).close()
    }
}

/// Resolve a video argument against the data directory.
///
/// Absolute paths and `stub://` locations are returned unchanged; anything else
/// is taken relative to `data_dir`.
pub fn resolve_video_path(video: &str, data_dir: &Path) -> PathBuf {
    if video.starts_with(STUB_SCHEME) {
        return PathBuf::from(video);
    }
    let path = Path::new(video);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        data_dir.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_paths_land_in_data_dir() {
        let resolved = resolve_video_path("cars.mp4", Path::new("data"));
        assert_eq!(resolved, PathBuf::from("data/cars.mp4"));
    }

    #[test]
    fn absolute_and_stub_paths_are_untouched() {
        let resolved = resolve_video_path("/tmp/clip.mp4", Path::new("data"));
        assert_eq!(resolved, PathBuf::from("/tmp/clip.mp4"));

        let resolved = resolve_video_path("stub://cars?frames=3", Path::new("data"));
        assert_eq!(resolved, PathBuf::from("stub://cars?frames=3"));
    }

    #[test]
    fn not_found_message_names_the_path() {
        let err = SourceError::NotFound(PathBuf::from("data/missing.mp4"));
        assert!(err.to_string().contains("data/missing.mp4"));
        assert!(err.to_string().contains("not found"));
    }
}
