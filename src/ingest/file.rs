//! Local file frame source.
//!
//! `FileSource` opens a video by location and hands out decoded RGB frames.
//! Two backends sit behind it:
//! - `stub://name?frames=N&fps=F&width=W&height=H` synthetic streams
//! - FFmpeg decoding of real files (feature: ingest-file-ffmpeg)
//!
//! Opening fails fast with `SourceError::NotFound` when a real path does not
//! exist, and with `SourceError::OpenFailed` when it exists but cannot be
//! decoded. Both checks happen before any frame is read.

use anyhow::Result;
use std::path::Path;

#[cfg(feature = "ingest-file-ffmpeg")]
use super::file_ffmpeg::FfmpegFileSource;
use super::synthetic::SyntheticSource;
use super::{FrameSource, SourceError, STUB_SCHEME};
use crate::frame::{Frame, SessionInfo};

/// Local file frame source.
pub struct FileSource {
    location: String,
    session: SessionInfo,
    backend: Option<FileBackend>,
    frames_read: u64,
}

enum FileBackend {
    Synthetic(SyntheticSource),
    #[cfg(feature = "ingest-file-ffmpeg")]
    Ffmpeg(FfmpegFileSource),
}

impl FileSource {
    /// Open a video file or synthetic stream.
    pub fn open(path: &Path) -> Result<Self, SourceError> {
        let location = path.to_string_lossy().into_owned();
        if location.trim().is_empty() {
            return Err(SourceError::NotFound(path.to_path_buf()));
        }

        let backend = if let Some(descriptor) = location.strip_prefix(STUB_SCHEME) {
            let source = SyntheticSource::parse(descriptor)
                .map_err(|e| SourceError::open_failed(path, format!("{e:#}")))?;
            FileBackend::Synthetic(source)
        } else {
            if location.contains("://") {
                return Err(SourceError::open_failed(
                    path,
                    "only local files are supported (no URL schemes)",
                ));
            }
            if !path.exists() {
                return Err(SourceError::NotFound(path.to_path_buf()));
            }
            open_decoder(path)?
        };

        let session = match &backend {
            FileBackend::Synthetic(source) => source.session(),
            #[cfg(feature = "ingest-file-ffmpeg")]
            FileBackend::Ffmpeg(source) => source.session(),
        };
        log::debug!("FileSource: opened {} ({})", location, session);

        Ok(Self {
            location,
            session,
            backend: Some(backend),
            frames_read: 0,
        })
    }

    /// True until `close` has been called.
    pub fn is_open(&self) -> bool {
        self.backend.is_some()
    }

    /// Get frame statistics.
    pub fn stats(&self) -> FileStats {
        FileStats {
            frames_read: self.frames_read,
            location: self.location.clone(),
        }
    }
}

#[cfg(feature = "ingest-file-ffmpeg")]
fn open_decoder(path: &Path) -> Result<FileBackend, SourceError> {
    FfmpegFileSource::open(path)
        .map(FileBackend::Ffmpeg)
        .map_err(|e| SourceError::open_failed(path, format!("{e:#}")))
}

#[cfg(not(feature = "ingest-file-ffmpeg"))]
fn open_decoder(path: &Path) -> Result<FileBackend, SourceError> {
    Err(SourceError::open_failed(
        path,
        "decoding video files requires the ingest-file-ffmpeg feature",
    ))
}

impl FrameSource for FileSource {
    fn session(&self) -> SessionInfo {
        self.session
    }

    fn read(&mut self) -> Result<Option<Frame>> {
        let frame = match &mut self.backend {
            None => return Ok(None),
            Some(FileBackend::Synthetic(source)) => source.next_frame()?,
            #[cfg(feature = "ingest-file-ffmpeg")]
            Some(FileBackend::Ffmpeg(source)) => source.next_frame()?,
        };
        if frame.is_some() {
            self.frames_read += 1;
        }
        Ok(frame)
    }

    fn close(&mut self) {
        if self.backend.take().is_some() {
            log::info!(
                "FileSource: released {} after {} frames",
                self.location,
                self.frames_read
            );
        }
    }
}

impl Drop for FileSource {
    fn drop(&mut self) {
        self.close();
    }
}

/// Statistics for a file source.
#[derive(Clone, Debug)]
pub struct FileStats {
    pub frames_read: u64,
    pub location: String,
}
