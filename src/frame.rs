//! Frames and session metadata.
//!
//! - `Frame`: one decoded RGB picture plus its position in the stream. Owned by
//!   the player for exactly one iteration and mutated in place by the annotator.
//! - `SessionInfo`: width, height and FPS reported by a source when it opens.

use anyhow::{anyhow, Result};
use image::RgbImage;

// ----------------------------------------------------------------------------
// Frame: mutable pixel buffer for one iteration
// ----------------------------------------------------------------------------

/// A decoded RGB frame.
///
/// Frames are not `Clone`: the player hands the only copy to the annotator by
/// `&mut` and drops it after the renderer has shown it.
pub struct Frame {
    image: RgbImage,
    index: u64,
}

impl Frame {
    /// Wrap an already decoded image.
    pub fn new(image: RgbImage, index: u64) -> Self {
        Self { image, index }
    }

    /// Build a frame from tightly packed RGB24 bytes.
    pub fn from_rgb(pixels: Vec<u8>, width: u32, height: u32, index: u64) -> Result<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(3))
            .ok_or_else(|| anyhow!("frame dimensions overflow"))?;
        if pixels.len() != expected {
            return Err(anyhow!(
                "RGB frame length mismatch: expected {}, got {}",
                expected,
                pixels.len()
            ));
        }
        let image = RgbImage::from_raw(width, height, pixels)
            .ok_or_else(|| anyhow!("RGB buffer does not fit {}x{}", width, height))?;
        Ok(Self { image, index })
    }

    /// Solid-colored frame, mostly useful for tests and synthetic sources.
    pub fn filled(width: u32, height: u32, rgb: [u8; 3], index: u64) -> Self {
        Self {
            image: RgbImage::from_pixel(width, height, image::Rgb(rgb)),
            index,
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Zero-based position of this frame in its stream.
    pub fn index(&self) -> u64 {
        self.index
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    pub fn image_mut(&mut self) -> &mut RgbImage {
        &mut self.image
    }

    /// Packed RGB24 bytes, row-major.
    pub fn as_rgb(&self) -> &[u8] {
        self.image.as_raw()
    }

    /// Pixel at (x, y), or `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x < self.width() && y < self.height() {
            Some(self.image.get_pixel(x, y).0)
        } else {
            None
        }
    }
}

impl std::fmt::Debug for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Frame")
            .field("index", &self.index)
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}

// ----------------------------------------------------------------------------
// SessionInfo: metadata read once at open
// ----------------------------------------------------------------------------

/// Properties of an opened video, fixed for the whole session.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SessionInfo {
    pub width: u32,
    pub height: u32,
    /// Frames per second as reported by the container. May be zero or NaN for
    /// broken files; the frame timer deals with that.
    pub fps: f64,
}

impl std::fmt::Display for SessionInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{} @ {}fps", self.width, self.height, self.fps)
    }
}
