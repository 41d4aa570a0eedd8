//! Synthetic `stub://` stream.
//!
//! Produces a deterministic moving gradient so the whole pipeline can run
//! without a decoder. Query parameters tune the stream:
//! `stub://name?frames=90&fps=30&width=640&height=360`.

use anyhow::{anyhow, Result};

use crate::frame::{Frame, SessionInfo};

const DEFAULT_FRAMES: u64 = 90;
const DEFAULT_FPS: f64 = 30.0;
const DEFAULT_WIDTH: u32 = 640;
const DEFAULT_HEIGHT: u32 = 360;

pub(crate) struct SyntheticSource {
    name: String,
    total_frames: u64,
    fps: f64,
    width: u32,
    height: u32,
    next_index: u64,
}

impl SyntheticSource {
    /// Parse everything after `stub://`.
    pub(crate) fn parse(descriptor: &str) -> Result<Self> {
        let (name, query) = match descriptor.split_once('?') {
            Some((name, query)) => (name, Some(query)),
            None => (descriptor, None),
        };
        let mut source = Self {
            name: name.to_string(),
            total_frames: DEFAULT_FRAMES,
            fps: DEFAULT_FPS,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            next_index: 0,
        };

        for pair in query.unwrap_or_default().split('&') {
            if pair.is_empty() {
                continue;
            }
            let (key, value) = pair
                .split_once('=')
                .ok_or_else(|| anyhow!("stub parameter '{}' has no value", pair))?;
            match key {
                "frames" => source.total_frames = parse_value(key, value)?,
                "fps" => source.fps = parse_value(key, value)?,
                "width" => source.width = parse_value(key, value)?,
                "height" => source.height = parse_value(key, value)?,
                other => return Err(anyhow!("unknown stub parameter '{}'", other)),
            }
        }

        if source.width == 0 || source.height == 0 {
            return Err(anyhow!("stub frame size must be non-zero"));
        }
        Ok(source)
    }

    pub(crate) fn session(&self) -> SessionInfo {
        SessionInfo {
            width: self.width,
            height: self.height,
            fps: self.fps,
        }
    }

    pub(crate) fn next_frame(&mut self) -> Result<Option<Frame>> {
        if self.next_index >= self.total_frames {
            return Ok(None);
        }
        let index = self.next_index;
        self.next_index += 1;

        let pixels = self.generate_pixels(index);
        let frame = Frame::from_rgb(pixels, self.width, self.height, index)?;
        log::trace!("stub://{}: generated frame {}", self.name, index);
        Ok(Some(frame))
    }

    fn generate_pixels(&self, index: u64) -> Vec<u8> {
        let width = self.width as u64;
        let height = self.height as u64;
        let mut pixels = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.push(((x + index * 4) % 256) as u8);
                pixels.push((y * 255 / height.max(1)) as u8);
                pixels.push(96);
            }
        }
        pixels
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| anyhow!("stub parameter '{}' has invalid value '{}'", key, value))
}
