use std::time::Duration;

use anyhow::Result;

use crate::frame::Frame;
use crate::render::Renderer;

/// Renderer without a window. Frames are logged at debug level, the key wait
/// is slept out in real time and no key is ever reported.
#[derive(Debug)]
pub struct HeadlessRenderer {
    realtime: bool,
    frames_shown: u64,
    closed: bool,
}

impl HeadlessRenderer {
    pub fn new() -> Self {
        Self {
            realtime: true,
            frames_shown: 0,
            closed: false,
        }
    }

    /// Skip the sleep in `poll_key`, for tests and batch runs.
    pub fn without_delay(mut self) -> Self {
        self.realtime = false;
        self
    }

    pub fn frames_shown(&self) -> u64 {
        self.frames_shown
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl Default for HeadlessRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for HeadlessRenderer {
    fn name(&self) -> &'static str {
        "headless"
    }

    fn show(&mut self, window: &str, frame: &Frame) -> Result<()> {
        self.frames_shown += 1;
        log::debug!(
            "[{}] frame {} ({}x{})",
            window,
            frame.index(),
            frame.width(),
            frame.height()
        );
        Ok(())
    }

    fn poll_key(&mut self, timeout_ms: u64) -> Result<Option<i32>> {
        if self.realtime {
            std::thread::sleep(Duration::from_millis(timeout_ms));
        }
        Ok(None)
    }

    fn close_all(&mut self) {
        if !self.closed {
            self.closed = true;
            log::debug!("headless renderer closed after {} frames", self.frames_shown);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_frames_and_never_reports_keys() -> Result<()> {
        let mut renderer = HeadlessRenderer::new().without_delay();
        let frame = Frame::filled(4, 4, [0, 0, 0], 0);
        renderer.show("test", &frame)?;
        renderer.show("test", &frame)?;
        assert_eq!(renderer.frames_shown(), 2);
        assert_eq!(renderer.poll_key(5)?, None);
        Ok(())
    }

    #[test]
    fn close_is_idempotent() {
        let mut renderer = HeadlessRenderer::default();
        renderer.close_all();
        renderer.close_all();
        assert!(renderer.is_closed());
    }

    #[test]
    fn realtime_poll_waits() -> Result<()> {
        let mut renderer = HeadlessRenderer::new();
        let start = std::time::Instant::now();
        renderer.poll_key(20)?;
        assert!(start.elapsed() >= Duration::from_millis(20));
        Ok(())
    }
}
