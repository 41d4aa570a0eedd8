use anyhow::Result;

use crate::detect::result::Detection;
use crate::frame::Frame;

/// Detector backend trait.
///
/// `detect` is synchronous and may be slow; the player calls it once per frame
/// and waits for it. There is no timeout: a detector that hangs stalls
/// playback.
pub trait Detector {
    /// Backend identifier.
    fn name(&self) -> &'static str;

    /// Run detection on a frame, keeping only results with
    /// `confidence >= confidence_threshold`.
    fn detect(&mut self, frame: &Frame, confidence_threshold: f32) -> Result<Vec<Detection>>;

    /// Human readable name for a class id.
    fn class_name(&self, class_id: u32) -> &str;

    /// Optional warm-up hook.
    fn warm_up(&mut self) -> Result<()> {
        Ok(())
    }
}

impl<T: Detector + ?Sized> Detector for Box<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn detect(&mut self, frame: &Frame, confidence_threshold: f32) -> Result<Vec<Detection>> {
        (**self).detect(frame, confidence_threshold)
    }

    fn class_name(&self, class_id: u32) -> &str {
        (**self).class_name(class_id)
    }

    fn warm_up(&mut self) -> Result<()> {
        (**self).warm_up()
    }
}
