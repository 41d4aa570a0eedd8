use anyhow::Result;

use crate::detect::backend::Detector;
use crate::detect::classes::coco_class_name;
use crate::detect::result::{BoundingBox, Detection};
use crate::frame::Frame;

const CAR: u32 = 2;
const PERSON: u32 = 0;
const TRUCK: u32 = 7;

/// Stub backend for testing and model-free runs.
///
/// Output depends only on the frame index and size: a car drifting left to
/// right at 0.90, a person whose confidence alternates between 0.62 and 0.41,
/// and a parked truck at 0.30 that only shows up at low thresholds.
#[derive(Debug, Default)]
pub struct StubBackend {
    calls: u64,
}

impl StubBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `detect` calls so far.
    pub fn calls(&self) -> u64 {
        self.calls
    }

    fn candidates(frame: &Frame) -> Vec<Detection> {
        let w = frame.width() as i32;
        let h = frame.height() as i32;
        let index = frame.index();

        let car_w = (w / 5).max(1);
        let car_h = (h / 5).max(1);
        let travel = (w - car_w).max(1) as u64;
        let car_x = ((index * 8) % travel) as i32;
        let car_y = h / 2 - car_h / 2;

        let person_conf = if index % 2 == 0 { 0.62 } else { 0.41 };

        vec![
            Detection::new(
                BoundingBox::new(car_x, car_y, car_x + car_w, car_y + car_h),
                CAR,
                0.90,
            ),
            Detection::new(
                BoundingBox::new(w / 8, h / 4, w / 8 + w / 16, h / 4 + h / 3),
                PERSON,
                person_conf,
            ),
            Detection::new(
                BoundingBox::new(w - w / 4, h - h / 4, w - 4, h - 4),
                TRUCK,
                0.30,
            ),
        ]
    }
}

impl Detector for StubBackend {
    fn name(&self) -> &'static str {
        "stub"
    }

    fn detect(&mut self, frame: &Frame, confidence_threshold: f32) -> Result<Vec<Detection>> {
        self.calls += 1;
        Ok(Self::candidates(frame)
            .into_iter()
            .filter(|d| d.passes(confidence_threshold))
            .collect())
    }

    fn class_name(&self, class_id: u32) -> &str {
        coco_class_name(class_id)
    }
}
