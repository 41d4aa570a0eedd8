use serde::Serialize;

/// Axis-aligned box in integer pixel coordinates, corners inclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct BoundingBox {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl BoundingBox {
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub fn width(&self) -> i32 {
        (self.x2 - self.x1).max(0)
    }

    pub fn height(&self) -> i32 {
        (self.y2 - self.y1).max(0)
    }

    pub fn area(&self) -> f32 {
        self.width() as f32 * self.height() as f32
    }

    /// Intersection over union. Zero when either box is empty.
    pub fn iou(&self, other: &BoundingBox) -> f32 {
        let ix1 = self.x1.max(other.x1);
        let iy1 = self.y1.max(other.y1);
        let ix2 = self.x2.min(other.x2);
        let iy2 = self.y2.min(other.y2);
        let inter = ((ix2 - ix1).max(0) as f32) * ((iy2 - iy1).max(0) as f32);
        let union = self.area() + other.area() - inter;
        if union <= 0.0 {
            0.0
        } else {
            inter / union
        }
    }
}

/// One detector output for a single frame.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Detection {
    pub bbox: BoundingBox,
    pub class_id: u32,
    /// In `[0, 1]`.
    pub confidence: f32,
}

impl Detection {
    pub fn new(bbox: BoundingBox, class_id: u32, confidence: f32) -> Self {
        Self {
            bbox,
            class_id,
            confidence,
        }
    }

    /// True when the detection should be kept at `threshold`.
    pub fn passes(&self, threshold: f32) -> bool {
        self.confidence >= threshold
    }

    /// Overlay label, e.g. `car 0.87`.
    pub fn label(&self, class_name: &str) -> String {
        format!("{} {:.2}", class_name, self.confidence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_uses_two_decimals() {
        let det = Detection::new(BoundingBox::new(0, 0, 10, 10), 2, 0.876);
        assert_eq!(det.label("car"), "car 0.88");
    }

    #[test]
    fn threshold_is_inclusive() {
        let det = Detection::new(BoundingBox::new(0, 0, 1, 1), 0, 0.5);
        assert!(det.passes(0.5));
        assert!(!det.passes(0.51));
    }

    #[test]
    fn iou_of_identical_and_disjoint_boxes() {
        let a = BoundingBox::new(0, 0, 10, 10);
        let b = BoundingBox::new(20, 20, 30, 30);
        assert!((a.iou(&a) - 1.0).abs() < f32::EPSILON);
        assert_eq!(a.iou(&b), 0.0);

        let half = BoundingBox::new(5, 0, 15, 10);
        assert!((a.iou(&half) - 50.0 / 150.0).abs() < 1e-6);
    }

    #[test]
    fn inverted_box_is_empty() {
        let inverted = BoundingBox::new(10, 10, 0, 0);
        assert_eq!(inverted.area(), 0.0);
        assert_eq!(inverted.iou(&inverted), 0.0);
    }
}
