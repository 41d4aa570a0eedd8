//! YOLOv8 output decoding and non-maximum suppression.
//!
//! A YOLOv8 detection head emits one row of `4 + num_classes` values per
//! candidate: box center x/y, box width/height (in model input pixels) and one
//! score per class. Exports differ in layout, so three shapes are accepted:
//! `[1, 4 + C, N]` (ultralytics default), `[1, N, 4 + C]` and `[N, 4 + C]`.

use anyhow::{anyhow, Result};

use crate::detect::result::{BoundingBox, Detection};

/// IoU above which a lower-scoring box of the same class is suppressed.
pub const DEFAULT_IOU_THRESHOLD: f32 = 0.45;

/// Geometry and filtering for one decode call.
#[derive(Clone, Copy, Debug)]
pub struct DecodeParams {
    pub num_classes: usize,
    pub confidence_threshold: f32,
    pub input_width: u32,
    pub input_height: u32,
    pub frame_width: u32,
    pub frame_height: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Layout {
    /// Attributes are rows, candidates are columns.
    AttributesMajor,
    /// One row per candidate.
    CandidatesMajor,
}

/// Decode a raw output tensor into frame-space detections (before NMS).
pub fn decode_yolov8(data: &[f32], shape: &[usize], params: &DecodeParams) -> Result<Vec<Detection>> {
    let attrs = 4 + params.num_classes;
    let (layout, count) = match shape {
        [1, a, b] | [a, b] if *a == attrs => (Layout::AttributesMajor, *b),
        [1, a, b] | [a, b] if *b == attrs => (Layout::CandidatesMajor, *a),
        _ => {
            return Err(anyhow!(
                "unexpected YOLOv8 output shape {:?} for {} classes",
                shape,
                params.num_classes
            ))
        }
    };
    if data.len() < attrs * count {
        return Err(anyhow!(
            "YOLOv8 output has {} values, expected {}",
            data.len(),
            attrs * count
        ));
    }

    let value = |candidate: usize, attr: usize| match layout {
        Layout::AttributesMajor => data[attr * count + candidate],
        Layout::CandidatesMajor => data[candidate * attrs + attr],
    };

    let scale_x = params.frame_width as f32 / params.input_width.max(1) as f32;
    let scale_y = params.frame_height as f32 / params.input_height.max(1) as f32;
    let max_x = params.frame_width.saturating_sub(1) as f32;
    let max_y = params.frame_height.saturating_sub(1) as f32;

    let mut detections = Vec::new();
    for candidate in 0..count {
        let (class_id, score) = (0..params.num_classes)
            .map(|class| (class, value(candidate, 4 + class)))
            .fold((0usize, f32::NEG_INFINITY), |best, current| {
                if current.1 > best.1 {
                    current
                } else {
                    best
                }
            });
        if !score.is_finite() || score < params.confidence_threshold {
            continue;
        }

        let cx = value(candidate, 0);
        let cy = value(candidate, 1);
        let w = value(candidate, 2);
        let h = value(candidate, 3);

        let x1 = ((cx - w / 2.0) * scale_x).clamp(0.0, max_x);
        let y1 = ((cy - h / 2.0) * scale_y).clamp(0.0, max_y);
        let x2 = ((cx + w / 2.0) * scale_x).clamp(0.0, max_x);
        let y2 = ((cy + h / 2.0) * scale_y).clamp(0.0, max_y);

        detections.push(Detection::new(
            BoundingBox::new(x1 as i32, y1 as i32, x2 as i32, y2 as i32),
            class_id as u32,
            score.min(1.0),
        ));
    }

    Ok(detections)
}

/// Greedy per-class NMS. Output is sorted by descending confidence.
pub fn non_max_suppression(mut detections: Vec<Detection>, iou_threshold: f32) -> Vec<Detection> {
    detections.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

    let mut kept: Vec<Detection> = Vec::with_capacity(detections.len());
    for candidate in detections {
        let suppressed = kept.iter().any(|k| {
            k.class_id == candidate.class_id && k.bbox.iou(&candidate.bbox) > iou_threshold
        });
        if !suppressed {
            kept.push(candidate);
        }
    }
    kept
}
