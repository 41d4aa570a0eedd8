#![cfg(feature = "backend-tract")]

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use image::imageops::FilterType;
use tract_onnx::prelude::*;

use crate::detect::backend::Detector;
use crate::detect::classes::{coco_class_name, COCO_CLASSES};
use crate::detect::postprocess::{
    decode_yolov8, non_max_suppression, DecodeParams, DEFAULT_IOU_THRESHOLD,
};
use crate::detect::result::Detection;
use crate::frame::Frame;

/// Square input size of exported YOLOv8 models.
pub const YOLOV8_INPUT_SIZE: u32 = 640;

/// Tract-based backend for YOLOv8 ONNX inference.
///
/// Loads a local model file once and runs it on every frame. Frames are
/// resized (not letterboxed) to the model input; boxes are scaled back to the
/// frame afterwards.
pub struct TractBackend {
    model: SimplePlan<TypedFact, Box<dyn TypedOp>, TypedModel>,
    input_size: u32,
}

impl TractBackend {
    /// Load an ONNX model from disk and prepare it for inference.
    pub fn new<P: AsRef<Path>>(model_path: P) -> Result<Self> {
        let model_path = model_path.as_ref();
        if !model_path.exists() {
            return Err(anyhow!("model file {} not found", model_path.display()));
        }
        let size = YOLOV8_INPUT_SIZE as usize;
        let model = tract_onnx::onnx()
            .model_for_path(model_path)
            .with_context(|| format!("failed to load ONNX model from {}", model_path.display()))?
            .with_input_fact(
                0,
                InferenceFact::dt_shape(f32::datum_type(), tvec!(1, 3, size, size)),
            )
            .context("failed to set input fact")?
            .into_optimized()
            .context("failed to optimize ONNX model")?
            .into_runnable()
            .context("failed to build runnable ONNX model")?;

        Ok(Self {
            model,
            input_size: YOLOV8_INPUT_SIZE,
        })
    }

    fn build_input(&self, frame: &Frame) -> Tensor {
        let size = self.input_size;
        let resized = image::imageops::resize(frame.image(), size, size, FilterType::Triangle);
        let size = size as usize;
        tract_ndarray::Array4::from_shape_fn((1, 3, size, size), |(_, channel, y, x)| {
            resized.get_pixel(x as u32, y as u32)[channel] as f32 / 255.0
        })
        .into_tensor()
    }
}

impl Detector for TractBackend {
    fn name(&self) -> &'static str {
        "tract"
    }

    fn detect(&mut self, frame: &Frame, confidence_threshold: f32) -> Result<Vec<Detection>> {
        let input = self.build_input(frame);
        let outputs = self
            .model
            .run(tvec!(input.into()))
            .context("ONNX inference failed")?;
        let output = outputs
            .first()
            .ok_or_else(|| anyhow!("model produced no outputs"))?;
        let view = output
            .to_array_view::<f32>()
            .context("model output tensor was not f32")?;
        let shape = view.shape().to_vec();
        let data: Vec<f32> = view.iter().copied().collect();

        let params = DecodeParams {
            num_classes: COCO_CLASSES.len(),
            confidence_threshold,
            input_width: self.input_size,
            input_height: self.input_size,
            frame_width: frame.width(),
            frame_height: frame.height(),
        };
        let candidates = decode_yolov8(&data, &shape, &params)?;
        let before = candidates.len();
        let detections = non_max_suppression(candidates, DEFAULT_IOU_THRESHOLD);
        log::debug!(
            "tract: frame {} -> {} candidates, {} after NMS",
            frame.index(),
            before,
            detections.len()
        );
        Ok(detections)
    }

    fn class_name(&self, class_id: u32) -> &str {
        coco_class_name(class_id)
    }

    fn warm_up(&mut self) -> Result<()> {
        let blank = Frame::filled(self.input_size, self.input_size, [114, 114, 114], 0);
        self.detect(&blank, 1.0).map(|_| ())
    }
}
