//! Object detection.
//!
//! The player treats detection as a black box behind the [`Detector`] trait:
//! a frame and a confidence threshold go in, a list of [`Detection`]s comes
//! out. Backends:
//! - `stub`: deterministic synthetic detections (default, testing)
//! - `tract`: YOLOv8 ONNX inference (feature: backend-tract)

use std::path::Path;

use anyhow::Result;

use crate::config::BackendKind;

mod backend;
mod backends;
pub mod classes;
pub mod postprocess;
mod result;

pub use backend::Detector;
pub use backends::StubBackend;
#[cfg(feature = "backend-tract")]
pub use backends::TractBackend;
pub use classes::{coco_class_name, COCO_CLASSES};
pub use result::{BoundingBox, Detection};

/// Build the detector selected by `kind`. `model` is only read by backends
/// that load a model file.
pub fn create_detector(kind: BackendKind, model: &Path) -> Result<Box<dyn Detector>> {
    match kind {
        BackendKind::Stub => {
            log::debug!("stub detector ignores model path {}", model.display());
            Ok(Box::new(StubBackend::new()))
        }
        #[cfg(feature = "backend-tract")]
        BackendKind::Tract => Ok(Box::new(TractBackend::new(model)?)),
        #[cfg(not(feature = "backend-tract"))]
        BackendKind::Tract => Err(anyhow::anyhow!(
            "the tract backend requires the backend-tract feature (model {})",
            model.display()
        )),
    }
}
