use std::collections::BTreeSet;

use anyhow::{Context, Result};
use opencv::core::{Mat, Scalar, CV_8UC3};
use opencv::highgui;
use opencv::prelude::*;

use crate::frame::Frame;
use crate::render::Renderer;

/// OpenCV HighGUI window renderer.
pub struct HighGuiRenderer {
    windows: BTreeSet<String>,
}

impl HighGuiRenderer {
    pub fn new() -> Self {
        Self {
            windows: BTreeSet::new(),
        }
    }

    fn ensure_window(&mut self, window: &str) -> Result<()> {
        if !self.windows.contains(window) {
            highgui::named_window(window, highgui::WINDOW_AUTOSIZE)
                .with_context(|| format!("failed to create window '{}'", window))?;
            self.windows.insert(window.to_string());
        }
        Ok(())
    }
}

impl Default for HighGuiRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Copy an RGB frame into a BGR `Mat`, OpenCV's native channel order.
fn to_bgr_mat(frame: &Frame) -> Result<Mat> {
    let mut mat = Mat::new_rows_cols_with_default(
        frame.height() as i32,
        frame.width() as i32,
        CV_8UC3,
        Scalar::all(0.0),
    )
    .context("failed to allocate display buffer")?;
    let dst = mat.data_bytes_mut().context("display buffer is not continuous")?;
    for (out, px) in dst.chunks_exact_mut(3).zip(frame.as_rgb().chunks_exact(3)) {
        out[0] = px[2];
        out[1] = px[1];
        out[2] = px[0];
    }
    Ok(mat)
}

impl Renderer for HighGuiRenderer {
    fn name(&self) -> &'static str {
        "highgui"
    }

    fn show(&mut self, window: &str, frame: &Frame) -> Result<()> {
        self.ensure_window(window)?;
        let mat = to_bgr_mat(frame)?;
        highgui::imshow(window, &mat).context("imshow failed")?;
        Ok(())
    }

    fn poll_key(&mut self, timeout_ms: u64) -> Result<Option<i32>> {
        let timeout = timeout_ms.clamp(1, i32::MAX as u64) as i32;
        let key = highgui::wait_key(timeout).context("wait_key failed")?;
        Ok((key >= 0).then_some(key))
    }

    fn close_all(&mut self) {
        if self.windows.is_empty() {
            return;
        }
        if let Err(err) = highgui::destroy_all_windows() {
            log::warn!("failed to destroy windows: {}", err);
        }
        self.windows.clear();
    }
}
