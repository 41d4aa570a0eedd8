//! Display surfaces.
//!
//! A renderer shows annotated frames and doubles as the keyboard input
//! channel: `poll_key` waits up to one frame period for a key press.
//!
//! - `headless` (default): no window; logs frames and sleeps out the wait
//! - `highgui` (feature: display-highgui): OpenCV window

use anyhow::Result;

use crate::config::RendererKind;
use crate::frame::Frame;

mod headless;
#[cfg(feature = "display-highgui")]
mod highgui;

pub use headless::HeadlessRenderer;
#[cfg(feature = "display-highgui")]
pub use highgui::HighGuiRenderer;

pub trait Renderer {
    fn name(&self) -> &'static str;

    /// Display `frame` in the window titled `window`.
    fn show(&mut self, window: &str, frame: &Frame) -> Result<()>;

    /// Wait up to `timeout_ms` for a key. Returns the raw key code, if any.
    fn poll_key(&mut self, timeout_ms: u64) -> Result<Option<i32>>;

    /// Close every window this renderer opened. Safe to call repeatedly.
    fn close_all(&mut self);
}

impl<T: Renderer + ?Sized> Renderer for Box<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn show(&mut self, window: &str, frame: &Frame) -> Result<()> {
        (**self).show(window, frame)
    }

    fn poll_key(&mut self, timeout_ms: u64) -> Result<Option<i32>> {
        (**self).poll_key(timeout_ms)
    }

    fn close_all(&mut self) {
        (**self).close_all()
    }
}

/// Build the renderer selected by `kind`.
pub fn create_renderer(kind: RendererKind) -> Result<Box<dyn Renderer>> {
    match kind {
        RendererKind::Headless => Ok(Box::new(HeadlessRenderer::new())),
        #[cfg(feature = "display-highgui")]
        RendererKind::Highgui => Ok(Box::new(HighGuiRenderer::new())),
        #[cfg(not(feature = "display-highgui"))]
        RendererKind::Highgui => Err(anyhow::anyhow!(
            "the highgui renderer requires the display-highgui feature"
        )),
    }
}
