use anyhow::{Context, Result};

use crate::annotate::{Annotator, Palette};
use crate::config::{PlayerConfig, RendererKind};
use crate::detect::{create_detector, Detector};
use crate::ingest::FileSource;
use crate::playback::player::Player;
use crate::playback::speed::SpeedController;
use crate::render::Renderer;

/// Player over a file source with a configured detector.
pub type FilePlayer<R> = Player<FileSource, Box<dyn Detector>, R>;

/// Open the video, build the detector, then create the render surface, in that
/// order. A missing or unreadable video fails before `make_renderer` runs, so
/// no window is ever opened for a bad path.
pub fn prepare_player<R, F>(cfg: &PlayerConfig, make_renderer: F) -> Result<FilePlayer<R>>
where
    R: Renderer,
    F: FnOnce(RendererKind) -> Result<R>,
{
    let video_path = cfg.video_path();
    let source = FileSource::open(&video_path)?;

    let mut detector = create_detector(cfg.backend, &cfg.model_path())?;
    detector
        .warm_up()
        .with_context(|| format!("detector '{}' failed to warm up", detector.name()))?;

    let renderer = make_renderer(cfg.renderer)?;
    log::info!(
        "playing {} with {} detector on {} renderer",
        video_path.display(),
        detector.name(),
        renderer.name()
    );

    Ok(Player::new(source, detector, renderer)
        .with_annotator(Annotator::new(Palette::new(cfg.palette_seed)))
        .with_speed(SpeedController::with_speed(cfg.speed))
        .with_threshold(cfg.threshold)
        .with_window(cfg.window.clone()))
}
