use std::cell::Cell;
use std::path::Path;

use anyhow::Result;
use tempfile::TempDir;

use detect_player::{
    prepare_player, BackendKind, FileSource, FrameSource, HeadlessRenderer, Player, PlayerConfig,
    RendererKind, SourceError, StubBackend, TerminationReason,
};

fn config(video: &str, data_dir: &Path) -> PlayerConfig {
    PlayerConfig {
        video: video.to_string(),
        data_dir: data_dir.to_path_buf(),
        ..PlayerConfig::default()
    }
}

#[test]
fn missing_video_fails_before_any_render_surface() {
    let dir = TempDir::new().expect("temp dir");
    let cfg = config("cars.mp4", dir.path());
    let surfaces = Cell::new(0);

    let err = prepare_player(&cfg, |_| {
        surfaces.set(surfaces.get() + 1);
        Ok(HeadlessRenderer::new().without_delay())
    })
    .map(|_| ())
    .expect_err("missing file must fail");

    match err.downcast_ref::<SourceError>() {
        Some(SourceError::NotFound(missing)) => assert_eq!(missing, &cfg.video_path()),
        other => panic!("expected NotFound, got {:?}", other),
    }
    assert!(err.to_string().contains("not found"));
    assert_eq!(surfaces.get(), 0);
}

#[cfg(not(feature = "backend-tract"))]
#[test]
fn detector_failure_also_precedes_the_render_surface() {
    let dir = TempDir::new().expect("temp dir");
    let cfg = PlayerConfig {
        backend: BackendKind::Tract,
        ..config("stub://cars?frames=2", dir.path())
    };
    let surfaces = Cell::new(0);

    let result = prepare_player(&cfg, |_| {
        surfaces.set(surfaces.get() + 1);
        Ok(HeadlessRenderer::new().without_delay())
    });
    assert!(result.is_err());
    assert_eq!(surfaces.get(), 0);
}

#[test]
fn prepared_player_uses_the_configured_renderer() -> Result<()> {
    let dir = TempDir::new().expect("temp dir");
    let cfg = PlayerConfig {
        speed: 2.0,
        ..config("stub://cars?frames=3&width=160&height=90", dir.path())
    };
    let requested = Cell::new(None);

    let mut player = prepare_player(&cfg, |kind| {
        requested.set(Some(kind));
        Ok(HeadlessRenderer::new().without_delay())
    })?;
    assert_eq!(requested.get(), Some(RendererKind::Headless));
    assert_eq!(player.speed(), 2.0);

    let summary = player.run()?;
    assert_eq!(summary.frames_shown, 3);
    assert_eq!(summary.reason, TerminationReason::EndOfStream);
    assert!(player.renderer().is_closed());
    Ok(())
}

#[cfg(not(feature = "ingest-file-ffmpeg"))]
#[test]
fn existing_file_without_decoder_is_open_failed() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("clip.mp4");
    std::fs::write(&path, b"not really a video").expect("write clip");

    match FileSource::open(&path) {
        Err(SourceError::OpenFailed { path: failed, reason }) => {
            assert_eq!(failed, path);
            assert!(reason.contains("ingest-file-ffmpeg"));
        }
        other => panic!("expected OpenFailed, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn stub_stream_plays_to_the_end() -> Result<()> {
    let source = FileSource::open(Path::new("stub://cars?frames=4&fps=30&width=320&height=180"))?;
    assert_eq!(source.session().width, 320);

    let mut player = Player::new(
        source,
        StubBackend::new(),
        HeadlessRenderer::new().without_delay(),
    );
    let summary = player.run()?;

    assert_eq!(summary.reason, TerminationReason::EndOfStream);
    assert_eq!(summary.frames_shown, 4);
    assert_eq!(player.renderer().frames_shown(), 4);
    assert!(player.renderer().is_closed());
    assert!(!player.source().is_open());
    assert_eq!(player.detector().calls(), 4);
    Ok(())
}
