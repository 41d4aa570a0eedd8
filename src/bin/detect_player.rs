//! detect_player - play a video with live object detection
//!
//! Opens the video, builds the detector and the display, then hands all three
//! to the player loop. Keys while playing:
//! - `q` quits
//! - `+` / `=` speeds up
//! - `-` / `_` slows down
//!
//! Ctrl-C stops playback the same way `q` does.

use anyhow::{Context, Result};
use clap::Parser;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::atomic::Ordering;

use detect_player::config::ConfigOverrides;
use detect_player::render::create_renderer;
use detect_player::{prepare_player, BackendKind, PlayerConfig, RendererKind};

#[path = "../ui.rs"]
mod ui;

#[derive(Parser, Debug)]
#[command(
    name = "detect_player",
    about = "Play a video with object detection overlays and adjustable speed"
)]
struct Args {
    /// Video file, relative to the data directory, or a stub:// stream
    video: Option<String>,

    /// Directory relative video and model paths are resolved against
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// ONNX model for the tract backend
    #[arg(long, value_name = "PATH")]
    model: Option<PathBuf>,

    /// Initial playback speed (clamped to 0.1..=2.0)
    #[arg(long)]
    speed: Option<f64>,

    /// Minimum confidence for a detection to be drawn
    #[arg(long)]
    threshold: Option<f32>,

    /// Seed for the per-class color palette
    #[arg(long, value_name = "SEED")]
    palette_seed: Option<u64>,

    /// Detector backend (stub|tract)
    #[arg(long, value_name = "NAME")]
    backend: Option<BackendKind>,

    /// Display surface (headless|highgui)
    #[arg(long, value_name = "NAME")]
    renderer: Option<RendererKind>,

    /// Window title
    #[arg(long)]
    window: Option<String>,

    /// UI mode for stderr progress (auto|plain|pretty)
    #[arg(long, default_value = "auto", value_name = "MODE")]
    ui: String,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            video: self.video.clone(),
            data_dir: self.data_dir.clone(),
            model: self.model.clone(),
            speed: self.speed,
            threshold: self.threshold,
            palette_seed: self.palette_seed,
            backend: self.backend,
            renderer: self.renderer,
            window: self.window.clone(),
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("An error occurred: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let ui = ui::Ui::new(
        ui::UiMode::parse(&args.ui),
        std::io::stderr().is_terminal(),
        false,
    );

    let stage = ui.stage("Load configuration");
    let cfg = PlayerConfig::load(args.overrides())?;
    stage.done();

    let stage = ui.stage("Open video, detector and display");
    let mut player = prepare_player(&cfg, create_renderer)?;
    stage.done();

    let interrupt = player.interrupt_handle();
    ctrlc::set_handler(move || {
        interrupt.store(true, Ordering::SeqCst);
    })
    .context("failed to install Ctrl-C handler")?;

    player.run()?;
    Ok(())
}
