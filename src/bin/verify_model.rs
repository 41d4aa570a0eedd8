//! verify_model - one-shot detector check on the first frame of a video
//!
//! Runs the configured detector on the first frame at a low confidence
//! threshold and lists what it found. The frame is annotated in memory only;
//! nothing is written to disk.

use anyhow::{anyhow, Result};
use clap::Parser;
use serde::Serialize;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;

use detect_player::config::ConfigOverrides;
use detect_player::detect::create_detector;
use detect_player::{
    Annotator, BackendKind, Detection, Detector, FileSource, FrameSource, Palette,
    PlayerConfig, VERIFY_CONFIDENCE_THRESHOLD,
};

#[path = "../ui.rs"]
mod ui;

#[derive(Parser, Debug)]
#[command(
    name = "verify_model",
    about = "Run the detector on the first frame of a video and list detections"
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

    /// Detector backend (stub|tract)
    #[arg(long, value_name = "NAME")]
    backend: Option<BackendKind>,

    /// Minimum confidence to report
    #[arg(long, default_value_t = VERIFY_CONFIDENCE_THRESHOLD)]
    threshold: f32,

    /// Print detections as JSON on stdout
    #[arg(long)]
    json: bool,

    /// UI mode for stderr progress (auto|plain|pretty)
    #[arg(long, default_value = "auto", value_name = "MODE")]
    ui: String,
}

#[derive(Serialize)]
struct Report<'a> {
    video: String,
    detector: &'a str,
    frame: u64,
    threshold: f32,
    count: usize,
    detections: Vec<ReportEntry<'a>>,
}

#[derive(Serialize)]
struct ReportEntry<'a> {
    class_name: &'a str,
    #[serde(flatten)]
    detection: &'a Detection,
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
        !std::io::stdout().is_terminal(),
    );

    let stage = ui.stage("Load configuration");
    let cfg = PlayerConfig::load(ConfigOverrides {
        video: args.video.clone(),
        data_dir: args.data_dir.clone(),
        model: args.model.clone(),
        threshold: Some(args.threshold),
        backend: args.backend,
        ..ConfigOverrides::default()
    })?;
    stage.done();

    let stage = ui.stage("Read first frame");
    let video_path = cfg.video_path();
    let mut source = FileSource::open(&video_path)?;
    log::info!("video properties: {}", source.session());
    let mut frame = source
        .read()?
        .ok_or_else(|| anyhow!("{} contains no frames", video_path.display()))?;
    source.close();
    stage.done();

    let stage = ui.stage("Run detector");
    let mut detector = create_detector(cfg.backend, &cfg.model_path())?;
    let detections = detector.detect(&frame, cfg.threshold)?;
    stage.done();

    let annotator = Annotator::new(Palette::new(cfg.palette_seed));
    let drawn = annotator.annotate(&mut frame, &detections, cfg.threshold, |id| {
        detector.class_name(id).to_string()
    });
    log::debug!("annotated {} detections on frame {}", drawn, frame.index());

    if args.json {
        let report = Report {
            video: video_path.display().to_string(),
            detector: detector.name(),
            frame: frame.index(),
            threshold: cfg.threshold,
            count: detections.len(),
            detections: detections
                .iter()
                .map(|detection| ReportEntry {
                    class_name: detector.class_name(detection.class_id),
                    detection,
                })
                .collect(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Detections on first frame:");
        for detection in &detections {
            println!(
                "  {}: {:.3}",
                detector.class_name(detection.class_id),
                detection.confidence
            );
        }
        println!("Found {} objects", detections.len());
    }
    Ok(())
}
