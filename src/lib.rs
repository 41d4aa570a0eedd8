//! Detect Player
//!
//! Plays a video file back at an adjustable speed, runs an object detector on
//! every frame and draws the results before the frame is shown.
//!
//! # Architecture
//!
//! The interesting part is the pacing loop in [`playback`]. Everything the loop
//! talks to sits behind a trait so the loop can be driven by real collaborators
//! or by scripted fakes:
//!
//! - [`ingest::FrameSource`]: where frames come from (synthetic `stub://`
//!   streams, FFmpeg-decoded files)
//! - [`detect::Detector`]: what finds objects in a frame (stub, tract ONNX)
//! - [`render::Renderer`]: where annotated frames go and where key presses come
//!   from (headless, OpenCV HighGUI)
//!
//! # Module Structure
//!
//! - `frame`: Frame and session metadata
//! - `ingest`: Frame sources and video path resolution
//! - `detect`: Detector trait, detections, backends, YOLOv8 post-processing
//! - `annotate`: Palette, bitmap font, box/label drawing
//! - `playback`: Speed control, frame pacing, key mapping, the player loop
//! - `render`: Display surfaces
//! - `config`: Layered runtime configuration

pub mod annotate;
pub mod config;
pub mod detect;
pub mod frame;
pub mod ingest;
pub mod playback;
pub mod render;

pub use annotate::{Annotator, Palette};
pub use config::{BackendKind, PlayerConfig, RendererKind};
pub use detect::{BoundingBox, Detection, Detector, StubBackend};
pub use frame::{Frame, SessionInfo};
pub use ingest::{resolve_video_path, FileSource, FrameSource, SourceError};
pub use playback::{
    delay_ms, prepare_player, KeyCommand, PlaybackState, PlaybackSummary, Player, PlayerState,
    SpeedController, TerminationReason,
};
pub use render::{HeadlessRenderer, Renderer};

/// Confidence threshold used while playing video.
pub const LIVE_CONFIDENCE_THRESHOLD: f32 = 0.5;

/// Confidence threshold used by the one-shot model verification pass.
pub const VERIFY_CONFIDENCE_THRESHOLD: f32 = 0.25;

/// Default window title for the player.
pub const DEFAULT_WINDOW_NAME: &str = "YOLO Object Detection";
