use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::annotate::DEFAULT_PALETTE_SEED;
use crate::ingest::resolve_video_path;
use crate::playback::{INITIAL_SPEED, MAX_SPEED, MIN_SPEED};
use crate::{DEFAULT_WINDOW_NAME, LIVE_CONFIDENCE_THRESHOLD};

const DEFAULT_VIDEO: &str = "cars.mp4";
const DEFAULT_DATA_DIR: &str = "data";
const DEFAULT_MODEL: &str = "yolov8n.onnx";

pub const ENV_CONFIG: &str = "DETECT_PLAYER_CONFIG";
pub const ENV_DATA_DIR: &str = "DETECT_PLAYER_DATA_DIR";
pub const ENV_MODEL: &str = "DETECT_PLAYER_MODEL";
pub const ENV_SPEED: &str = "DETECT_PLAYER_SPEED";
pub const ENV_THRESHOLD: &str = "DETECT_PLAYER_THRESHOLD";
pub const ENV_PALETTE_SEED: &str = "DETECT_PLAYER_PALETTE_SEED";

/// Which detector implementation to build.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Stub,
    Tract,
}

impl FromStr for BackendKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stub" => Ok(Self::Stub),
            "tract" => Ok(Self::Tract),
            other => Err(anyhow!("unknown detector backend '{}' (expected stub or tract)", other)),
        }
    }
}

/// Which display surface to open.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RendererKind {
    Headless,
    Highgui,
}

impl FromStr for RendererKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "headless" => Ok(Self::Headless),
            "highgui" => Ok(Self::Highgui),
            other => Err(anyhow!("unknown renderer '{}' (expected headless or highgui)", other)),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct PlayerConfigFile {
    video: Option<String>,
    data_dir: Option<PathBuf>,
    model: Option<PathBuf>,
    speed: Option<f64>,
    threshold: Option<f32>,
    palette_seed: Option<u64>,
    backend: Option<BackendKind>,
    renderer: Option<RendererKind>,
    window: Option<String>,
}

/// Values given on the command line. `None` leaves the lower layers alone.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub video: Option<String>,
    pub data_dir: Option<PathBuf>,
    pub model: Option<PathBuf>,
    pub speed: Option<f64>,
    pub threshold: Option<f32>,
    pub palette_seed: Option<u64>,
    pub backend: Option<BackendKind>,
    pub renderer: Option<RendererKind>,
    pub window: Option<String>,
}

/// Resolved runtime configuration for one playback or verification run.
#[derive(Debug, Clone)]
pub struct PlayerConfig {
    pub video: String,
    pub data_dir: PathBuf,
    pub model: PathBuf,
    pub speed: f64,
    pub threshold: f32,
    pub palette_seed: u64,
    pub backend: BackendKind,
    pub renderer: RendererKind,
    pub window: String,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            video: DEFAULT_VIDEO.to_string(),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            model: PathBuf::from(DEFAULT_MODEL),
            speed: INITIAL_SPEED,
            threshold: LIVE_CONFIDENCE_THRESHOLD,
            palette_seed: DEFAULT_PALETTE_SEED,
            backend: BackendKind::Stub,
            renderer: RendererKind::Headless,
            window: DEFAULT_WINDOW_NAME.to_string(),
        }
    }
}

impl PlayerConfig {
    /// Defaults, then the optional JSON file, then the environment, then
    /// `overrides`.
    pub fn load(overrides: ConfigOverrides) -> Result<Self> {
        let file_cfg = match std::env::var(ENV_CONFIG).ok().filter(|p| !p.trim().is_empty()) {
            Some(path) => read_config_file(Path::new(&path))?,
            None => PlayerConfigFile::default(),
        };
        let mut cfg = Self::from_file(file_cfg);
        cfg.apply_env()?;
        cfg.apply_overrides(overrides);
        cfg.validate()?;
        Ok(cfg)
    }

    fn from_file(file: PlayerConfigFile) -> Self {
        let defaults = Self::default();
        Self {
            video: file.video.unwrap_or(defaults.video),
            data_dir: file.data_dir.unwrap_or(defaults.data_dir),
            model: file.model.unwrap_or(defaults.model),
            speed: file.speed.unwrap_or(defaults.speed),
            threshold: file.threshold.unwrap_or(defaults.threshold),
            palette_seed: file.palette_seed.unwrap_or(defaults.palette_seed),
            backend: file.backend.unwrap_or(defaults.backend),
            renderer: file.renderer.unwrap_or(defaults.renderer),
            window: file.window.unwrap_or(defaults.window),
        }
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Some(dir) = env_value(ENV_DATA_DIR) {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(model) = env_value(ENV_MODEL) {
            self.model = PathBuf::from(model);
        }
        if let Some(speed) = env_value(ENV_SPEED) {
            self.speed = speed
                .parse()
                .map_err(|_| anyhow!("{} must be a number, got '{}'", ENV_SPEED, speed))?;
        }
        if let Some(threshold) = env_value(ENV_THRESHOLD) {
            self.threshold = threshold.parse().map_err(|_| {
                anyhow!("{} must be a number, got '{}'", ENV_THRESHOLD, threshold)
            })?;
        }
        if let Some(seed) = env_value(ENV_PALETTE_SEED) {
            self.palette_seed = seed.parse().map_err(|_| {
                anyhow!("{} must be an unsigned integer, got '{}'", ENV_PALETTE_SEED, seed)
            })?;
        }
        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(video) = overrides.video {
            self.video = video;
        }
        if let Some(dir) = overrides.data_dir {
            self.data_dir = dir;
        }
        if let Some(model) = overrides.model {
            self.model = model;
        }
        if let Some(speed) = overrides.speed {
            self.speed = speed;
        }
        if let Some(threshold) = overrides.threshold {
            self.threshold = threshold;
        }
        if let Some(seed) = overrides.palette_seed {
            self.palette_seed = seed;
        }
        if let Some(backend) = overrides.backend {
            self.backend = backend;
        }
        if let Some(renderer) = overrides.renderer {
            self.renderer = renderer;
        }
        if let Some(window) = overrides.window {
            self.window = window;
        }
    }

    fn validate(&mut self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(anyhow!(
                "confidence threshold must be within [0, 1], got {}",
                self.threshold
            ));
        }
        if !self.speed.is_finite() {
            return Err(anyhow!("speed must be a finite number"));
        }
        let clamped = self.speed.clamp(MIN_SPEED, MAX_SPEED);
        if clamped != self.speed {
            log::warn!(
                "speed {} is outside [{}, {}]; using {}",
                self.speed,
                MIN_SPEED,
                MAX_SPEED,
                clamped
            );
            self.speed = clamped;
        }
        if self.window.trim().is_empty() {
            return Err(anyhow!("window name must not be empty"));
        }
        Ok(())
    }

    /// Video location with relative paths taken from the data directory.
    pub fn video_path(&self) -> PathBuf {
        resolve_video_path(&self.video, &self.data_dir)
    }

    /// Model location with relative paths taken from the data directory.
    pub fn model_path(&self) -> PathBuf {
        if self.model.is_absolute() {
            self.model.clone()
        } else {
            self.data_dir.join(&self.model)
        }
    }
}

fn env_value(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn read_config_file(path: &Path) -> Result<PlayerConfigFile> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("failed to read config file {}: {}", path.display(), e))?;
    let cfg = serde_json::from_str(&raw)
        .map_err(|e| anyhow!("invalid config file {}: {}", path.display(), e))?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_parse_case_insensitively() {
        assert_eq!("Tract".parse::<BackendKind>().unwrap(), BackendKind::Tract);
        assert_eq!(" stub ".parse::<BackendKind>().unwrap(), BackendKind::Stub);
        assert_eq!("HIGHGUI".parse::<RendererKind>().unwrap(), RendererKind::Highgui);
        assert!("gpu".parse::<BackendKind>().is_err());
        assert!("sdl".parse::<RendererKind>().is_err());
    }

    #[test]
    fn overrides_replace_only_given_fields() {
        let mut cfg = PlayerConfig::default();
        cfg.apply_overrides(ConfigOverrides {
            speed: Some(1.5),
            window: Some("preview".into()),
            ..ConfigOverrides::default()
        });
        assert_eq!(cfg.speed, 1.5);
        assert_eq!(cfg.window, "preview");
        assert_eq!(cfg.video, DEFAULT_VIDEO);
        assert_eq!(cfg.threshold, LIVE_CONFIDENCE_THRESHOLD);
    }

    #[test]
    fn validate_clamps_speed_and_rejects_bad_threshold() {
        let mut cfg = PlayerConfig {
            speed: 9.0,
            ..PlayerConfig::default()
        };
        cfg.validate().unwrap();
        assert_eq!(cfg.speed, MAX_SPEED);

        let mut cfg = PlayerConfig {
            threshold: 1.5,
            ..PlayerConfig::default()
        };
        assert!(cfg.validate().is_err());

        let mut cfg = PlayerConfig {
            window: "  ".into(),
            ..PlayerConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn paths_resolve_against_data_dir() {
        let cfg = PlayerConfig {
            data_dir: PathBuf::from("media"),
            ..PlayerConfig::default()
        };
        assert_eq!(cfg.video_path(), PathBuf::from("media").join("cars.mp4"));
        assert_eq!(cfg.model_path(), PathBuf::from("media").join("yolov8n.onnx"));
    }
}
