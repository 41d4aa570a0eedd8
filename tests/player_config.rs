use std::path::PathBuf;
use std::sync::Mutex;

use tempfile::NamedTempFile;

use detect_player::config::{ConfigOverrides, ENV_CONFIG};
use detect_player::{BackendKind, PlayerConfig, RendererKind};

static ENV_LOCK: Mutex<()> = Mutex::new(());

fn clear_env() {
    for key in [
        ENV_CONFIG,
        "DETECT_PLAYER_DATA_DIR",
        "DETECT_PLAYER_MODEL",
        "DETECT_PLAYER_SPEED",
        "DETECT_PLAYER_THRESHOLD",
        "DETECT_PLAYER_PALETTE_SEED",
    ] {
        std::env::remove_var(key);
    }
}

fn write_config(json: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp config");
    std::io::Write::write_all(&mut file, json.as_bytes()).expect("write config");
    file
}

#[test]
fn defaults_without_env_or_flags() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let cfg = PlayerConfig::load(ConfigOverrides::default()).expect("load config");
    assert_eq!(cfg.video, "cars.mp4");
    assert_eq!(cfg.data_dir, PathBuf::from("data"));
    assert_eq!(cfg.speed, 0.5);
    assert_eq!(cfg.threshold, 0.5);
    assert_eq!(cfg.backend, BackendKind::Stub);
    assert_eq!(cfg.renderer, RendererKind::Headless);
    assert_eq!(cfg.window, "YOLO Object Detection");
    assert_eq!(cfg.video_path(), PathBuf::from("data").join("cars.mp4"));
}

#[test]
fn file_then_env_then_flags() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let file = write_config(
        r#"{
            "video": "highway.mp4",
            "data_dir": "/srv/videos",
            "speed": 1.2,
            "threshold": 0.4,
            "backend": "tract",
            "renderer": "highgui",
            "window": "From File"
        }"#,
    );
    std::env::set_var(ENV_CONFIG, file.path());
    std::env::set_var("DETECT_PLAYER_SPEED", "0.8");
    std::env::set_var("DETECT_PLAYER_PALETTE_SEED", "99");
    std::env::set_var("DETECT_PLAYER_MODEL", "");

    let cfg = PlayerConfig::load(ConfigOverrides {
        speed: Some(1.5),
        backend: Some(BackendKind::Stub),
        ..ConfigOverrides::default()
    })
    .expect("load config");

    assert_eq!(cfg.video, "highway.mp4");
    assert_eq!(cfg.data_dir, PathBuf::from("/srv/videos"));
    assert_eq!(cfg.threshold, 0.4);
    assert_eq!(cfg.renderer, RendererKind::Highgui);
    assert_eq!(cfg.window, "From File");
    assert_eq!(cfg.palette_seed, 99);
    // Empty env values are ignored.
    assert_eq!(cfg.model, PathBuf::from("yolov8n.onnx"));
    // Flags beat env, which beats the file.
    assert_eq!(cfg.speed, 1.5);
    assert_eq!(cfg.backend, BackendKind::Stub);
    assert_eq!(cfg.model_path(), PathBuf::from("/srv/videos/yolov8n.onnx"));

    clear_env();
}

#[test]
fn env_speed_is_clamped() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();
    std::env::set_var("DETECT_PLAYER_SPEED", "5");

    let cfg = PlayerConfig::load(ConfigOverrides::default()).expect("load config");
    assert_eq!(cfg.speed, 2.0);

    clear_env();
}

#[test]
fn invalid_values_are_rejected() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    std::env::set_var("DETECT_PLAYER_THRESHOLD", "high");
    let err = PlayerConfig::load(ConfigOverrides::default()).unwrap_err();
    assert!(err.to_string().contains("DETECT_PLAYER_THRESHOLD"));
    clear_env();

    let err = PlayerConfig::load(ConfigOverrides {
        threshold: Some(-0.1),
        ..ConfigOverrides::default()
    })
    .unwrap_err();
    assert!(err.to_string().contains("threshold"));

    let file = write_config(r#"{ "fps": 60 }"#);
    std::env::set_var(ENV_CONFIG, file.path());
    assert!(PlayerConfig::load(ConfigOverrides::default()).is_err());
    clear_env();

    std::env::set_var(ENV_CONFIG, "/nonexistent/detect_player.json");
    let err = PlayerConfig::load(ConfigOverrides::default()).unwrap_err();
    assert!(err.to_string().contains("failed to read config file"));
    clear_env();
}
