//! Profile loading from disk

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;
use triswipe::config::{AppConfig, COOLDOWN, SWIPE_THRESHOLD_X};

fn write_profile(dir: &TempDir, profile: &str, contents: &str) {
    fs::write(dir.path().join(format!("{profile}.toml")), contents).unwrap();
}

#[test]
fn test_partial_profile_keeps_defaults() {
    let dir = TempDir::new().unwrap();
    write_profile(
        &dir,
        "laptop",
        r#"
[device]
source = "/dev/input/event3"

[gesture]
dead_zone = 20
"#,
    );

    let config = AppConfig::load_from_dir(dir.path(), "laptop").unwrap();
    assert_eq!(config.profile, "laptop");
    assert_eq!(config.device.source, PathBuf::from("/dev/input/event3"));
    assert_eq!(config.gesture.dead_zone, 20);
    assert_eq!(config.gesture.swipe_threshold_x, SWIPE_THRESHOLD_X);
    assert_eq!(config.gesture.cooldown(), COOLDOWN);
    assert_eq!(config.emitter.steps, 10);
}

#[test]
fn test_missing_profile_uses_defaults() {
    let dir = TempDir::new().unwrap();
    let config = AppConfig::load_from_dir(dir.path(), "absent").unwrap();
    assert_eq!(config.profile, "absent");
    assert_eq!(config.virtual_device.name, "Virtual Touchpad");
}

#[test]
fn test_invalid_profile_rejected() {
    let dir = TempDir::new().unwrap();
    write_profile(&dir, "broken", "[emitter]\nsteps = 0\n");
    assert!(AppConfig::load_from_dir(dir.path(), "broken").is_err());

    write_profile(&dir, "offpad", "[emitter]\nbase = 32700\n");
    assert!(AppConfig::load_from_dir(dir.path(), "offpad").is_err());
}

#[test]
fn test_shipped_profiles_load() {
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("config");
    for profile in ["debug", "release"] {
        let config = AppConfig::load_from_dir(&dir, profile)
            .unwrap_or_else(|e| panic!("profile {profile}: {e}"));
        assert!(config.validate().is_ok());
    }

    let debug = AppConfig::load_from_dir(&dir, "debug").unwrap();
    assert_eq!(debug.virtual_device.settle_ms, 500);
}
