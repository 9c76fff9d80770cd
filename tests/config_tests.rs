// SPDX-License-Identifier: MPL-2.0

//! Integration tests for configuration module

use retro_cam::Config;
use retro_cam::FilterPreset;
use retro_cam::backends::camera::CameraBackendType;

#[test]
fn test_config_default() {
    let config = Config::default();

    assert_eq!(config.backend, CameraBackendType::TestPattern);
    assert_eq!(config.default_filter, FilterPreset::Normal);
    assert_eq!((config.ideal_width, config.ideal_height), (1280, 720));
    assert_eq!(config.jpeg_quality, 90);
    assert_eq!(config.fallback_caption, "Start of something new");
    assert!(config.photo_dir.is_none());
}

#[test]
fn test_config_save_and_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.json");

    let mut config = Config::default();
    config.default_filter = FilterPreset::Vintage;
    config.jpeg_quality = 75;
    config.timings.develop_ms = 1000;
    config.save(&path).unwrap();

    let loaded = Config::load(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_config_missing_file_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("does-not-exist.json");

    let config = Config::load_or_default(Some(&path)).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_config_partial_file() {
    // Unspecified fields fall back to their defaults
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(
        &path,
        r#"{ "default_filter": "bw", "timings": { "eject_ms": 50 } }"#,
    )
    .unwrap();

    let config = Config::load_or_default(Some(&path)).unwrap();
    assert_eq!(config.default_filter, FilterPreset::Bw);
    assert_eq!(config.timings.eject_ms, 50);
    assert_eq!(config.timings.develop_ms, 3000);
    assert_eq!(config.jpeg_quality, 90);
}

#[test]
fn test_config_out_of_range_values_are_sanitized() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(
        &path,
        r#"{ "jpeg_quality": 0, "ideal_width": 0, "fallback_caption": "  " }"#,
    )
    .unwrap();

    let config = Config::load(&path).unwrap();
    assert_eq!(config.jpeg_quality, 1);
    assert_eq!((config.ideal_width, config.ideal_height), (1280, 720));
    assert_eq!(config.fallback_caption, "Start of something new");
}

#[test]
fn test_config_invalid_json_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, "{ not json").unwrap();

    assert!(Config::load_or_default(Some(&path)).is_err());
}

#[test]
fn test_photo_dir_override() {
    let mut config = Config::default();
    assert!(config.photo_dir().ends_with("retro-cam"));

    config.photo_dir = Some("/tmp/booth".into());
    assert_eq!(config.photo_dir(), std::path::PathBuf::from("/tmp/booth"));
}
