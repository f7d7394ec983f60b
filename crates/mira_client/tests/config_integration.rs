//! Integration tests for settings load/save against real files in a temp dir.

use mira_client::config::{self, Config, ConfigError, WindowBounds};
use predicates::prelude::*;
use serde_json::json;

#[test]
fn missing_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config::load(&dir.path().join("config.json")).expect("load should succeed");
    assert_eq!(cfg, Config::default());
    assert_eq!(cfg.api_base_url, "http://localhost:8000");
    assert_eq!(cfg.window_bounds, WindowBounds { width: 1000.0, height: 700.0, x: None, y: None });
}

#[test]
fn partial_file_merges_over_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{ "apiBaseUrl": "http://10.0.0.5:8000" }"#).unwrap();

    let cfg = config::load(&path).expect("load should succeed");
    assert_eq!(cfg.api_base_url, "http://10.0.0.5:8000");
    assert_eq!(cfg.window_bounds, WindowBounds::default());
}

#[test]
fn merge_is_shallow() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{ "windowBounds": { "width": 900, "x": 40, "y": 60 } }"#).unwrap();

    let cfg = config::load(&path).expect("load should succeed");
    assert_eq!(cfg.window_bounds.width, 900.0);
    assert_eq!(cfg.window_bounds.height, 700.0);
    assert_eq!(cfg.window_bounds.x, Some(40.0));
    assert_eq!(cfg.api_base_url, "http://localhost:8000");
}

#[test]
fn malformed_or_non_object_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");

    std::fs::write(&path, "{ not json").unwrap();
    assert!(matches!(config::load(&path), Err(ConfigError::Json(_))));
    assert_eq!(config::load_or_default(&path), Config::default());

    std::fs::write(&path, "[1, 2, 3]").unwrap();
    assert!(matches!(config::load(&path), Err(ConfigError::NotAnObject)));
}

#[test]
fn save_creates_directory_and_file_when_missing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mira-desktop").join("config.json");
    assert!(!predicate::path::exists().eval(path.parent().unwrap()));

    config::save(&path, &Config::default()).expect("save should succeed");

    assert!(predicate::path::is_file().eval(path.as_path()));
    let contents = std::fs::read_to_string(&path).unwrap();
    assert!(predicate::str::contains("\"apiBaseUrl\"").eval(&contents));
    assert!(predicate::str::contains("\"windowBounds\"").eval(&contents));
}

#[test]
fn unknown_keys_survive_save_and_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{ "theme": { "accent": "pink" }, "fontSize": 15 }"#).unwrap();

    let mut cfg = config::load(&path).unwrap();
    cfg.set_path("windowBounds.height", json!(720)).unwrap();
    config::save(&path, &cfg).unwrap();

    let reloaded = config::load(&path).unwrap();
    assert_eq!(reloaded.get_path("theme.accent"), Some(json!("pink")));
    assert_eq!(reloaded.get_path("fontSize"), Some(json!(15)));
    assert_eq!(reloaded.window_bounds.height, 720.0);
    assert_eq!(reloaded, cfg);
}

#[test]
fn resolve_path_prefers_override() {
    let dir = tempfile::tempdir().unwrap();
    let explicit = dir.path().join("custom.json");
    assert_eq!(config::resolve_path(Some(&explicit)), Some(explicit));
}
