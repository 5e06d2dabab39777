//! Persistence round-trip and edge case tests.
//!
//! Tests file I/O operations and JSON persistence of the config.

use std::path::PathBuf;
use tempfile::TempDir;

use crate::config::{CacheBackend, Config};
use crate::persistence::{load_json, load_json_or_default, save_json};

// ============================================================================
// JSON Persistence Tests
// ============================================================================

#[tokio::test]
async fn test_save_and_load_json_roundtrip() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("test.json");

    let mut config = Config::default();
    config.cache.backend = CacheBackend::File;
    config.http.timeout_secs = 12;

    save_json(&file_path, &config).await.unwrap();
    let loaded: Config = load_json(&file_path).await.unwrap();

    assert_eq!(loaded, config);
}

#[tokio::test]
async fn test_save_creates_parent_directories() {
    let temp_dir = TempDir::new().unwrap();
    let nested_path = temp_dir.path().join("deeply").join("nested").join("path").join("test.json");

    let data = serde_json::json!({"key": "value"});

    let result = save_json(&nested_path, &data).await;
    assert!(result.is_ok());
    assert!(nested_path.exists());
}

#[tokio::test]
async fn test_load_nonexistent_file() {
    let file_path = PathBuf::from("/nonexistent/path/config.json");

    let result: Result<Config, _> = load_json(&file_path).await;
    assert!(result.is_err());

    let fallback: Config = load_json_or_default(&file_path).await;
    assert_eq!(fallback, Config::default());
}

#[tokio::test]
async fn test_load_minimal_json_uses_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("config.json");
    tokio::fs::write(&file_path, "{}").await.unwrap();

    let loaded: Config = load_json(&file_path).await.unwrap();

    assert_eq!(loaded.http.timeout_secs, 30);
    assert_eq!(loaded.cache.credential_ttl_minutes, 50);
    assert_eq!(loaded.cache.backend, CacheBackend::Memory);
    assert!(loaded.configured_couriers().is_empty());
}

#[tokio::test]
async fn test_load_json_with_unknown_fields() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("config.json");
    let json = r#"{
        "couriers": {
            "pathao": {"username": "u", "password": "p", "store_id": 42},
            "ecourier": {"user": "x"}
        },
        "legacy": true
    }"#;
    tokio::fs::write(&file_path, json).await.unwrap();

    let loaded: Config = load_json(&file_path).await.unwrap();

    assert!(loaded.validate().is_ok());
    assert_eq!(loaded.configured_couriers().len(), 1);
}

#[tokio::test]
async fn test_load_corrupt_json_falls_back() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("config.json");
    tokio::fs::write(&file_path, "{\"couriers\": ").await.unwrap();

    assert!(load_json::<Config>(&file_path).await.is_err());
    let fallback: Config = load_json_or_default(&file_path).await;
    assert_eq!(fallback, Config::default());
}

#[tokio::test]
async fn test_atomic_write() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("atomic.json");

    save_json(&file_path, &serde_json::json!({"v": 1})).await.unwrap();
    save_json(&file_path, &serde_json::json!({"v": 2})).await.unwrap();

    // No temp file left behind
    assert!(!file_path.with_extension("json.tmp").exists());

    let loaded: serde_json::Value = load_json(&file_path).await.unwrap();
    assert_eq!(loaded["v"], 2);
}

#[tokio::test]
async fn test_unicode_in_config() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("config.json");

    let mut config = Config::from_lookup(|name| match name {
        "STEADFAST_USER" => Some("দোকান@example.com".to_string()),
        "STEADFAST_PASSWORD" => Some("পাসওয়ার্ড".to_string()),
        _ => None,
    });
    config.http.courier_timeout_secs = 20;

    save_json(&file_path, &config).await.unwrap();
    let loaded: Config = load_json(&file_path).await.unwrap();

    assert_eq!(loaded, config);
    assert_eq!(loaded.couriers.steadfast.unwrap().email, "দোকান@example.com");
}
