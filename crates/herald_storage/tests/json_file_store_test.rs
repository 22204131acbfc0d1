//! Tests for the JSON file snapshot store.

use chrono::{TimeZone, Utc};
use herald_core::{CacheSnapshot, MessageRecord};
use herald_storage::{JsonFileStore, PersistentStore, StorageErrorKind};
use tempfile::TempDir;

fn snapshot(texts: &[&str]) -> CacheSnapshot {
    let records = texts
        .iter()
        .map(|text| {
            MessageRecord::from_epoch_seconds(*text, Some("alice".into()), "Alice", "Archer", 1_700_000_000)
                .unwrap()
        })
        .collect();
    CacheSnapshot::new(Utc.timestamp_millis_opt(1_700_000_500_000).unwrap(), records)
}

#[tokio::test]
async fn test_load_missing_file_is_none() {
    let temp_dir = TempDir::new().unwrap();
    let store = JsonFileStore::new(temp_dir.path().join("cache.json"));

    assert!(store.load().await.unwrap().is_none());
}

#[tokio::test]
async fn test_save_and_load() {
    let temp_dir = TempDir::new().unwrap();
    let store = JsonFileStore::new(temp_dir.path().join("nested/dir/cache.json"));
    let original = snapshot(&["one", "two"]);

    store.save(&original).await.unwrap();
    let loaded = store.load().await.unwrap().unwrap();

    assert_eq!(loaded, original);
    let entries: Vec<_> = std::fs::read_dir(temp_dir.path().join("nested/dir"))
        .unwrap()
        .map(|entry| entry.unwrap().file_name())
        .collect();
    assert_eq!(entries, vec![std::ffi::OsString::from("cache.json")]);
}

#[tokio::test]
async fn test_overlapping_saves_leave_one_whole_snapshot() {
    let temp_dir = TempDir::new().unwrap();
    let store = JsonFileStore::new(temp_dir.path().join("cache.json"));
    let small = snapshot(&["small"]);
    let large = snapshot(&["large"; 500]);

    let mut saves = Vec::new();
    for i in 0..16 {
        let store = store.clone();
        let snapshot = if i % 2 == 0 { small.clone() } else { large.clone() };
        saves.push(tokio::spawn(async move { store.save(&snapshot).await }));
    }
    for save in saves {
        save.await.unwrap().unwrap();
    }

    let loaded = store.load().await.unwrap().unwrap();
    assert!(loaded == small || loaded == large);
    assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 1);
}

#[tokio::test]
async fn test_save_overwrites_previous_snapshot() {
    let temp_dir = TempDir::new().unwrap();
    let store = JsonFileStore::new(temp_dir.path().join("cache.json"));

    store.save(&snapshot(&["old"])).await.unwrap();
    store.save(&snapshot(&["new", "newer"])).await.unwrap();

    let loaded = store.load().await.unwrap().unwrap();
    let texts: Vec<&str> = loaded.records().iter().map(|r| r.text().as_str()).collect();
    assert_eq!(texts, vec!["new", "newer"]);
}

#[tokio::test]
async fn test_file_format() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("cache.json");
    let store = JsonFileStore::new(&path);

    store.save(&snapshot(&["hello"])).await.unwrap();

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw["timestamp"], serde_json::json!(1_700_000_500_000_i64));
    assert_eq!(raw["messages"][0]["message"], "hello");
    assert_eq!(raw["messages"][0]["firstName"], "Alice");
    assert_eq!(raw["messages"][0]["timestamp"], "2023-11-14T22:13:20.000Z");
}

#[tokio::test]
async fn test_corrupt_file_is_decode_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("cache.json");
    std::fs::write(&path, b"{ not json").unwrap();

    let err = JsonFileStore::new(&path).load().await.unwrap_err();
    assert!(matches!(err.kind, StorageErrorKind::Decode(_)));
}

#[tokio::test]
async fn test_unwritable_location_is_reported() {
    let temp_dir = TempDir::new().unwrap();
    let blocker = temp_dir.path().join("blocker");
    std::fs::write(&blocker, b"file, not a directory").unwrap();

    let store = JsonFileStore::new(blocker.join("cache.json"));
    let err = store.save(&snapshot(&["x"])).await.unwrap_err();
    assert!(matches!(err.kind, StorageErrorKind::DirectoryCreation(_)));
}
