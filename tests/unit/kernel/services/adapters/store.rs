use super::*;
use crate::kernel::services::ports::store::{read_json, write_json};

#[test]
fn test_memory_store_roundtrip() {
    let mut store = MemoryStore::new();
    assert!(store.get("documents").is_none());

    store.set("documents", "[]").unwrap();
    assert_eq!(store.get("documents").as_deref(), Some("[]"));

    store.remove("documents");
    assert!(store.get("documents").is_none());
}

#[test]
fn test_memory_store_quota_rejects_and_keeps_previous_value() {
    let mut store = MemoryStore::with_quota(16);
    store.set("k", "small").unwrap();

    let err = store.set("k", "this value is far too large").unwrap_err();
    assert!(matches!(err, StoreError::QuotaExceeded { .. }));
    assert_eq!(store.get("k").as_deref(), Some("small"));
}

#[test]
fn test_memory_store_quota_counts_replaced_value_once() {
    let mut store = MemoryStore::with_quota(10);
    store.set("k", "12345678").unwrap();
    store.set("k", "87654321").unwrap();
    assert_eq!(store.used_bytes(), 9);
}

#[test]
fn test_read_json_malformed_is_none() {
    let mut store = MemoryStore::new();
    store.set("documents", "{ nope").unwrap();

    let parsed: Option<Vec<String>> = read_json(&store, "documents");
    assert!(parsed.is_none());
}

#[test]
fn test_write_json_reports_quota_failure() {
    let mut store = MemoryStore::with_quota(4);
    let result = write_json(&mut store, "documents", &vec!["a".to_string()]);
    assert!(result.is_err());
    assert!(store.get("documents").is_none());
}

#[test]
fn test_file_store_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = FileStore::open(dir.path().join("store")).unwrap();

    store.set("txtwFileSystem", "[1,2]").unwrap();
    assert_eq!(store.get("txtwFileSystem").as_deref(), Some("[1,2]"));
    assert!(dir.path().join("store").join("txtwFileSystem.json").exists());

    store.remove("txtwFileSystem");
    assert!(store.get("txtwFileSystem").is_none());
    store.remove("txtwFileSystem");
}

#[test]
fn test_file_store_sanitizes_key() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = FileStore::open(dir.path()).unwrap();

    store.set("../escape", "x").unwrap();
    assert_eq!(store.get("../escape").as_deref(), Some("x"));
    assert!(dir.path().join("___escape.json").exists());
}
