use super::*;
use crate::kernel::services::adapters::MemoryStore;
use serde_json::json;

#[test]
fn test_cursor_round_trip_with_extra_fields() {
    let mut store = MemoryStore::new();
    let mut extra = Map::new();
    extra.insert("line".into(), json!(4));
    extra.insert("documentId".into(), json!("spoofed"));

    save_cursor_position(&mut store, "doc", 42, extra);

    let saved = get_cursor_position(&store, Some("doc")).unwrap();
    assert_eq!(saved.document_id, "doc");
    assert_eq!(saved.position, 42);
    assert_eq!(saved.extra.get("line"), Some(&json!(4)));
    assert!(!saved.extra.contains_key("documentId"));
    assert!(saved.timestamp > 0);

    let raw: Value = serde_json::from_str(&store.get(CURSOR_KEY).unwrap()).unwrap();
    assert_eq!(raw["documentId"], "doc");
    assert_eq!(raw["line"], 4);
}

#[test]
fn test_cursor_filtered_by_document() {
    let mut store = MemoryStore::new();
    save_cursor_position(&mut store, "doc", 1, Map::new());
    assert!(get_cursor_position(&store, Some("other")).is_none());
    assert!(get_cursor_position(&store, None).is_some());
    assert!(get_cursor_position(&store, Some("")).is_some());
}

#[test]
fn test_clear_cursor() {
    let mut store = MemoryStore::new();
    save_cursor_position(&mut store, "doc", 1, Map::new());
    clear_cursor_position(&mut store);
    assert!(get_cursor_position(&store, None).is_none());
}

#[test]
fn test_malformed_snapshot_is_ignored() {
    let mut store = MemoryStore::new();
    store.set(CURSOR_KEY, "{\"documentId\":").unwrap();
    store.set(SCROLL_KEY, "[]").unwrap();
    assert!(get_cursor_position(&store, None).is_none());
    assert!(get_scroll_position(&store, None).is_none());
}

#[test]
fn test_scroll_round_trip() {
    let mut store = MemoryStore::new();
    save_scroll_position(&mut store, "doc", 0.25);
    let saved = get_scroll_position(&store, Some("doc")).unwrap();
    assert_eq!(saved.scroll_percentage, 0.25);
    assert!(get_scroll_position(&store, Some("x")).is_none());

    save_scroll_position(&mut store, "doc", f64::NAN);
    assert_eq!(get_scroll_position(&store, None).unwrap().scroll_percentage, 0.25);
}

#[test]
fn test_save_editor_state() {
    let mut store = MemoryStore::new();
    save_editor_state(&mut store, "doc", 7, None);
    assert_eq!(get_cursor_position(&store, None).unwrap().position, 7);
    assert!(get_scroll_position(&store, None).is_none());

    save_editor_state(&mut store, "doc", 9, Some(0.5));
    assert_eq!(get_scroll_position(&store, None).unwrap().scroll_percentage, 0.5);

    save_editor_state(&mut store, "", 1, Some(0.1));
    assert_eq!(get_cursor_position(&store, None).unwrap().position, 9);
}
