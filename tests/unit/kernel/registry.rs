use super::*;
use crate::kernel::services::adapters::MemoryStore;
use crate::kernel::services::bus::EventKind;
use chrono::TimeZone;
use std::cell::RefCell;
use std::rc::Rc;

fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
}

fn registry_with(ids: &[&str]) -> DocumentRegistry {
    DocumentRegistry::from_documents(
        ids.iter()
            .map(|id| DocumentRecord::new_at(*id, format!("Doc {id}"), None, at(0)))
            .collect(),
    )
}

#[test]
fn test_load_missing_key_is_empty() {
    let store = MemoryStore::new();
    assert!(DocumentRegistry::load(&store).is_empty());
}

#[test]
fn test_load_malformed_json_degrades_to_empty() {
    let mut store = MemoryStore::new();
    store.set(DOCUMENTS_KEY, "{not json").unwrap();
    assert!(DocumentRegistry::load(&store).is_empty());
}

#[test]
fn test_save_then_load_keeps_order() {
    let mut store = MemoryStore::new();
    let registry = registry_with(&["b", "a", "c"]);
    registry.save(&mut store).unwrap();

    let loaded = DocumentRegistry::load(&store);
    let ids: Vec<_> = loaded.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(ids, vec!["b", "a", "c"]);
    assert_eq!(loaded, registry);
}

#[test]
fn test_insert_replaces_same_id() {
    let mut registry = registry_with(&["a", "b"]);
    let mut replacement = DocumentRecord::new_at("a", "Renamed", None, at(5));
    replacement.content = "new".into();
    registry.insert(replacement);

    assert_eq!(registry.len(), 2);
    assert_eq!(registry.documents()[0].title, "Renamed");
}

#[test]
fn test_remove_returns_record() {
    let mut registry = registry_with(&["a", "b"]);
    assert_eq!(registry.remove("a").map(|d| d.id), Some("a".to_string()));
    assert!(registry.remove("a").is_none());
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_set_title_touches_updated_at() {
    let mut registry = registry_with(&["a"]);
    assert!(registry.set_title("a", "Fresh", at(60)));
    let doc = registry.get("a").unwrap();
    assert_eq!(doc.title, "Fresh");
    assert_eq!(doc.updated_at, at(60));
    assert_eq!(doc.created_at, at(0));
    assert!(!registry.set_title("missing", "x", at(60)));
}

#[test]
fn test_update_content_keeps_version() {
    let mut registry = registry_with(&["a"]);
    assert!(registry.update_content("a", "hello", at(1)));
    assert!(!registry.update_content("a", "hello", at(2)));
    let doc = registry.get("a").unwrap();
    assert_eq!(doc.content, "hello");
    assert_eq!(doc.version, 1);
    assert_eq!(doc.updated_at, at(1));
}

#[test]
fn test_snapshot_bumps_version_monotonically() {
    let mut registry = registry_with(&["a"]);
    let mut history = VersionHistory::default();

    let v2 = registry.snapshot("a", &mut history, at(1)).unwrap();
    let v3 = registry.snapshot("a", &mut history, at(2)).unwrap();
    assert_eq!((v2.version, v3.version), (2, 3));
    assert_eq!(registry.get("a").unwrap().version, 3);
    assert_eq!(history.versions("a").len(), 2);
    assert!(registry.snapshot("missing", &mut history, at(3)).is_none());
}

#[test]
fn test_restore_writes_back_as_new_version() {
    let mut registry = registry_with(&["a"]);
    let mut history = VersionHistory::default();

    registry.update_content("a", "first draft", at(1));
    registry.snapshot("a", &mut history, at(1));
    registry.update_content("a", "second draft", at(2));
    registry.set_title("a", "Changed", at(2));
    registry.snapshot("a", &mut history, at(2));

    let restored = registry.restore("a", 2, &mut history, at(3)).unwrap();
    assert_eq!(restored.content, "first draft");
    assert_eq!(restored.title, "Doc a");
    assert_eq!(restored.restored_from, 2);
    assert_eq!(restored.version, 4);
    assert_eq!(registry.get("a").unwrap().content, "first draft");
    assert_eq!(history.versions("a").len(), 3);

    assert!(registry.restore("a", 99, &mut history, at(4)).is_none());
}

#[test]
fn test_version_history_persists_by_document() {
    let mut store = MemoryStore::new();
    let mut registry = registry_with(&["a", "b"]);
    let mut history = VersionHistory::load(&store);
    registry.snapshot("a", &mut history, at(1));
    registry.snapshot("b", &mut history, at(1));
    history.save(&mut store).unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&store.get(VERSIONS_KEY).unwrap()).unwrap();
    assert!(json["a"].is_array());

    let mut loaded = VersionHistory::load(&store);
    assert_eq!(loaded, history);
    assert!(loaded.forget("a"));
    assert!(loaded.versions("a").is_empty());
    assert_eq!(loaded.versions("b").len(), 1);
}

#[test]
fn test_switch_to_document_persists_and_publishes() {
    let mut store = MemoryStore::new();
    registry_with(&["a", "b"]).save(&mut store).unwrap();
    let mut bus = EventBus::new();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    bus.subscribe(EventKind::DocumentSwitched, move |e| {
        sink.borrow_mut().push(e.document_id().map(str::to_string))
    });

    switch_to_document(&mut store, &mut bus, "b");
    switch_to_document(&mut store, &mut bus, "");

    assert_eq!(store.get(LAST_ACTIVE_KEY).as_deref(), Some("b"));
    assert_eq!(*seen.borrow(), vec![Some("b".to_string())]);
    assert_eq!(get_active_document(&store).map(|d| d.id), Some("b".to_string()));
}

#[test]
fn test_active_document_dangling_id() {
    let mut store = MemoryStore::new();
    store.set(LAST_ACTIVE_KEY, "gone").unwrap();
    assert!(get_active_document(&store).is_none());
    assert!(get_document_by_id(&store, "").is_none());
}
