use super::*;

#[test]
fn test_new_record_defaults() {
    let doc = DocumentRecord::new("d1", "Notes", None);
    assert_eq!(doc.id, "d1");
    assert_eq!(doc.title, "Notes");
    assert!(doc.content.starts_with("# Notes"));
    assert_eq!(doc.version, 1);
    assert_eq!(doc.folder_id, ROOT_FOLDER_ID);
    assert_eq!(doc.parent_folder(), None);
    assert_eq!(doc.created_at, doc.updated_at);
}

#[test]
fn test_new_record_in_folder() {
    let doc = DocumentRecord::new("d1", "Notes", Some("folder-1"));
    assert_eq!(doc.folder_id, "folder-1");
    assert_eq!(doc.parent_folder(), Some("folder-1"));
}

#[test]
fn test_file_name_appends_single_suffix() {
    assert_eq!(markdown_file_name("Notes"), "Notes.md");
    assert_eq!(markdown_file_name("Notes.md"), "Notes.md");
    let doc = DocumentRecord::new("d1", "Plan", None);
    assert_eq!(doc.file_name(), "Plan.md");
}

#[test]
fn test_deserialize_minimal_record() {
    let json = r#"{
        "id": "d1",
        "title": "Old",
        "created_at": "2024-01-01T00:00:00Z",
        "updated_at": "2024-01-01T00:00:00Z",
        "last_synced_at": "2024-01-01T00:00:00Z"
    }"#;
    let doc: DocumentRecord = serde_json::from_str(json).unwrap();
    assert_eq!(doc.version, 1);
    assert_eq!(doc.folder_id, "root");
    assert!(doc.metadata.is_empty());
    assert!(!doc.is_published);
}

#[test]
fn test_serialized_field_names() {
    let doc = DocumentRecord::new("d1", "Notes", None);
    let value = serde_json::to_value(&doc).unwrap();
    for key in [
        "id",
        "title",
        "content",
        "version",
        "folder_id",
        "created_at",
        "updated_at",
        "last_synced_at",
        "is_published",
        "metadata",
    ] {
        assert!(value.get(key).is_some(), "missing {key}");
    }
}
