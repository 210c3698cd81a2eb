use super::*;

#[test]
fn test_default_settings() {
    let settings = Settings::default();
    assert_eq!(settings.workspace.root_folder_name, "My Documents");
    assert_eq!(settings.workspace.default_folder_name, "New Folder");
    assert!(settings.workspace.store_dir.is_none());
    assert_eq!(settings.preview.scroll_guard(), Duration::from_millis(20));
}

#[test]
fn test_empty_object_uses_defaults() {
    let settings: Settings = serde_json::from_str("{}").unwrap();
    assert_eq!(settings, Settings::default());

    let settings: Settings =
        serde_json::from_str(r#"{"workspace": {"root_folder_name": "Notes"}}"#).unwrap();
    assert_eq!(settings.workspace.root_folder_name, "Notes");
    assert_eq!(settings.workspace.default_file_name, "New File");
}

#[test]
fn test_store_dir_omitted_when_unset() {
    let json = serde_json::to_value(Settings::default()).unwrap();
    assert!(json["workspace"].get("store_dir").is_none());
    assert_eq!(json["preview"]["scroll_guard_ms"], 20);
}
