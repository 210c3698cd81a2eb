use super::*;

#[test]
fn test_get_store_dir() {
    let dir = get_store_dir();
    assert!(dir.is_some());
    let dir = dir.unwrap();
    assert!(dir.to_string_lossy().contains(APP_NAME));
    assert!(dir.to_string_lossy().contains(STORE_DIR));
}

#[test]
fn test_get_log_dir() {
    let dir = get_log_dir();
    assert!(dir.is_some());
    let dir = dir.unwrap();
    assert!(dir.to_string_lossy().contains(APP_NAME));
    assert!(dir.to_string_lossy().contains(LOG_DIR));
}

#[test]
fn test_store_and_log_dirs_share_app_dir() {
    let store = get_store_dir().unwrap();
    let logs = get_log_dir().unwrap();
    assert_eq!(store.parent(), logs.parent());
}
