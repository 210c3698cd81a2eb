//! Service ports: traits + data contracts.

pub mod settings;
pub mod store;

pub use settings::{PreviewSettings, Settings, WorkspaceSettings};
pub use store::{
    read_json, write_json, KeyValueStore, StoreError, CURSOR_KEY, DOCUMENTS_KEY,
    FILE_SYSTEM_KEY, LAST_ACTIVE_KEY, SCROLL_KEY, VERSIONS_KEY,
};
