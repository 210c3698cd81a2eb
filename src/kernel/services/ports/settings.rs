use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub workspace: WorkspaceSettings,
    #[serde(default)]
    pub preview: PreviewSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceSettings {
    #[serde(default = "default_root_folder_name")]
    pub root_folder_name: String,
    #[serde(default = "default_file_name")]
    pub default_file_name: String,
    #[serde(default = "default_folder_name")]
    pub default_folder_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviewSettings {
    /// How long a programmatic scroll suppresses echoes from the other view.
    #[serde(default = "default_scroll_guard_ms")]
    pub scroll_guard_ms: u64,
}

fn default_root_folder_name() -> String {
    "My Documents".to_string()
}

fn default_file_name() -> String {
    "New File".to_string()
}

fn default_folder_name() -> String {
    "New Folder".to_string()
}

fn default_scroll_guard_ms() -> u64 {
    20
}

impl Default for WorkspaceSettings {
    fn default() -> Self {
        Self {
            root_folder_name: default_root_folder_name(),
            default_file_name: default_file_name(),
            default_folder_name: default_folder_name(),
            store_dir: None,
        }
    }
}

impl Default for PreviewSettings {
    fn default() -> Self {
        Self {
            scroll_guard_ms: default_scroll_guard_ms(),
        }
    }
}

impl PreviewSettings {
    pub fn scroll_guard(&self) -> Duration {
        Duration::from_millis(self.scroll_guard_ms)
    }
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/ports/settings.rs"]
mod tests;
