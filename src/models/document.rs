//! 文档记录：注册表中的扁平文档集合

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// `folder_id` value for documents that live at the top level.
pub const ROOT_FOLDER_ID: &str = "root";

pub type DocumentMetadata = Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub id: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub uuid: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default = "first_version")]
    pub version: u32,
    #[serde(default)]
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_synced_at: DateTime<Utc>,
    #[serde(default)]
    pub metadata: DocumentMetadata,
    #[serde(default = "root_folder")]
    pub folder_id: String,
}

fn first_version() -> u32 {
    1
}

fn root_folder() -> String {
    ROOT_FOLDER_ID.to_string()
}

impl DocumentRecord {
    /// A fresh record with starter content. `parent` is the folder it was
    /// created in; `None` places it at the top level.
    pub fn new(id: impl Into<String>, title: impl Into<String>, parent: Option<&str>) -> Self {
        Self::new_at(id, title, parent, Utc::now())
    }

    pub fn new_at(
        id: impl Into<String>,
        title: impl Into<String>,
        parent: Option<&str>,
        now: DateTime<Utc>,
    ) -> Self {
        let title = title.into();
        Self {
            id: id.into(),
            user_id: "current-user".to_string(),
            uuid: uuid::Uuid::new_v4().to_string(),
            content: starter_content(&title),
            title,
            version: 1,
            is_published: false,
            created_at: now,
            updated_at: now,
            last_synced_at: now,
            metadata: DocumentMetadata::new(),
            folder_id: parent.unwrap_or(ROOT_FOLDER_ID).to_string(),
        }
    }

    /// The folder the record belongs to, or `None` at the top level.
    pub fn parent_folder(&self) -> Option<&str> {
        match self.folder_id.as_str() {
            "" | ROOT_FOLDER_ID => None,
            id => Some(id),
        }
    }

    /// Display name of the tree leaf that mirrors this record.
    pub fn file_name(&self) -> String {
        markdown_file_name(&self.title)
    }
}

pub fn starter_content(title: &str) -> String {
    format!("# {title}\n\nStart typing here...")
}

/// `title` with a single `.md` suffix.
pub fn markdown_file_name(title: &str) -> String {
    if title.ends_with(".md") {
        title.to_string()
    } else {
        format!("{title}.md")
    }
}

/// A saved snapshot of a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentVersion {
    pub id: String,
    pub version: u32,
    pub title: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestoredDocumentPayload {
    pub title: String,
    pub content: String,
    pub version: u32,
    pub restored_from: u32,
    pub restored_at: DateTime<Utc>,
}

#[cfg(test)]
#[path = "../../tests/unit/models/document.rs"]
mod tests;
