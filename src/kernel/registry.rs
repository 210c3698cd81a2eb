//! Document registry: the flat, ordered collection of document records
//! persisted as one JSON array under the `documents` key.

use crate::kernel::services::bus::{DocumentEvent, EventBus};
use crate::kernel::services::ports::store::{
    read_json, write_json, KeyValueStore, StoreError, DOCUMENTS_KEY, LAST_ACTIVE_KEY,
    VERSIONS_KEY,
};
use crate::models::{DocumentRecord, DocumentVersion, RestoredDocumentPayload};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentRegistry {
    documents: Vec<DocumentRecord>,
}

impl DocumentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_documents(documents: Vec<DocumentRecord>) -> Self {
        Self { documents }
    }

    /// Missing or malformed data yields an empty registry.
    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        Self {
            documents: read_json(store, DOCUMENTS_KEY).unwrap_or_default(),
        }
    }

    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &mut S) -> Result<(), StoreError> {
        write_json(store, DOCUMENTS_KEY, &self.documents)
    }

    pub fn documents(&self) -> &[DocumentRecord] {
        &self.documents
    }

    pub fn into_documents(self) -> Vec<DocumentRecord> {
        self.documents
    }

    pub fn iter(&self) -> impl Iterator<Item = &DocumentRecord> {
        self.documents.iter()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&DocumentRecord> {
        self.documents.iter().find(|d| d.id == id)
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut DocumentRecord> {
        self.documents.iter_mut().find(|d| d.id == id)
    }

    /// Appends `document`, or replaces the record that already has its id.
    pub fn insert(&mut self, document: DocumentRecord) {
        match self.get_mut(&document.id) {
            Some(existing) => *existing = document,
            None => self.documents.push(document),
        }
    }

    pub fn remove(&mut self, id: &str) -> Option<DocumentRecord> {
        let pos = self.documents.iter().position(|d| d.id == id)?;
        Some(self.documents.remove(pos))
    }

    pub fn set_title(&mut self, id: &str, title: &str, now: DateTime<Utc>) -> bool {
        let Some(doc) = self.get_mut(id) else {
            return false;
        };
        doc.title = title.to_string();
        doc.updated_at = now;
        true
    }

    /// Content edits do not bump `version`; that happens on [`Self::snapshot`].
    pub fn update_content(&mut self, id: &str, content: &str, now: DateTime<Utc>) -> bool {
        let Some(doc) = self.get_mut(id) else {
            return false;
        };
        if doc.content == content {
            return false;
        }
        doc.content = content.to_string();
        doc.updated_at = now;
        true
    }

    /// Records the current state of `id` as a new version.
    pub fn snapshot(
        &mut self,
        id: &str,
        history: &mut VersionHistory,
        now: DateTime<Utc>,
    ) -> Option<DocumentVersion> {
        let doc = self.get_mut(id)?;
        doc.version += 1;
        doc.updated_at = now;
        let version = DocumentVersion {
            id: doc.id.clone(),
            version: doc.version,
            title: doc.title.clone(),
            content: doc.content.clone(),
            timestamp: now,
        };
        history.push(version.clone());
        Some(version)
    }

    /// Brings back the title and content saved as `version`. The restore is
    /// itself recorded as a newer version.
    pub fn restore(
        &mut self,
        id: &str,
        version: u32,
        history: &mut VersionHistory,
        now: DateTime<Utc>,
    ) -> Option<RestoredDocumentPayload> {
        let saved = history.find(id, version)?.clone();
        let doc = self.get_mut(id)?;
        doc.title = saved.title;
        doc.content = saved.content;
        let restored = self.snapshot(id, history, now)?;
        Some(RestoredDocumentPayload {
            title: restored.title,
            content: restored.content,
            version: restored.version,
            restored_from: version,
            restored_at: now,
        })
    }
}

/// Saved versions per document id, persisted under `documentVersions`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VersionHistory {
    by_document: BTreeMap<String, Vec<DocumentVersion>>,
}

impl VersionHistory {
    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        read_json(store, VERSIONS_KEY).unwrap_or_default()
    }

    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &mut S) -> Result<(), StoreError> {
        write_json(store, VERSIONS_KEY, self)
    }

    pub fn versions(&self, document_id: &str) -> &[DocumentVersion] {
        self.by_document
            .get(document_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn find(&self, document_id: &str, version: u32) -> Option<&DocumentVersion> {
        self.versions(document_id)
            .iter()
            .find(|v| v.version == version)
    }

    pub fn push(&mut self, version: DocumentVersion) {
        self.by_document
            .entry(version.id.clone())
            .or_default()
            .push(version);
    }

    pub fn forget(&mut self, document_id: &str) -> bool {
        self.by_document.remove(document_id).is_some()
    }
}

pub fn get_document_by_id<S: KeyValueStore + ?Sized>(
    store: &S,
    document_id: &str,
) -> Option<DocumentRecord> {
    if document_id.is_empty() {
        return None;
    }
    DocumentRegistry::load(store).get(document_id).cloned()
}

pub fn get_active_document<S: KeyValueStore + ?Sized>(store: &S) -> Option<DocumentRecord> {
    let active = store.get(LAST_ACTIVE_KEY)?;
    get_document_by_id(store, &active)
}

/// Remembers `document_id` as the active document and announces the switch.
pub fn switch_to_document<S: KeyValueStore + ?Sized>(
    store: &mut S,
    bus: &mut EventBus,
    document_id: &str,
) {
    if document_id.is_empty() {
        return;
    }
    if let Err(e) = store.set(LAST_ACTIVE_KEY, document_id) {
        tracing::error!(document_id, error = %e, "failed to persist active document");
    }
    bus.publish(DocumentEvent::DocumentSwitched {
        document_id: document_id.to_string(),
    });
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/registry.rs"]
mod tests;
