//! 工作区：聚合存储、事件总线与设置，对外提供用户级操作
//!
//! The workspace owns the store and is the tree owner: it is the one that
//! removes leaves after a document is deleted. Every call reads the current
//! state from the store, so two workspaces over the same store agree.

use crate::kernel::file_system::{
    create_document_file, create_folder, load_file_system, save_file_system,
};
use crate::kernel::persistence::{
    self, get_cursor_position, get_scroll_position, CursorSnapshot, ScrollSnapshot,
};
use crate::kernel::registry::{self, DocumentRegistry, VersionHistory};
use crate::kernel::services::bus::{DocumentEvent, EventBus};
use crate::kernel::services::ports::settings::Settings;
use crate::kernel::services::ports::store::{KeyValueStore, LAST_ACTIVE_KEY};
use crate::kernel::sync::{
    handle_document_deletion, remove_document_leaves, sync_documents_with_file_system,
    synchronize_document_title,
};
use crate::models::{
    DocumentRecord, DocumentVersion, FileSystem, FileSystemItem, RestoredDocumentPayload,
};
use crate::views::preview::ScrollSync;
use chrono::Utc;

pub struct Workspace<S: KeyValueStore> {
    store: S,
    bus: EventBus,
    settings: Settings,
}

impl<S: KeyValueStore> Workspace<S> {
    pub fn new(store: S, settings: Settings) -> Self {
        Self {
            store,
            bus: EventBus::new(),
            settings,
        }
    }

    pub fn with_store(store: S) -> Self {
        Self::new(store, Settings::default())
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn bus_mut(&mut self) -> &mut EventBus {
        &mut self.bus
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Scroll coupling for the editor and preview, guarded by the configured
    /// delay.
    pub fn scroll_sync(&self) -> ScrollSync {
        ScrollSync::from_settings(&self.settings.preview)
    }

    pub fn tree(&self) -> FileSystem {
        load_file_system(&self.store)
    }

    pub fn documents(&self) -> DocumentRegistry {
        DocumentRegistry::load(&self.store)
    }

    pub fn document(&self, id: &str) -> Option<DocumentRecord> {
        registry::get_document_by_id(&self.store, id)
    }

    fn commit_tree(&mut self, before: &FileSystem, after: &FileSystem) -> bool {
        if after.same_snapshot(before) {
            return false;
        }
        let _ = save_file_system(&mut self.store, after);
        self.bus.publish(DocumentEvent::FileSystemUpdated);
        true
    }

    /// Adds leaves for documents that have none. Publishes
    /// `file-system-updated` when the tree changed.
    pub fn reconcile(&mut self) -> FileSystem {
        let before = self.tree();
        let documents = self.documents().into_documents();
        let root_name = self.settings.workspace.root_folder_name.clone();
        let after = sync_documents_with_file_system(&mut self.store, &documents, &root_name);
        if after != before {
            self.bus.publish(DocumentEvent::FileSystemUpdated);
        }
        after
    }

    /// Creates a document with its leaf. `name` defaults to the configured
    /// file name.
    pub fn create_file(&mut self, parent_id: Option<&str>, name: Option<&str>) -> DocumentRecord {
        let name = name.unwrap_or(&self.settings.workspace.default_file_name).to_string();
        let (_, document) = create_document_file(&mut self.store, parent_id, &name);
        self.bus.publish(DocumentEvent::DocumentCreated {
            document_id: document.id.clone(),
        });
        self.bus.publish(DocumentEvent::DocumentsUpdated);
        self.bus.publish(DocumentEvent::FileSystemUpdated);
        document
    }

    pub fn create_folder(&mut self, parent_id: Option<&str>, name: Option<&str>) -> FileSystemItem {
        let name = name.unwrap_or(&self.settings.workspace.default_folder_name).to_string();
        let folder = create_folder(&mut self.store, parent_id, &name);
        self.bus.publish(DocumentEvent::FileSystemUpdated);
        folder
    }

    pub fn update_content(&mut self, document_id: &str, content: &str) -> bool {
        let mut documents = self.documents();
        if !documents.update_content(document_id, content, Utc::now()) {
            return false;
        }
        let _ = documents.save(&mut self.store);
        self.bus.publish(DocumentEvent::DocumentContentChanged {
            document_id: document_id.to_string(),
        });
        true
    }

    pub fn rename_document(&mut self, document_id: &str, title: &str) {
        synchronize_document_title(&mut self.store, &mut self.bus, document_id, title);
    }

    /// Renames a tree item. A leaf that references a document renames the
    /// document too, with the `.md` suffix stripped from the title.
    pub fn rename_item(&mut self, item_id: &str, name: &str) -> bool {
        let tree = self.tree();
        let Some(item) = tree.find_item(item_id) else {
            tracing::debug!(item_id, "rename target not found");
            return false;
        };
        if let Some(document_id) = item.document_ref() {
            let title = name.strip_suffix(".md").unwrap_or(name);
            if title.is_empty() {
                tracing::debug!(item_id, "rename to an empty title ignored");
                return false;
            }
            self.rename_document(document_id, title);
            return true;
        }
        let renamed = tree.update_item(item_id, |item| item.set_name(name));
        self.commit_tree(&tree, &renamed)
    }

    /// Deletes the document, its saved versions and every leaf pointing at
    /// it. `document-deleted` and `documents-updated` go out before the
    /// tree is touched.
    pub fn delete_document(&mut self, document_id: &str) {
        if document_id.is_empty() {
            return;
        }
        handle_document_deletion(&mut self.store, &mut self.bus, document_id);
        self.forget_document(document_id);

        let tree = self.tree();
        let pruned = remove_document_leaves(&tree, document_id);
        self.commit_tree(&tree, &pruned);
    }

    fn forget_document(&mut self, document_id: &str) {
        let mut history = VersionHistory::load(&self.store);
        if history.forget(document_id) {
            let _ = history.save(&mut self.store);
        }
        if self.store.get(LAST_ACTIVE_KEY).as_deref() == Some(document_id) {
            self.store.remove(LAST_ACTIVE_KEY);
        }
        if get_cursor_position(&self.store, Some(document_id)).is_some() {
            persistence::clear_cursor_position(&mut self.store);
        }
    }

    /// Removes a tree item with its subtree, deleting every document a
    /// removed leaf references.
    pub fn remove_item(&mut self, item_id: &str) -> bool {
        let tree = self.tree();
        if !tree.contains(item_id) {
            return false;
        }
        let documents: Vec<String> = tree
            .descendant_leaves(item_id)
            .into_iter()
            .filter_map(|(_, document_ref)| document_ref.map(String::from))
            .collect();
        for document_id in &documents {
            handle_document_deletion(&mut self.store, &mut self.bus, document_id);
            self.forget_document(document_id);
        }

        let tree = self.tree();
        let mut pruned = tree.remove_item(item_id);
        for document_id in &documents {
            pruned = remove_document_leaves(&pruned, document_id);
        }
        self.commit_tree(&tree, &pruned)
    }

    pub fn move_item(&mut self, item_id: &str, target_id: Option<&str>, as_child: bool) -> bool {
        let tree = self.tree();
        let moved = tree.move_item(item_id, target_id, as_child);
        self.commit_tree(&tree, &moved)
    }

    pub fn switch_to(&mut self, document_id: &str) {
        registry::switch_to_document(&mut self.store, &mut self.bus, document_id);
    }

    pub fn active_document(&self) -> Option<DocumentRecord> {
        registry::get_active_document(&self.store)
    }

    pub fn snapshot(&mut self, document_id: &str) -> Option<DocumentVersion> {
        let mut documents = self.documents();
        let mut history = VersionHistory::load(&self.store);
        let version = documents.snapshot(document_id, &mut history, Utc::now())?;
        let _ = documents.save(&mut self.store);
        let _ = history.save(&mut self.store);
        Some(version)
    }

    pub fn versions(&self, document_id: &str) -> Vec<DocumentVersion> {
        VersionHistory::load(&self.store).versions(document_id).to_vec()
    }

    /// Restores `version` of the document. A restored title is pushed into
    /// the tree like any other rename.
    pub fn restore(&mut self, document_id: &str, version: u32) -> Option<RestoredDocumentPayload> {
        let mut documents = self.documents();
        let previous_title = documents.get(document_id)?.title.clone();
        let mut history = VersionHistory::load(&self.store);
        let restored = documents.restore(document_id, version, &mut history, Utc::now())?;
        let _ = documents.save(&mut self.store);
        let _ = history.save(&mut self.store);

        if restored.title != previous_title {
            synchronize_document_title(&mut self.store, &mut self.bus, document_id, &restored.title);
        }
        self.bus.publish(DocumentEvent::DocumentContentChanged {
            document_id: document_id.to_string(),
        });
        Some(restored)
    }

    pub fn save_editor_state(&mut self, document_id: &str, cursor: usize, scroll: Option<f64>) {
        persistence::save_editor_state(&mut self.store, document_id, cursor, scroll);
    }

    pub fn cursor_position(&self, document_id: &str) -> Option<CursorSnapshot> {
        get_cursor_position(&self.store, Some(document_id))
    }

    pub fn scroll_position(&self, document_id: &str) -> Option<ScrollSnapshot> {
        get_scroll_position(&self.store, Some(document_id))
    }
}
