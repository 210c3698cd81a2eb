//! Reconciliation between the document registry and the file tree.
//!
//! The registry is the source of truth for documents; the tree only gains,
//! renames or loses leaves to follow it. Every entry point absorbs failures:
//! unreadable state degrades to empty, failed writes are logged by the store
//! helpers and the operation carries on.

use crate::kernel::file_system::{initialize_file_system, load_file_system, save_file_system};
use crate::kernel::registry::DocumentRegistry;
use crate::kernel::services::bus::{DocumentEvent, EventBus};
use crate::kernel::services::ports::store::{KeyValueStore, FILE_SYSTEM_KEY};
use crate::models::{markdown_file_name, DocumentRecord, FileSystem, FileSystemItem};
use chrono::Utc;

fn leaf_for(document: &DocumentRecord) -> FileSystemItem {
    FileSystemItem::markdown(document.id.clone(), &document.file_name())
}

/// Folder a new leaf for `document` goes into: its recorded folder when that
/// folder is in the tree, otherwise the top level.
fn placement<'a>(tree: &FileSystem, document: &'a DocumentRecord) -> Option<&'a str> {
    match document.parent_folder() {
        Some(folder) if tree.is_folder(folder) => Some(folder),
        Some(folder) => {
            tracing::warn!(
                document_id = %document.id,
                folder_id = folder,
                "document folder missing from tree; placing at top level"
            );
            None
        }
        None => None,
    }
}

/// Adds a leaf for every document that has none. The tree is written back
/// only when something was added.
pub fn sync_documents_with_file_system<S: KeyValueStore + ?Sized>(
    store: &mut S,
    documents: &[DocumentRecord],
    root_name: &str,
) -> FileSystem {
    let mut tree = load_file_system(store);
    if documents.is_empty() {
        return tree;
    }
    if tree.is_empty() {
        tree = initialize_file_system(store, root_name);
    }

    // Repeated ids in `documents` must still yield a single leaf.
    let mut leaf_ids = tree.leaf_ids();
    let mut added = 0usize;
    for document in documents {
        if !leaf_ids.insert(document.id.clone()) {
            continue;
        }
        let parent = placement(&tree, document);
        tree = tree.add_item_to_folder(parent, leaf_for(document));
        added += 1;
    }

    if added > 0 {
        tracing::info!(added, "reconciled file tree with documents");
        let _ = save_file_system(store, &tree);
    }
    tree
}

/// Renames the leaf that references `document`, or adds one if none does.
pub fn update_file_system_for_document(tree: &FileSystem, document: &DocumentRecord) -> FileSystem {
    match tree.find_leaf_by_document(&document.id) {
        Some(leaf_id) => {
            let name = document.file_name();
            tree.update_item(leaf_id, |item| item.set_name(&name))
        }
        None => tree.add_item_to_folder(placement(tree, document), leaf_for(document)),
    }
}

/// Commits a new title to the registry and to every leaf referencing the
/// document, then publishes `document-title-changed` followed by
/// `file-system-updated`.
pub fn synchronize_document_title<S: KeyValueStore + ?Sized>(
    store: &mut S,
    bus: &mut EventBus,
    document_id: &str,
    title: &str,
) {
    if document_id.is_empty() || title.is_empty() {
        return;
    }

    let mut registry = DocumentRegistry::load(store);
    if !registry.is_empty() {
        if !registry.set_title(document_id, title, Utc::now()) {
            tracing::debug!(document_id, "title change for unknown document");
        }
        let _ = registry.save(store);
    }

    if store.get(FILE_SYSTEM_KEY).is_some() {
        let tree = load_file_system(store);
        let name = markdown_file_name(title);
        let leaves: Vec<String> = tree
            .leaves_by_document(document_id)
            .into_iter()
            .map(String::from)
            .collect();
        let renamed = leaves.iter().fold(tree, |tree, leaf_id| {
            tree.update_item(leaf_id, |item| item.set_name(&name))
        });
        let _ = save_file_system(store, &renamed);
    }

    bus.publish(DocumentEvent::DocumentTitleChanged {
        document_id: document_id.to_string(),
        title: title.to_string(),
    });
    bus.publish(DocumentEvent::FileSystemUpdated);
}

/// Drops the record from the registry and announces it. Leaves that still
/// reference the document are left for the tree owner to remove with
/// [`remove_document_leaves`].
pub fn handle_document_deletion<S: KeyValueStore + ?Sized>(
    store: &mut S,
    bus: &mut EventBus,
    document_id: &str,
) {
    if document_id.is_empty() {
        return;
    }

    let mut registry = DocumentRegistry::load(store);
    if !registry.is_empty() {
        registry.remove(document_id);
        let _ = registry.save(store);
    }

    bus.publish(DocumentEvent::DocumentDeleted {
        document_id: document_id.to_string(),
    });
    bus.publish(DocumentEvent::DocumentsUpdated);
}

/// Removes every leaf that references `document_id`.
pub fn remove_document_leaves(tree: &FileSystem, document_id: &str) -> FileSystem {
    let leaves: Vec<String> = tree
        .leaves_by_document(document_id)
        .into_iter()
        .map(String::from)
        .collect();
    leaves
        .iter()
        .fold(tree.clone(), |tree, leaf_id| tree.remove_item(leaf_id))
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/sync.rs"]
mod tests;
