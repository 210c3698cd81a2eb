//! Persistence of the virtual file tree and the user-facing create helpers.

use crate::kernel::registry::DocumentRegistry;
use crate::kernel::services::ports::store::{
    read_json, write_json, KeyValueStore, StoreError, FILE_SYSTEM_KEY,
};
use crate::models::{
    generate_unique_id, markdown_file_name, DocumentRecord, FileSystem, FileSystemItem, NodeKind,
};

/// Id of the folder created when no tree has been saved yet.
pub const INITIAL_ROOT_ID: &str = "folder-root";

/// Missing or malformed data yields an empty tree.
pub fn load_file_system<S: KeyValueStore + ?Sized>(store: &S) -> FileSystem {
    read_json(store, FILE_SYSTEM_KEY).unwrap_or_default()
}

pub fn save_file_system<S: KeyValueStore + ?Sized>(
    store: &mut S,
    tree: &FileSystem,
) -> Result<(), StoreError> {
    write_json(store, FILE_SYSTEM_KEY, tree)
}

/// Replaces the stored tree with a single empty root folder.
pub fn initialize_file_system<S: KeyValueStore + ?Sized>(
    store: &mut S,
    root_name: &str,
) -> FileSystem {
    let tree = FileSystem::from_items(vec![FileSystemItem::folder(INITIAL_ROOT_ID, root_name)]);
    let _ = save_file_system(store, &tree);
    tree
}

/// `parent_id` when it names a folder in `tree`; anything else means the top
/// level.
fn existing_folder<'a>(tree: &FileSystem, parent_id: Option<&'a str>) -> Option<&'a str> {
    match parent_id {
        Some(folder) if tree.is_folder(folder) => Some(folder),
        Some(folder) => {
            tracing::warn!(folder_id = folder, "parent folder missing from tree; using top level");
            None
        }
        None => None,
    }
}

/// Creates a document and the markdown leaf that points at it. Both share a
/// freshly generated id. `file_name` gets a `.md` suffix if it lacks one and
/// the document title is the name without it.
pub fn create_document_file<S: KeyValueStore + ?Sized>(
    store: &mut S,
    parent_id: Option<&str>,
    file_name: &str,
) -> (FileSystemItem, DocumentRecord) {
    let id = generate_unique_id(NodeKind::Markdown);
    let file_name = markdown_file_name(file_name);
    let title = &file_name[..file_name.len() - ".md".len()];

    let tree = load_file_system(store);
    let parent_id = existing_folder(&tree, parent_id);

    let leaf = FileSystemItem::markdown(id.clone(), &file_name);
    let document = DocumentRecord::new(id, title, parent_id);

    let mut registry = DocumentRegistry::load(store);
    registry.insert(document.clone());
    let _ = registry.save(store);

    let tree = tree.add_item_to_folder(parent_id, leaf.clone());
    let _ = save_file_system(store, &tree);

    tracing::debug!(document_id = %document.id, ?parent_id, "created document file");
    (leaf, document)
}

pub fn create_folder<S: KeyValueStore + ?Sized>(
    store: &mut S,
    parent_id: Option<&str>,
    folder_name: &str,
) -> FileSystemItem {
    let folder = FileSystemItem::folder(generate_unique_id(NodeKind::Folder), folder_name);
    let tree = load_file_system(store);
    let parent_id = existing_folder(&tree, parent_id);
    let tree = tree.add_item_to_folder(parent_id, folder.clone());
    let _ = save_file_system(store, &tree);
    folder
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/file_system.rs"]
mod tests;
