//! 数据模型层

pub mod document;
pub mod file_map;
pub mod file_tree;
pub mod selection;

pub use document::{
    markdown_file_name, DocumentMetadata, DocumentRecord, DocumentVersion,
    RestoredDocumentPayload, ROOT_FOLDER_ID,
};
pub use file_map::{get_path_to_item, FileMap, FileMapEntry};
pub use file_tree::{
    generate_unique_id, FileItem, FileSystem, FileSystemItem, FileSystemRow, FolderItem,
    ItemMut, NodeKey, NodeKind,
};
pub use selection::{CursorPosition, SelectionState};
