//! Headless workspace core: registry, file tree persistence, reconciliation.

pub mod file_system;
pub mod persistence;
pub mod registry;
pub mod services;
pub mod sync;

pub use file_system::{
    create_document_file, create_folder, initialize_file_system, load_file_system,
    save_file_system, INITIAL_ROOT_ID,
};
pub use persistence::{CursorSnapshot, ScrollSnapshot};
pub use registry::{
    get_active_document, get_document_by_id, switch_to_document, DocumentRegistry,
    VersionHistory,
};
pub use services::{DocumentEvent, EventBus, EventKind, EventReceiver, SubscriptionId};
pub use sync::{
    handle_document_deletion, remove_document_leaves, sync_documents_with_file_system,
    synchronize_document_title, update_file_system_for_document,
};
