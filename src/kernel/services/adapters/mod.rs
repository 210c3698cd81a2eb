//! Service adapters: OS specific implementations (filesystem, paths).

pub mod paths;
pub mod settings;
pub mod store;

pub use paths::{ensure_log_dir, ensure_store_dir, get_log_dir, get_store_dir};
pub use settings::{ensure_settings_file, get_settings_path, load_settings, load_settings_from};
pub use store::{FileStore, MemoryStore};
