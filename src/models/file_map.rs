//! Flat parent-annotated projection of a [`FileSystem`](super::FileSystem).
//!
//! Recomputed from the tree on demand and never persisted.

use super::file_tree::NodeKind;
use compact_str::CompactString;
use rustc_hash::{FxHashMap, FxHashSet};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMapEntry {
    pub id: String,
    pub name: CompactString,
    pub kind: NodeKind,
    pub document_ref: Option<String>,
    /// `None` for top-level nodes.
    pub parent_id: Option<String>,
    pub children: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileMap {
    entries: FxHashMap<String, FileMapEntry>,
}

impl FileMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    pub fn insert(&mut self, entry: FileMapEntry) {
        self.entries.insert(entry.id.clone(), entry);
    }

    pub fn get(&self, id: &str) -> Option<&FileMapEntry> {
        self.entries.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FileMapEntry> {
        self.entries.values()
    }

    pub fn leaf_ids(&self) -> FxHashSet<&str> {
        self.entries
            .values()
            .filter(|e| !e.kind.is_folder())
            .map(|e| e.id.as_str())
            .collect()
    }

    pub fn path_to_item(&self, item_id: &str) -> Vec<String> {
        get_path_to_item(self, item_id)
    }
}

/// Ancestor ids of `item_id`, outermost first, excluding the item itself.
///
/// Stops after `map.len()` hops so a hand-built map with a parent cycle
/// cannot loop forever.
pub fn get_path_to_item(map: &FileMap, item_id: &str) -> Vec<String> {
    let mut path = Vec::new();
    let mut current = item_id;

    for _ in 0..map.len() {
        let Some(parent) = map.get(current).and_then(|e| e.parent_id.as_deref()) else {
            break;
        };
        path.push(parent.to_string());
        current = parent;
    }

    path.reverse();
    path
}

#[cfg(test)]
#[path = "../../tests/unit/models/file_map.rs"]
mod tests;
