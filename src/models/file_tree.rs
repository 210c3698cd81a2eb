//! 虚拟文件树：文件夹/文件节点的 arena 存储
//!
//! Nodes live in a slot arena addressed by generated keys; a separate id
//! index answers lookups. Every mutating operation takes `&self` and returns
//! a new snapshot: the arena sits behind an `Arc` and is cloned on write, so
//! a caller holding the previous snapshot never observes the change.

use super::file_map::{FileMap, FileMapEntry};
use compact_str::CompactString;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use slotmap::{new_key_type, SlotMap};
use std::sync::Arc;

new_key_type! { pub struct NodeKey; }

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Folder,
    Markdown,
    File,
}

impl NodeKind {
    pub fn is_folder(self) -> bool {
        self == NodeKind::Folder
    }
}

/// Persisted (nested) form of a node, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FileSystemItem {
    Folder(FolderItem),
    Markdown(FileItem),
    File(FileItem),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderItem {
    pub id: String,
    pub name: CompactString,
    #[serde(default)]
    pub children: Vec<FileSystemItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileItem {
    pub id: String,
    pub name: CompactString,
    #[serde(rename = "documentRef", default, skip_serializing_if = "Option::is_none")]
    pub document_ref: Option<String>,
}

impl FileSystemItem {
    pub fn folder(id: impl Into<String>, name: &str) -> Self {
        FileSystemItem::Folder(FolderItem {
            id: id.into(),
            name: name.into(),
            children: Vec::new(),
        })
    }

    /// A markdown leaf whose id doubles as its document reference.
    pub fn markdown(document_id: impl Into<String>, name: &str) -> Self {
        let id = document_id.into();
        FileSystemItem::Markdown(FileItem {
            document_ref: Some(id.clone()),
            id,
            name: name.into(),
        })
    }

    pub fn with_children(mut self, items: Vec<FileSystemItem>) -> Self {
        if let FileSystemItem::Folder(folder) = &mut self {
            folder.children.extend(items);
        }
        self
    }

    pub fn id(&self) -> &str {
        match self {
            FileSystemItem::Folder(f) => &f.id,
            FileSystemItem::Markdown(f) | FileSystemItem::File(f) => &f.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            FileSystemItem::Folder(f) => &f.name,
            FileSystemItem::Markdown(f) | FileSystemItem::File(f) => &f.name,
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            FileSystemItem::Folder(_) => NodeKind::Folder,
            FileSystemItem::Markdown(_) => NodeKind::Markdown,
            FileSystemItem::File(_) => NodeKind::File,
        }
    }

    pub fn document_ref(&self) -> Option<&str> {
        match self {
            FileSystemItem::Folder(_) => None,
            FileSystemItem::Markdown(f) | FileSystemItem::File(f) => f.document_ref.as_deref(),
        }
    }

    pub fn children(&self) -> &[FileSystemItem] {
        match self {
            FileSystemItem::Folder(f) => &f.children,
            _ => &[],
        }
    }
}

#[derive(Debug, Clone)]
struct Node {
    id: String,
    name: CompactString,
    kind: NodeKind,
    document_ref: Option<String>,
    parent: Option<NodeKey>,
    children: Vec<NodeKey>,
}

impl Node {
    fn leaf(file: FileItem, kind: NodeKind, parent: Option<NodeKey>) -> Self {
        Self {
            id: file.id,
            name: file.name,
            kind,
            document_ref: file.document_ref,
            parent,
            children: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default)]
struct Arena {
    nodes: SlotMap<NodeKey, Node>,
    roots: Vec<NodeKey>,
    index: FxHashMap<String, NodeKey>,
}

impl Arena {
    fn lookup(&self, id: &str) -> Option<NodeKey> {
        self.index.get(id).copied()
    }

    fn siblings_mut(&mut self, parent: Option<NodeKey>) -> Option<&mut Vec<NodeKey>> {
        match parent {
            None => Some(&mut self.roots),
            Some(key) => self.nodes.get_mut(key).map(|n| &mut n.children),
        }
    }

    fn siblings(&self, parent: Option<NodeKey>) -> &[NodeKey] {
        match parent {
            None => &self.roots,
            Some(key) => self.nodes.get(key).map(|n| n.children.as_slice()).unwrap_or(&[]),
        }
    }

    fn attach(&mut self, key: NodeKey, parent: Option<NodeKey>, position: Option<usize>) {
        if let Some(node) = self.nodes.get_mut(key) {
            node.parent = parent;
        }
        if let Some(siblings) = self.siblings_mut(parent) {
            let at = position.unwrap_or(siblings.len()).min(siblings.len());
            siblings.insert(at, key);
        }
    }

    fn detach(&mut self, key: NodeKey) {
        let Some(parent) = self.nodes.get(key).map(|n| n.parent) else {
            return;
        };
        if let Some(siblings) = self.siblings_mut(parent) {
            siblings.retain(|&k| k != key);
        }
        if let Some(node) = self.nodes.get_mut(key) {
            node.parent = None;
        }
    }

    fn insert_item(
        &mut self,
        parent: Option<NodeKey>,
        item: FileSystemItem,
        position: Option<usize>,
    ) -> NodeKey {
        let (node, children) = match item {
            FileSystemItem::Folder(folder) => (
                Node {
                    id: folder.id,
                    name: folder.name,
                    kind: NodeKind::Folder,
                    document_ref: None,
                    parent,
                    children: Vec::new(),
                },
                folder.children,
            ),
            FileSystemItem::Markdown(file) => (Node::leaf(file, NodeKind::Markdown, parent), Vec::new()),
            FileSystemItem::File(file) => (Node::leaf(file, NodeKind::File, parent), Vec::new()),
        };

        let id = node.id.clone();
        let key = self.nodes.insert(node);
        self.attach(key, parent, position);
        if let Some(existing) = self.index.get(&id) {
            tracing::warn!(id = %id, ?existing, "duplicate node id in file tree");
        } else {
            self.index.insert(id, key);
        }

        for child in children {
            self.insert_item(Some(key), child, None);
        }
        key
    }

    fn drop_subtree(&mut self, key: NodeKey) {
        let mut stack = vec![key];
        while let Some(node_id) = stack.pop() {
            if let Some(node) = self.nodes.remove(node_id) {
                stack.extend(node.children);
            }
        }
    }

    /// Top-level nodes first, then a depth-first pre-order walk. Lookups of
    /// a duplicated id resolve to the first node in this order.
    fn indexing_order(&self) -> Vec<NodeKey> {
        let mut order = self.roots.clone();
        order.extend(self.preorder());
        order
    }

    fn preorder(&self) -> Vec<NodeKey> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<NodeKey> = self.roots.iter().rev().copied().collect();
        while let Some(key) = stack.pop() {
            if let Some(node) = self.nodes.get(key) {
                out.push(key);
                stack.extend(node.children.iter().rev().copied());
            }
        }
        out
    }

    fn rebuild_index(&mut self) {
        let mut index = FxHashMap::default();
        for key in self.indexing_order() {
            if let Some(node) = self.nodes.get(key) {
                index.entry(node.id.clone()).or_insert(key);
            }
        }
        self.index = index;
    }

    fn is_ancestor(&self, ancestor: NodeKey, mut descendant: NodeKey) -> bool {
        while let Some(node) = self.nodes.get(descendant) {
            match node.parent {
                Some(parent) if parent == ancestor => return true,
                Some(parent) => descendant = parent,
                None => break,
            }
        }
        false
    }

    fn to_item(&self, key: NodeKey) -> Option<FileSystemItem> {
        let node = self.nodes.get(key)?;
        Some(match node.kind {
            NodeKind::Folder => FileSystemItem::Folder(FolderItem {
                id: node.id.clone(),
                name: node.name.clone(),
                children: node
                    .children
                    .iter()
                    .filter_map(|&child| self.to_item(child))
                    .collect(),
            }),
            NodeKind::Markdown => FileSystemItem::Markdown(self.file_item(node)),
            NodeKind::File => FileSystemItem::File(self.file_item(node)),
        })
    }

    fn file_item(&self, node: &Node) -> FileItem {
        FileItem {
            id: node.id.clone(),
            name: node.name.clone(),
            document_ref: node.document_ref.clone(),
        }
    }
}

/// Mutable view handed to [`FileSystem::update_item`]. The id is fixed.
pub struct ItemMut<'a> {
    node: &'a mut Node,
}

impl ItemMut<'_> {
    pub fn id(&self) -> &str {
        &self.node.id
    }

    pub fn kind(&self) -> NodeKind {
        self.node.kind
    }

    pub fn name(&self) -> &str {
        &self.node.name
    }

    pub fn set_name(&mut self, name: &str) {
        self.node.name = name.into();
    }

    pub fn document_ref(&self) -> Option<&str> {
        self.node.document_ref.as_deref()
    }

    pub fn set_document_ref(&mut self, document_ref: Option<String>) {
        if !self.node.kind.is_folder() {
            self.node.document_ref = document_ref;
        }
    }
}

#[derive(Debug, Clone)]
pub struct FileSystemRow {
    pub id: String,
    pub depth: u16,
    pub name: CompactString,
    pub kind: NodeKind,
    pub document_ref: Option<String>,
}

enum Destination {
    TopLevel,
    Into(NodeKey),
    After(NodeKey),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<FileSystemItem>", into = "Vec<FileSystemItem>")]
pub struct FileSystem {
    arena: Arc<Arena>,
}

impl From<Vec<FileSystemItem>> for FileSystem {
    fn from(items: Vec<FileSystemItem>) -> Self {
        Self::from_items(items)
    }
}

impl From<FileSystem> for Vec<FileSystemItem> {
    fn from(tree: FileSystem) -> Self {
        tree.to_items()
    }
}

impl PartialEq for FileSystem {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.arena, &other.arena) || self.to_items() == other.to_items()
    }
}

impl FileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_items(items: Vec<FileSystemItem>) -> Self {
        let mut arena = Arena::default();
        for item in items {
            arena.insert_item(None, item, None);
        }
        // nested duplicates were indexed in insertion order; settle on the
        // top-level-first rule
        arena.rebuild_index();
        Self {
            arena: Arc::new(arena),
        }
    }

    pub fn to_items(&self) -> Vec<FileSystemItem> {
        self.arena
            .roots
            .iter()
            .filter_map(|&key| self.arena.to_item(key))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.roots.is_empty()
    }

    /// Total node count, nested nodes included.
    pub fn len(&self) -> usize {
        self.arena.nodes.len()
    }

    /// True when both snapshots share the same arena (no write happened).
    pub fn same_snapshot(&self, other: &FileSystem) -> bool {
        Arc::ptr_eq(&self.arena, &other.arena)
    }

    fn edit(&self, f: impl FnOnce(&mut Arena)) -> Self {
        let mut next = self.clone();
        f(Arc::make_mut(&mut next.arena));
        next
    }

    pub fn contains(&self, id: &str) -> bool {
        self.arena.lookup(id).is_some()
    }

    pub fn kind_of(&self, id: &str) -> Option<NodeKind> {
        let key = self.arena.lookup(id)?;
        self.arena.nodes.get(key).map(|n| n.kind)
    }

    pub fn is_folder(&self, id: &str) -> bool {
        self.kind_of(id).is_some_and(NodeKind::is_folder)
    }

    pub fn name_of(&self, id: &str) -> Option<&str> {
        let key = self.arena.lookup(id)?;
        self.arena.nodes.get(key).map(|n| n.name.as_str())
    }

    /// `Some(None)` for a top-level node, `None` when `id` is unknown.
    pub fn parent_of(&self, id: &str) -> Option<Option<&str>> {
        let key = self.arena.lookup(id)?;
        let node = self.arena.nodes.get(key)?;
        Some(
            node.parent
                .and_then(|p| self.arena.nodes.get(p))
                .map(|p| p.id.as_str()),
        )
    }

    pub fn root_ids(&self) -> Vec<&str> {
        self.ids_of(&self.arena.roots)
    }

    pub fn children_of(&self, id: &str) -> Option<Vec<&str>> {
        let key = self.arena.lookup(id)?;
        let node = self.arena.nodes.get(key)?;
        node.kind.is_folder().then(|| self.ids_of(&node.children))
    }

    fn ids_of(&self, keys: &[NodeKey]) -> Vec<&str> {
        keys.iter()
            .filter_map(|&k| self.arena.nodes.get(k))
            .map(|n| n.id.as_str())
            .collect()
    }

    pub fn find_item(&self, id: &str) -> Option<FileSystemItem> {
        self.arena.to_item(self.arena.lookup(id)?)
    }

    /// Ids of every non-folder node.
    pub fn leaf_ids(&self) -> FxHashSet<String> {
        self.arena
            .nodes
            .values()
            .filter(|n| !n.kind.is_folder())
            .map(|n| n.id.clone())
            .collect()
    }

    /// First leaf (in lookup order) that references `document_id`.
    pub fn find_leaf_by_document(&self, document_id: &str) -> Option<&str> {
        self.leaves_by_document(document_id).into_iter().next()
    }

    pub fn leaves_by_document(&self, document_id: &str) -> Vec<&str> {
        self.arena
            .preorder()
            .into_iter()
            .filter_map(|k| self.arena.nodes.get(k))
            .filter(|n| !n.kind.is_folder() && n.document_ref.as_deref() == Some(document_id))
            .map(|n| n.id.as_str())
            .collect()
    }

    /// `(leaf id, document ref)` for every leaf at or below `id`.
    pub fn descendant_leaves(&self, id: &str) -> Vec<(&str, Option<&str>)> {
        let Some(start) = self.arena.lookup(id) else {
            return Vec::new();
        };
        let mut out = Vec::new();
        let mut stack = vec![start];
        while let Some(key) = stack.pop() {
            let Some(node) = self.arena.nodes.get(key) else {
                continue;
            };
            if node.kind.is_folder() {
                stack.extend(node.children.iter().rev().copied());
            } else {
                out.push((node.id.as_str(), node.document_ref.as_deref()));
            }
        }
        out
    }

    /// Inserts `item` as the last child of folder `parent_id`, or at the top
    /// level when `parent_id` is `None`. An unknown or non-folder parent
    /// leaves the tree unchanged.
    pub fn add_item_to_folder(&self, parent_id: Option<&str>, item: FileSystemItem) -> Self {
        let parent = match parent_id {
            None => None,
            Some(id) => match self.arena.lookup(id) {
                Some(key) if self.arena.nodes[key].kind.is_folder() => Some(key),
                _ => {
                    tracing::debug!(parent_id = id, item = item.id(), "add target is not a folder");
                    return self.clone();
                }
            },
        };
        self.edit(|arena| {
            arena.insert_item(parent, item, None);
        })
    }

    /// Removes the node with `item_id` and its whole subtree. Unknown ids are
    /// a no-op.
    pub fn remove_item(&self, item_id: &str) -> Self {
        let Some(key) = self.arena.lookup(item_id) else {
            tracing::debug!(item_id, "remove target not found");
            return self.clone();
        };
        self.edit(|arena| {
            arena.detach(key);
            arena.drop_subtree(key);
            arena.rebuild_index();
        })
    }

    /// Detaches `item_id` and re-attaches it:
    /// - `target_id == None`: appended at the top level;
    /// - `as_child` and the target is a folder: appended to its children;
    /// - otherwise: inserted right after the target among its siblings.
    ///
    /// A target that cannot be resolved, or that is the item itself or lies
    /// inside the moved subtree, leaves the tree unchanged.
    pub fn move_item(&self, item_id: &str, target_id: Option<&str>, as_child: bool) -> Self {
        let Some(item) = self.arena.lookup(item_id) else {
            tracing::debug!(item_id, "move source not found");
            return self.clone();
        };

        let destination = match target_id {
            None => Destination::TopLevel,
            Some(target_id) => {
                let Some(target) = self.arena.lookup(target_id) else {
                    tracing::warn!(item_id, target_id, "move target not found; tree unchanged");
                    return self.clone();
                };
                if target == item || self.arena.is_ancestor(item, target) {
                    tracing::debug!(item_id, target_id, "move target inside moved subtree");
                    return self.clone();
                }
                if as_child && self.arena.nodes[target].kind.is_folder() {
                    Destination::Into(target)
                } else {
                    Destination::After(target)
                }
            }
        };

        self.edit(|arena| {
            arena.detach(item);
            match destination {
                Destination::TopLevel => arena.attach(item, None, None),
                Destination::Into(folder) => arena.attach(item, Some(folder), None),
                Destination::After(target) => {
                    let parent = arena.nodes[target].parent;
                    let position = arena
                        .siblings(parent)
                        .iter()
                        .position(|&k| k == target)
                        .map(|i| i + 1);
                    arena.attach(item, parent, position);
                }
            }
        })
    }

    /// Applies `update` to the node with `item_id`; unknown ids are a no-op.
    pub fn update_item(&self, item_id: &str, update: impl FnOnce(&mut ItemMut<'_>)) -> Self {
        let Some(key) = self.arena.lookup(item_id) else {
            tracing::debug!(item_id, "update target not found");
            return self.clone();
        };
        self.edit(|arena| {
            if let Some(node) = arena.nodes.get_mut(key) {
                update(&mut ItemMut { node });
            }
        })
    }

    /// Flat `id -> entry` projection annotated with parent ids.
    pub fn generate_file_map(&self) -> FileMap {
        let mut map = FileMap::with_capacity(self.len());
        for key in self.arena.indexing_order() {
            let Some(node) = self.arena.nodes.get(key) else {
                continue;
            };
            if map.contains(&node.id) {
                continue;
            }
            map.insert(FileMapEntry {
                id: node.id.clone(),
                name: node.name.clone(),
                kind: node.kind,
                document_ref: node.document_ref.clone(),
                parent_id: node
                    .parent
                    .and_then(|p| self.arena.nodes.get(p))
                    .map(|p| p.id.clone()),
                children: self.ids_of(&node.children).into_iter().map(String::from).collect(),
            });
        }
        map
    }

    pub fn flatten_for_view(&self) -> Vec<FileSystemRow> {
        let mut result = Vec::with_capacity(self.len());
        let mut stack: Vec<(NodeKey, u16)> =
            self.arena.roots.iter().rev().map(|&k| (k, 0)).collect();

        while let Some((key, depth)) = stack.pop() {
            let Some(node) = self.arena.nodes.get(key) else {
                continue;
            };
            result.push(FileSystemRow {
                id: node.id.clone(),
                depth,
                name: node.name.clone(),
                kind: node.kind,
                document_ref: node.document_ref.clone(),
            });
            for &child in node.children.iter().rev() {
                stack.push((child, depth + 1));
            }
        }

        result
    }
}

/// Folder ids look like `folder-<unix millis>-<7 base36 chars>`; everything
/// else gets a v4 UUID.
pub fn generate_unique_id(kind: NodeKind) -> String {
    let uuid = uuid::Uuid::new_v4();
    if !kind.is_folder() {
        return uuid.to_string();
    }

    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut bits = uuid.as_u128();
    let mut suffix = String::with_capacity(7);
    for _ in 0..7 {
        suffix.push(DIGITS[(bits % 36) as usize] as char);
        bits /= 36;
    }
    format!("folder-{}-{suffix}", chrono::Utc::now().timestamp_millis())
}

#[cfg(test)]
#[path = "../../tests/unit/models/file_tree.rs"]
mod tests;
