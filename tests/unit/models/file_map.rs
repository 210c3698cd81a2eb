use super::*;
use crate::models::file_tree::{FileSystem, FileSystemItem};

fn sample_tree() -> FileSystem {
    FileSystem::from_items(vec![
        FileSystemItem::folder("A", "A").with_children(vec![
            FileSystemItem::folder("B", "B").with_children(vec![
                FileSystemItem::folder("C", "C")
                    .with_children(vec![FileSystemItem::markdown("deep", "deep.md")]),
            ]),
        ]),
        FileSystemItem::markdown("top", "top.md"),
    ])
}

#[test]
fn test_every_node_appears_once() {
    let tree = sample_tree();
    let map = tree.generate_file_map();

    assert_eq!(map.len(), tree.len());
    for id in ["A", "B", "C", "deep", "top"] {
        assert!(map.contains(id), "{id} missing");
    }
    assert_eq!(map, tree.generate_file_map());
}

#[test]
fn test_parent_ids() {
    let map = sample_tree().generate_file_map();
    assert_eq!(map.get("A").unwrap().parent_id, None);
    assert_eq!(map.get("top").unwrap().parent_id, None);
    assert_eq!(map.get("deep").unwrap().parent_id.as_deref(), Some("C"));
    assert_eq!(map.get("A").unwrap().children, vec!["B".to_string()]);
}

#[test]
fn test_no_node_is_its_own_ancestor() {
    let map = sample_tree().generate_file_map();
    for entry in map.iter() {
        let path = map.path_to_item(&entry.id);
        assert!(!path.contains(&entry.id));
    }
}

#[test]
fn test_path_to_item_root_first() {
    let map = sample_tree().generate_file_map();
    assert_eq!(get_path_to_item(&map, "deep"), vec!["A", "B", "C"]);
    assert_eq!(get_path_to_item(&map, "A"), Vec::<String>::new());
    assert_eq!(get_path_to_item(&map, "unknown"), Vec::<String>::new());
}

#[test]
fn test_path_to_item_stops_on_cycle() {
    let mut map = FileMap::new();
    for (id, parent) in [("x", "y"), ("y", "x")] {
        map.insert(FileMapEntry {
            id: id.to_string(),
            name: id.into(),
            kind: NodeKind::Folder,
            document_ref: None,
            parent_id: Some(parent.to_string()),
            children: Vec::new(),
        });
    }
    assert_eq!(get_path_to_item(&map, "x").len(), 2);
}

#[test]
fn test_leaf_ids() {
    let map = sample_tree().generate_file_map();
    let leaves = map.leaf_ids();
    assert_eq!(leaves.len(), 2);
    assert!(leaves.contains("deep"));
    assert!(leaves.contains("top"));
}
