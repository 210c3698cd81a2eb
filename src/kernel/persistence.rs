//! Last-known cursor and scroll positions, kept so a reload can put the
//! editor back where it was.

use crate::kernel::services::ports::store::{
    read_json, write_json, KeyValueStore, CURSOR_KEY, SCROLL_KEY,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CursorSnapshot {
    pub document_id: String,
    pub position: usize,
    /// Unix milliseconds.
    pub timestamp: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollSnapshot {
    pub document_id: String,
    pub scroll_percentage: f64,
    pub timestamp: i64,
}

const RESERVED: [&str; 3] = ["documentId", "position", "timestamp"];

fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

pub fn save_cursor_position<S: KeyValueStore + ?Sized>(
    store: &mut S,
    document_id: &str,
    position: usize,
    mut extra: Map<String, Value>,
) {
    if document_id.is_empty() {
        return;
    }
    extra.retain(|k, _| !RESERVED.contains(&k.as_str()));
    let snapshot = CursorSnapshot {
        document_id: document_id.to_string(),
        position,
        timestamp: now_millis(),
        extra,
    };
    let _ = write_json(store, CURSOR_KEY, &snapshot);
}

/// The saved cursor, if any. With `document_id` set, a cursor saved for a
/// different document is ignored.
pub fn get_cursor_position<S: KeyValueStore + ?Sized>(
    store: &S,
    document_id: Option<&str>,
) -> Option<CursorSnapshot> {
    let saved: CursorSnapshot = read_json(store, CURSOR_KEY)?;
    match document_id {
        Some(id) if !id.is_empty() && saved.document_id != id => None,
        _ => Some(saved),
    }
}

pub fn clear_cursor_position<S: KeyValueStore + ?Sized>(store: &mut S) {
    store.remove(CURSOR_KEY);
}

pub fn save_scroll_position<S: KeyValueStore + ?Sized>(
    store: &mut S,
    document_id: &str,
    scroll_percentage: f64,
) {
    if document_id.is_empty() || !scroll_percentage.is_finite() {
        return;
    }
    let snapshot = ScrollSnapshot {
        document_id: document_id.to_string(),
        scroll_percentage,
        timestamp: now_millis(),
    };
    let _ = write_json(store, SCROLL_KEY, &snapshot);
}

pub fn get_scroll_position<S: KeyValueStore + ?Sized>(
    store: &S,
    document_id: Option<&str>,
) -> Option<ScrollSnapshot> {
    let saved: ScrollSnapshot = read_json(store, SCROLL_KEY)?;
    match document_id {
        Some(id) if !id.is_empty() && saved.document_id != id => None,
        _ => Some(saved),
    }
}

pub fn save_editor_state<S: KeyValueStore + ?Sized>(
    store: &mut S,
    document_id: &str,
    cursor_position: usize,
    scroll_percentage: Option<f64>,
) {
    if document_id.is_empty() {
        return;
    }
    save_cursor_position(store, document_id, cursor_position, Map::new());
    if let Some(pct) = scroll_percentage {
        save_scroll_position(store, document_id, pct);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/persistence.rs"]
mod tests;
