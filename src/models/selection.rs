//! 选区与光标：原始文本缓冲区上的字节偏移

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionState {
    pub start: usize,
    pub end: usize,
    pub active: bool,
    pub text: String,
}

impl SelectionState {
    /// Selection over `buffer[start..end]`. Offsets are clamped to the buffer
    /// and snapped back to char boundaries; reversed ranges are normalised.
    pub fn from_buffer(buffer: &str, start: usize, end: usize) -> Self {
        let (start, end) = if start <= end { (start, end) } else { (end, start) };
        let start = floor_char_boundary(buffer, start);
        let end = floor_char_boundary(buffer, end);
        Self {
            start,
            end,
            active: start != end,
            text: buffer[start..end].to_string(),
        }
    }

    pub fn is_empty(&self) -> bool {
        !self.active
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CursorPosition {
    pub line: usize,
    pub column: usize,
    pub char_index: usize,
}

impl Default for CursorPosition {
    fn default() -> Self {
        Self {
            line: 1,
            column: 1,
            char_index: 0,
        }
    }
}

impl CursorPosition {
    /// 1-based line/column of byte offset `char_index`. The column counts
    /// chars since the last newline.
    pub fn at(buffer: &str, char_index: usize) -> Self {
        let char_index = floor_char_boundary(buffer, char_index);
        let before = &buffer.as_bytes()[..char_index];
        let line = memchr::memchr_iter(b'\n', before).count() + 1;
        let line_start = memchr::memrchr(b'\n', before).map(|i| i + 1).unwrap_or(0);
        let column = buffer[line_start..char_index].chars().count() + 1;
        Self {
            line,
            column,
            char_index,
        }
    }

    /// Cursor position as a fraction of the buffer length, `0.0` for an empty
    /// buffer.
    pub fn relative_position(&self, total_len: usize) -> f64 {
        if total_len == 0 {
            return 0.0;
        }
        (self.char_index as f64 / total_len as f64).clamp(0.0, 1.0)
    }
}

pub(crate) fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    let mut i = index;
    while !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}

#[cfg(test)]
#[path = "../../tests/unit/models/selection.rs"]
mod tests;
