//! Projects the editor selection and caret onto the rendered preview.
//!
//! Both passes are idempotent: they strip whatever they injected last time
//! before adding anything new. The mapping is proportional, not exact: the
//! highlight wraps the first rendered occurrence of the selected text, and
//! the caret bar sits on the element whose index matches the cursor's
//! relative offset in the buffer.

use super::dom::{DomKey, LayoutProbe, Preview};
use crate::models::{CursorPosition, SelectionState};

pub const HIGHLIGHT_CLASS: &str = "preview-highlight";
pub const CURSOR_CLASS: &str = "preview-cursor";

const CURSOR_COLOR: &str = "#3b82f6";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MirrorEvent {
    /// Byte offsets of the editor's selection; `start == end` is a caret.
    SelectionChanged { start: usize, end: usize },
    FocusChanged(bool),
}

#[derive(Debug, Clone, Copy)]
struct PendingCursor {
    indicator: DomKey,
    relative: f64,
}

#[derive(Debug, Default)]
pub struct SelectionMirror {
    selection: SelectionState,
    cursor: CursorPosition,
    focused: bool,
    pending: Option<PendingCursor>,
}

impl SelectionMirror {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn cursor(&self) -> CursorPosition {
        self.cursor
    }

    pub fn has_focus(&self) -> bool {
        self.focused
    }

    /// True while a caret bar waits for [`Self::flush_deferred`].
    pub fn has_pending_measurement(&self) -> bool {
        self.pending.is_some()
    }

    pub fn handle(&mut self, event: MirrorEvent, buffer: &str, preview: &mut Preview) {
        match event {
            MirrorEvent::SelectionChanged { start, end } => {
                self.selection = SelectionState::from_buffer(buffer, start, end);
                self.cursor = CursorPosition::at(buffer, self.selection.end);
                self.highlight_pass(preview);
            }
            MirrorEvent::FocusChanged(focused) => self.focused = focused,
        }
        self.cursor_pass(buffer.len(), preview);
    }

    /// Unwraps every previous highlight, then wraps the first occurrence of
    /// the selected text. Returns the new highlight element.
    pub fn highlight_pass(&self, preview: &mut Preview) -> Option<DomKey> {
        for marker in preview.elements_with_class(HIGHLIGHT_CLASS) {
            let parent = preview.parent(marker);
            preview.unwrap(marker);
            if let Some(parent) = parent {
                preview.normalize(parent);
            }
        }

        let needle = self.selection.text.as_str();
        if !self.selection.active || needle.trim().is_empty() {
            return None;
        }

        preview
            .text_nodes(preview.body())
            .into_iter()
            .find_map(|node| {
                let at = preview.text(node)?.find(needle)?;
                Some((node, at))
            })
            .and_then(|(node, at)| {
                preview.wrap_text_range(node, at, at + needle.len(), "span", Some(HIGHLIGHT_CLASS))
            })
    }

    /// Removes the caret bar and, when the editor has focus, appends a new
    /// one whose position is measured on the next [`Self::flush_deferred`].
    pub fn cursor_pass(&mut self, buffer_len: usize, preview: &mut Preview) -> Option<DomKey> {
        for indicator in preview.elements_with_class(CURSOR_CLASS) {
            preview.remove(indicator);
        }
        self.pending = None;

        if !self.focused {
            return None;
        }

        let indicator = preview.append_element(preview.root(), "div", Some(CURSOR_CLASS));
        for (name, value) in [
            ("position", "absolute"),
            ("left", "0"),
            ("width", "2px"),
            ("background-color", CURSOR_COLOR),
            ("animation", "cursor-blink 1s infinite"),
        ] {
            preview.set_style(indicator, name, value);
        }

        self.pending = Some(PendingCursor {
            indicator,
            relative: self.cursor.relative_position(buffer_len),
        });
        Some(indicator)
    }

    /// Positions the pending caret bar against the rendered element at
    /// `floor(relative * count)`. Returns the element it was aligned to.
    pub fn flush_deferred(&mut self, preview: &mut Preview, probe: &dyn LayoutProbe) -> Option<DomKey> {
        let pending = self.pending.take()?;
        if !preview.contains(pending.indicator) {
            return None;
        }

        let elements = preview.elements(preview.body());
        if elements.is_empty() {
            return None;
        }
        let index = ((elements.len() as f64 * pending.relative).floor() as usize)
            .min(elements.len() - 1);
        let target = elements[index];

        let rect = probe.bounding_box(preview, target)?;
        let origin = probe.bounding_box(preview, preview.root())?;
        preview.set_style(pending.indicator, "top", format!("{}px", rect.top - origin.top));
        preview.set_style(pending.indicator, "height", format!("{}px", rect.height));
        Some(target)
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/views/preview/mirror.rs"]
mod tests;
