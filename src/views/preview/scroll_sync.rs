//! Two-way scroll coupling between the editor and the preview.
//!
//! Whichever side starts a programmatic scroll of the other raises its own
//! guard; scroll events from the other side are ignored until the guard's
//! deadline passes. Time is passed in, so callers drive it from their tick.

use std::time::{Duration, Instant};

use crate::kernel::services::ports::settings::PreviewSettings;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollMetrics {
    pub scroll_top: f64,
    pub scroll_height: f64,
    pub client_height: f64,
}

impl ScrollMetrics {
    pub fn max_scroll(&self) -> f64 {
        (self.scroll_height - self.client_height).max(0.0)
    }

    /// Scroll offset as a fraction of the scrollable range.
    pub fn percentage(&self) -> f64 {
        let range = self.max_scroll();
        let range = if range > 0.0 { range } else { 1.0 };
        (self.scroll_top / range).clamp(0.0, 1.0)
    }

    pub fn offset_for(&self, percentage: f64) -> f64 {
        self.max_scroll() * percentage.clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone)]
pub struct ScrollSync {
    delay: Duration,
    editor_until: Option<Instant>,
    preview_until: Option<Instant>,
}

impl ScrollSync {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            editor_until: None,
            preview_until: None,
        }
    }

    pub fn from_settings(settings: &PreviewSettings) -> Self {
        Self::new(settings.scroll_guard())
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn is_editor_scrolling(&self, now: Instant) -> bool {
        self.editor_until.is_some_and(|t| now < t)
    }

    pub fn is_preview_scrolling(&self, now: Instant) -> bool {
        self.preview_until.is_some_and(|t| now < t)
    }

    /// The editor scrolled to `percentage`. Returns the fraction the preview
    /// should scroll to, or `None` while the preview is driving.
    pub fn on_editor_scroll(&mut self, percentage: f64, now: Instant) -> Option<f64> {
        self.expire(now);
        if self.is_preview_scrolling(now) {
            return None;
        }
        self.editor_until = Some(now + self.delay);
        Some(percentage.clamp(0.0, 1.0))
    }

    /// The preview scrolled. Returns the fraction the editor should scroll
    /// to, or `None` while the editor is driving.
    pub fn on_preview_scroll(&mut self, metrics: ScrollMetrics, now: Instant) -> Option<f64> {
        self.expire(now);
        if self.is_editor_scrolling(now) {
            return None;
        }
        self.preview_until = Some(now + self.delay);
        Some(metrics.percentage())
    }

    /// Clears guards whose deadline has passed.
    pub fn expire(&mut self, now: Instant) {
        if self.editor_until.is_some_and(|t| now >= t) {
            self.editor_until = None;
        }
        if self.preview_until.is_some_and(|t| now >= t) {
            self.preview_until = None;
        }
    }

    /// Drops both guards; used on teardown.
    pub fn reset(&mut self) {
        self.editor_until = None;
        self.preview_until = None;
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/views/preview/scroll_sync.rs"]
mod tests;
