//! 预览视图：选区/光标镜像与滚动同步

pub mod dom;
pub mod mirror;
pub mod scroll_sync;

pub use dom::{BoundingBox, DomKey, LayoutProbe, NodeData, Preview, MARKDOWN_BODY_CLASS};
pub use mirror::{MirrorEvent, SelectionMirror, CURSOR_CLASS, HIGHLIGHT_CLASS};
pub use scroll_sync::{ScrollMetrics, ScrollSync};
