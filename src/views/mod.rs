//! 视图层模块
//!
//! - preview: 渲染预览（选区高亮、光标指示、滚动同步）

pub mod preview;

pub use preview::{
    BoundingBox, LayoutProbe, MirrorEvent, Preview, ScrollMetrics, ScrollSync, SelectionMirror,
};
