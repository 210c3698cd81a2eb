//! Rendered preview as an arena of element and text nodes.
//!
//! The markdown renderer is external; whatever it produces is built into a
//! [`Preview`] through the append API. The preview root is the scroll
//! container; rendered content lives under its `.markdown-body` child.

use compact_str::CompactString;
use slotmap::{new_key_type, SlotMap};
use std::fmt::Write;

new_key_type! { pub struct DomKey; }

pub const MARKDOWN_BODY_CLASS: &str = "markdown-body";

#[derive(Debug, Clone, PartialEq)]
pub enum NodeData {
    Element {
        tag: CompactString,
        class: Option<CompactString>,
        style: Vec<(CompactString, String)>,
    },
    Text(String),
}

#[derive(Debug, Clone)]
struct DomNode {
    data: NodeData,
    parent: Option<DomKey>,
    children: Vec<DomKey>,
}

/// Top offset and height in pixels, in any coordinate space shared by all
/// boxes of one measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub top: f32,
    pub height: f32,
}

/// Layout measurement, supplied by whatever actually lays the preview out.
pub trait LayoutProbe {
    fn bounding_box(&self, preview: &Preview, node: DomKey) -> Option<BoundingBox>;
}

#[derive(Debug, Clone)]
pub struct Preview {
    nodes: SlotMap<DomKey, DomNode>,
    root: DomKey,
    body: DomKey,
}

impl Default for Preview {
    fn default() -> Self {
        Self::new()
    }
}

impl Preview {
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(DomNode {
            data: element("div", Some("preview")),
            parent: None,
            children: Vec::new(),
        });
        let body = nodes.insert(DomNode {
            data: element("div", Some(MARKDOWN_BODY_CLASS)),
            parent: Some(root),
            children: Vec::new(),
        });
        nodes[root].children.push(body);
        Self { nodes, root, body }
    }

    pub fn root(&self) -> DomKey {
        self.root
    }

    pub fn body(&self) -> DomKey {
        self.body
    }

    pub fn contains(&self, key: DomKey) -> bool {
        self.nodes.contains_key(key)
    }

    pub fn data(&self, key: DomKey) -> Option<&NodeData> {
        self.nodes.get(key).map(|n| &n.data)
    }

    pub fn parent(&self, key: DomKey) -> Option<DomKey> {
        self.nodes.get(key)?.parent
    }

    pub fn children(&self, key: DomKey) -> &[DomKey] {
        self.nodes
            .get(key)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn text(&self, key: DomKey) -> Option<&str> {
        match &self.nodes.get(key)?.data {
            NodeData::Text(text) => Some(text),
            NodeData::Element { .. } => None,
        }
    }

    pub fn has_class(&self, key: DomKey, class: &str) -> bool {
        matches!(
            self.nodes.get(key).map(|n| &n.data),
            Some(NodeData::Element { class: Some(c), .. }) if c.as_str() == class
        )
    }

    pub fn style(&self, key: DomKey, name: &str) -> Option<&str> {
        match &self.nodes.get(key)?.data {
            NodeData::Element { style, .. } => style
                .iter()
                .find(|(k, _)| k.as_str() == name)
                .map(|(_, v)| v.as_str()),
            NodeData::Text(_) => None,
        }
    }

    pub fn set_style(&mut self, key: DomKey, name: &str, value: impl Into<String>) {
        let Some(NodeData::Element { style, .. }) = self.nodes.get_mut(key).map(|n| &mut n.data)
        else {
            return;
        };
        let value = value.into();
        match style.iter_mut().find(|(k, _)| k.as_str() == name) {
            Some((_, v)) => *v = value,
            None => style.push((name.into(), value)),
        }
    }

    fn insert(&mut self, parent: DomKey, data: NodeData, position: Option<usize>) -> DomKey {
        let key = self.nodes.insert(DomNode {
            data,
            parent: Some(parent),
            children: Vec::new(),
        });
        if let Some(node) = self.nodes.get_mut(parent) {
            let at = position.unwrap_or(node.children.len()).min(node.children.len());
            node.children.insert(at, key);
        }
        key
    }

    pub fn append_element(&mut self, parent: DomKey, tag: &str, class: Option<&str>) -> DomKey {
        self.insert(parent, element(tag, class), None)
    }

    pub fn append_text(&mut self, parent: DomKey, text: &str) -> DomKey {
        self.insert(parent, NodeData::Text(text.to_string()), None)
    }

    /// Appends `<tag>text</tag>` to the markdown body.
    pub fn push_block(&mut self, tag: &str, text: &str) -> DomKey {
        let block = self.append_element(self.body, tag, None);
        self.append_text(block, text);
        block
    }

    /// Drops every rendered node under the markdown body.
    pub fn clear_body(&mut self) {
        for child in std::mem::take(&mut self.nodes[self.body].children) {
            self.drop_subtree(child);
        }
    }

    fn drop_subtree(&mut self, key: DomKey) {
        let mut stack = vec![key];
        while let Some(k) = stack.pop() {
            if let Some(node) = self.nodes.remove(k) {
                stack.extend(node.children);
            }
        }
    }

    /// Detaches and drops `key` with its subtree. The root and body stay.
    pub fn remove(&mut self, key: DomKey) {
        if key == self.root || key == self.body {
            return;
        }
        if let Some(parent) = self.parent(key) {
            if let Some(node) = self.nodes.get_mut(parent) {
                node.children.retain(|&k| k != key);
            }
        }
        self.drop_subtree(key);
    }

    /// Nodes strictly below `under`, document order.
    fn descendants(&self, under: DomKey) -> Vec<DomKey> {
        let mut out = Vec::new();
        let mut stack: Vec<DomKey> = self.children(under).iter().rev().copied().collect();
        while let Some(key) = stack.pop() {
            out.push(key);
            stack.extend(self.children(key).iter().rev().copied());
        }
        out
    }

    pub fn text_nodes(&self, under: DomKey) -> Vec<DomKey> {
        self.descendants(under)
            .into_iter()
            .filter(|&k| self.text(k).is_some())
            .collect()
    }

    /// Every element below `under` in document order, `under` excluded.
    pub fn elements(&self, under: DomKey) -> Vec<DomKey> {
        self.descendants(under)
            .into_iter()
            .filter(|&k| matches!(self.data(k), Some(NodeData::Element { .. })))
            .collect()
    }

    pub fn elements_with_class(&self, class: &str) -> Vec<DomKey> {
        let mut all = vec![self.root];
        all.extend(self.descendants(self.root));
        all.retain(|&k| self.has_class(k, class));
        all
    }

    pub fn text_content(&self, under: DomKey) -> String {
        if let Some(text) = self.text(under) {
            return text.to_string();
        }
        self.text_nodes(under)
            .into_iter()
            .filter_map(|k| self.text(k))
            .collect()
    }

    /// Replaces element `key` by its children, in place.
    pub fn unwrap(&mut self, key: DomKey) {
        if key == self.root || key == self.body {
            return;
        }
        let Some(parent) = self.parent(key) else {
            return;
        };
        let Some(node) = self.nodes.remove(key) else {
            return;
        };
        for &child in &node.children {
            if let Some(c) = self.nodes.get_mut(child) {
                c.parent = Some(parent);
            }
        }
        if let Some(p) = self.nodes.get_mut(parent) {
            if let Some(pos) = p.children.iter().position(|&k| k == key) {
                p.children.splice(pos..=pos, node.children);
            }
        }
    }

    /// Merges adjacent text children of `key` and drops empty ones.
    pub fn normalize(&mut self, key: DomKey) {
        let children = self.children(key).to_vec();
        let mut kept: Vec<DomKey> = Vec::with_capacity(children.len());
        for child in children {
            let Some(text) = self.text(child).map(str::to_string) else {
                kept.push(child);
                continue;
            };
            let previous_text = kept.last().copied().filter(|&k| self.text(k).is_some());
            match previous_text {
                Some(prev) => {
                    if let Some(NodeData::Text(t)) = self.nodes.get_mut(prev).map(|n| &mut n.data) {
                        t.push_str(&text);
                    }
                    self.nodes.remove(child);
                }
                None if text.is_empty() => {
                    self.nodes.remove(child);
                }
                None => kept.push(child),
            }
        }
        kept.retain(|&k| self.text(k) != Some(""));
        if let Some(node) = self.nodes.get_mut(key) {
            node.children = kept;
        }
    }

    /// Splits text node `key` around the byte range `start..end` and wraps
    /// that part in a new element. Returns the wrapper, or `None` when the
    /// range is empty or not on char boundaries.
    pub fn wrap_text_range(
        &mut self,
        key: DomKey,
        start: usize,
        end: usize,
        tag: &str,
        class: Option<&str>,
    ) -> Option<DomKey> {
        let text = self.text(key)?;
        if start >= end || end > text.len() {
            return None;
        }
        let before = text.get(..start)?.to_string();
        let matched = text.get(start..end)?.to_string();
        let after = text.get(end..)?.to_string();

        let parent = self.parent(key)?;
        let mut at = self.children(parent).iter().position(|&k| k == key)?;
        self.remove(key);

        if !before.is_empty() {
            self.insert(parent, NodeData::Text(before), Some(at));
            at += 1;
        }
        let wrapper = self.insert(parent, element(tag, class), Some(at));
        self.insert(wrapper, NodeData::Text(matched), None);
        if !after.is_empty() {
            self.insert(parent, NodeData::Text(after), Some(at + 1));
        }
        Some(wrapper)
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(self.root, &mut out);
        out
    }

    fn write_html(&self, key: DomKey, out: &mut String) {
        let Some(node) = self.nodes.get(key) else {
            return;
        };
        match &node.data {
            NodeData::Text(text) => escape_into(text, out),
            NodeData::Element { tag, class, style } => {
                let _ = write!(out, "<{tag}");
                if let Some(class) = class {
                    let _ = write!(out, " class=\"{class}\"");
                }
                if !style.is_empty() {
                    out.push_str(" style=\"");
                    for (i, (k, v)) in style.iter().enumerate() {
                        if i > 0 {
                            out.push(' ');
                        }
                        let _ = write!(out, "{k}: {v};");
                    }
                    out.push('"');
                }
                out.push('>');
                for &child in &node.children {
                    self.write_html(child, out);
                }
                let _ = write!(out, "</{tag}>");
            }
        }
    }
}

fn element(tag: &str, class: Option<&str>) -> NodeData {
    NodeData::Element {
        tag: tag.into(),
        class: class.map(Into::into),
        style: Vec::new(),
    }
}

fn escape_into(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/views/preview/dom.rs"]
mod tests;
