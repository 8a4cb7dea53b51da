//! Serializable DOM snapshots.
//!
//! A [`SnapshotNode`] tree is what a headless browser exports for offline
//! evaluation: every element carries its attributes, its computed style and
//! its bounding box. It implements [`HostNode`] so the evaluator can walk it
//! exactly like a live DOM.
//!
//! ```ignore
//! let page = SnapshotNode::document(vec![
//!     SnapshotNode::element("html").attr("lang", "en").child(
//!         SnapshotNode::element("body").child(
//!             SnapshotNode::element("h1").child(SnapshotNode::text("Welcome")),
//!         ),
//!     ),
//! ]);
//! ```

use crate::host::{ComputedStyle, FrameContent, HostNode, NodeKind, Rect};
use serde::{Deserialize, Serialize};

/// Content of a frame element in a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FrameSnapshot {
    /// The captured content document.
    Document(Box<SnapshotNode>),
    /// The frame could not be captured because it is cross-origin.
    CrossOrigin,
}

/// One node of a DOM snapshot.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SnapshotNode {
    /// Node kind.
    pub kind: NodeKind,
    /// Tag name for elements.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    /// Attributes in source order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<(String, String)>,
    /// Character data for text nodes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Computed style.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<ComputedStyle>,
    /// Bounding box.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rect: Option<Rect>,
    /// Light-DOM children.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SnapshotNode>,
    /// Children of an attached shadow root.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shadow_root: Option<Vec<SnapshotNode>>,
    /// Nodes assigned to a `slot`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned: Option<Vec<SnapshotNode>>,
    /// Frame content.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frame: Option<FrameSnapshot>,
}

impl SnapshotNode {
    /// Creates a document node.
    #[must_use]
    pub fn document(children: Vec<SnapshotNode>) -> Self {
        Self {
            kind: NodeKind::Document,
            children,
            ..Self::default()
        }
    }

    /// Creates an element node.
    #[must_use]
    pub fn element(tag: impl Into<String>) -> Self {
        Self {
            kind: NodeKind::Element,
            tag: Some(tag.into().to_ascii_lowercase()),
            ..Self::default()
        }
    }

    /// Creates a text node.
    #[must_use]
    pub fn text(data: impl Into<String>) -> Self {
        Self {
            kind: NodeKind::Text,
            text: Some(data.into()),
            ..Self::default()
        }
    }

    /// Creates a comment node.
    #[must_use]
    pub fn comment(data: impl Into<String>) -> Self {
        Self {
            kind: NodeKind::Comment,
            text: Some(data.into()),
            ..Self::default()
        }
    }

    /// Sets an attribute, replacing an existing value.
    #[must_use]
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into().to_ascii_lowercase();
        let value = value.into();
        if let Some(slot) = self.attributes.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = value;
        } else {
            self.attributes.push((name, value));
        }
        self
    }

    /// Sets the computed style.
    #[must_use]
    pub fn style(mut self, style: ComputedStyle) -> Self {
        self.style = Some(style);
        self
    }

    /// Sets the bounding box.
    #[must_use]
    pub fn rect(mut self, rect: Rect) -> Self {
        self.rect = Some(rect);
        self
    }

    /// Appends a child.
    #[must_use]
    pub fn child(mut self, child: SnapshotNode) -> Self {
        self.children.push(child);
        self
    }

    /// Appends several children.
    #[must_use]
    pub fn children(mut self, children: impl IntoIterator<Item = SnapshotNode>) -> Self {
        self.children.extend(children);
        self
    }

    /// Attaches a shadow root with the given children.
    #[must_use]
    pub fn shadow(mut self, children: Vec<SnapshotNode>) -> Self {
        self.shadow_root = Some(children);
        self
    }

    /// Sets the nodes assigned to this `slot`.
    #[must_use]
    pub fn assigned(mut self, nodes: Vec<SnapshotNode>) -> Self {
        self.assigned = Some(nodes);
        self
    }

    /// Sets the content document of this frame.
    #[must_use]
    pub fn frame_document(mut self, document: SnapshotNode) -> Self {
        self.frame = Some(FrameSnapshot::Document(Box::new(document)));
        self
    }

    /// Marks this frame as cross-origin.
    #[must_use]
    pub fn cross_origin(mut self) -> Self {
        self.frame = Some(FrameSnapshot::CrossOrigin);
        self
    }

    /// Parses a snapshot from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON does not describe a snapshot.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl<'a> HostNode for &'a SnapshotNode {
    fn kind(&self) -> NodeKind {
        self.kind
    }

    fn tag_name(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    fn attributes(&self) -> Vec<(&str, &str)> {
        self.attributes
            .iter()
            .map(|(n, v)| (n.as_str(), v.as_str()))
            .collect()
    }

    fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    fn children(&self) -> Vec<Self> {
        let node: &'a SnapshotNode = *self;
        node.children.iter().collect()
    }

    fn computed_style(&self) -> Option<ComputedStyle> {
        self.style.clone()
    }

    fn bounding_rect(&self) -> Option<Rect> {
        self.rect
    }

    fn shadow_root(&self) -> Option<Vec<Self>> {
        let node: &'a SnapshotNode = *self;
        node.shadow_root.as_ref().map(|c| c.iter().collect())
    }

    fn assigned_nodes(&self) -> Option<Vec<Self>> {
        let node: &'a SnapshotNode = *self;
        node.assigned.as_ref().map(|c| c.iter().collect())
    }

    fn content_document(&self) -> FrameContent<Self> {
        let node: &'a SnapshotNode = *self;
        match &node.frame {
            Some(FrameSnapshot::Document(doc)) => FrameContent::Document(doc.as_ref()),
            Some(FrameSnapshot::CrossOrigin) => FrameContent::CrossOrigin,
            None => FrameContent::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_lowercases_tag_and_attr_names() {
        let node = SnapshotNode::element("DIV").attr("ID", "main");
        let node = &node;
        assert_eq!(node.tag_name(), Some("div"));
        assert_eq!(node.attribute("id"), Some("main"));
    }

    #[test]
    fn attr_replaces_existing_value() {
        let node = SnapshotNode::element("a")
            .attr("href", "/a")
            .attr("href", "/b");
        assert_eq!(node.attributes.len(), 1);
        assert_eq!((&node).attribute("href"), Some("/b"));
    }

    #[test]
    fn parses_json_snapshot() {
        let json = r#"{
            "kind": "document",
            "children": [
                {"tag": "p", "style": {"color": "rgb(0, 0, 0)"}, "children": [
                    {"kind": "text", "text": "hello"}
                ]},
                {"tag": "iframe", "frame": "cross-origin"}
            ]
        }"#;
        let doc = SnapshotNode::from_json(json).unwrap();
        assert_eq!(doc.kind, NodeKind::Document);
        assert_eq!(doc.children.len(), 2);
        let p = &doc.children[0];
        assert_eq!(p.kind, NodeKind::Element);
        assert_eq!(p.style.as_ref().unwrap().color, "rgb(0, 0, 0)");
        assert_eq!(p.style.as_ref().unwrap().display, "inline");
        assert!(matches!(
            (&doc.children[1]).content_document(),
            FrameContent::CrossOrigin
        ));
    }
}
