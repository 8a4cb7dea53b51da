//! Host DOM abstraction.
//!
//! The evaluator never parses HTML or runs layout. It walks whatever DOM the
//! host hands it through [`HostNode`], reading tag names, attributes, computed
//! style and geometry the host has already resolved.

use serde::{Deserialize, Serialize};

/// Kind of a host DOM node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// An element node.
    #[default]
    Element,
    /// A text node.
    Text,
    /// A document (top level or frame content document).
    Document,
    /// A comment node.
    Comment,
    /// Anything else (processing instructions, doctype, ...).
    Other,
}

/// A bounding rectangle in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

impl Rect {
    /// Creates a new rectangle.
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Computed style values as reported by the host.
///
/// Values are raw CSS strings. Properties the host did not report default to
/// `inherit` (colours and fonts) or the CSS initial value, which lets hand-built
/// snapshots stay small.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ComputedStyle {
    /// `display`.
    pub display: String,
    /// `visibility`.
    pub visibility: String,
    /// `color`.
    pub color: String,
    /// `background-color`.
    pub background_color: String,
    /// `background-image`.
    pub background_image: String,
    /// `font-family`.
    pub font_family: String,
    /// `font-size`.
    pub font_size: String,
    /// `font-weight`.
    pub font_weight: String,
    /// `opacity`.
    pub opacity: String,
    /// `position`.
    pub position: String,
}

impl Default for ComputedStyle {
    fn default() -> Self {
        Self {
            display: "inline".to_string(),
            visibility: "visible".to_string(),
            color: "inherit".to_string(),
            background_color: "transparent".to_string(),
            background_image: "none".to_string(),
            font_family: "inherit".to_string(),
            font_size: "inherit".to_string(),
            font_weight: "inherit".to_string(),
            opacity: "1".to_string(),
            position: "static".to_string(),
        }
    }
}

impl ComputedStyle {
    /// Sets `display`.
    #[must_use]
    pub fn display(mut self, value: impl Into<String>) -> Self {
        self.display = value.into();
        self
    }

    /// Sets `visibility`.
    #[must_use]
    pub fn visibility(mut self, value: impl Into<String>) -> Self {
        self.visibility = value.into();
        self
    }

    /// Sets `color`.
    #[must_use]
    pub fn color(mut self, value: impl Into<String>) -> Self {
        self.color = value.into();
        self
    }

    /// Sets `background-color`.
    #[must_use]
    pub fn background_color(mut self, value: impl Into<String>) -> Self {
        self.background_color = value.into();
        self
    }

    /// Sets `background-image`.
    #[must_use]
    pub fn background_image(mut self, value: impl Into<String>) -> Self {
        self.background_image = value.into();
        self
    }

    /// Sets `font-family`.
    #[must_use]
    pub fn font_family(mut self, value: impl Into<String>) -> Self {
        self.font_family = value.into();
        self
    }

    /// Sets `font-size`.
    #[must_use]
    pub fn font_size(mut self, value: impl Into<String>) -> Self {
        self.font_size = value.into();
        self
    }

    /// Sets `font-weight`.
    #[must_use]
    pub fn font_weight(mut self, value: impl Into<String>) -> Self {
        self.font_weight = value.into();
        self
    }

    /// Sets `opacity`.
    #[must_use]
    pub fn opacity(mut self, value: impl Into<String>) -> Self {
        self.opacity = value.into();
        self
    }
}

/// What a frame element exposes to the traversal.
#[derive(Debug, Clone)]
pub enum FrameContent<N> {
    /// The node is not a frame, or has no content document.
    None,
    /// The frame's content document is readable.
    Document(N),
    /// The frame's document belongs to another origin and cannot be read.
    CrossOrigin,
}

/// A node of the host-provided DOM.
///
/// Implementations are expected to be cheap handles (references or
/// reference-counted pointers). Methods that do not apply to a node kind
/// return `None` or an empty list.
pub trait HostNode: Sized {
    /// Returns the node kind.
    fn kind(&self) -> NodeKind;

    /// Returns the lower-case tag name for element nodes.
    fn tag_name(&self) -> Option<&str>;

    /// Returns the value of an attribute.
    fn attribute(&self, name: &str) -> Option<&str>;

    /// Returns all attributes in source order.
    fn attributes(&self) -> Vec<(&str, &str)>;

    /// Returns the character data of text nodes.
    fn text(&self) -> Option<&str>;

    /// Returns the light-DOM children.
    fn children(&self) -> Vec<Self>;

    /// Returns the computed style, or `None` when the host cannot compute it.
    fn computed_style(&self) -> Option<ComputedStyle>;

    /// Returns the border box in CSS pixels.
    fn bounding_rect(&self) -> Option<Rect>;

    /// Returns the children of an attached shadow root.
    fn shadow_root(&self) -> Option<Vec<Self>>;

    /// Returns the flattened nodes assigned to a `slot` element.
    fn assigned_nodes(&self) -> Option<Vec<Self>>;

    /// Returns the content document of a `frame` or `iframe`.
    fn content_document(&self) -> FrameContent<Self>;
}
