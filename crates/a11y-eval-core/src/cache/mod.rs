//! The DOM cache: a frozen, annotated mirror of the host DOM.
//!
//! [`DomCache::build`] walks the host tree once and records every rendered
//! element and merged text run in an arena indexed by [`NodeId`]. Node ids are
//! assigned in pre-order, so comparing ids compares document order.
//!
//! Specialized sub-caches (links, lists, tables, ...) are derived lazily on
//! first access and hold `NodeId`s back into the arena; they never own nodes.

mod builder;
pub mod contrast;
pub mod controls;
pub mod duplicates;
pub mod headings;
pub mod images;
pub mod links;
pub mod lists;
mod names;
pub mod roles;
pub mod tables;

use crate::color::ResolvedStyle;
use crate::host::Rect;
use crate::visibility::Visibility;
use serde::{Deserialize, Serialize};
use std::cell::OnceCell;
use std::collections::HashMap;
use std::fmt;

pub use builder::{boundary_for, BuildOptions, Boundary, DEFAULT_MAX_DEPTH, SKIPPED_TAGS};
pub use contrast::{ColorContrastCache, ColorContrastGroup, ColorContrastItem, StyleSignature};
pub use controls::{ControlElement, ControlKind, ControlsCache, LabelElement};
pub use duplicates::{group_duplicates, DuplicateGroup};
pub use headings::{
    HeadingElement, HeadingsLandmarksCache, LandmarkElement, NestingMemo, NestingScope,
};
pub use images::{ImageElement, ImagesCache};
pub use links::{normalize_href, LinkElement, LinkHrefGroup, LinkNameGroup, LinkType, LinksCache};
pub use lists::{ListContainer, ListItem, ListKind, ListsCache};
pub use names::normalize_whitespace;
pub use tables::{TableCell, TableElement, TableType, TablesCache};

/// Index of a node in the DOM cache. Ids increase in document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Which tree an element was reached through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeOrigin {
    /// The top-level document.
    #[default]
    Document,
    /// A shadow tree of a custom element.
    ShadowTree,
    /// The content document of a frame.
    Frame,
}

/// Whether a frame's content could be evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FrameAccess {
    /// The content document was traversed.
    Accessible,
    /// The content document is cross-origin and was skipped.
    CrossOrigin,
}

/// Where an accessible name came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NameSource {
    /// No name.
    #[default]
    None,
    /// `aria-labelledby` references.
    AriaLabelledby,
    /// `aria-label`.
    AriaLabel,
    /// `alt` attribute.
    Alt,
    /// An associated `<label>`.
    Label,
    /// A `<legend>` child of a fieldset.
    Legend,
    /// A `<caption>` child of a table.
    Caption,
    /// The `value` of a button-like input, or its default label.
    Value,
    /// Text content of the element.
    Contents,
    /// `title` attribute.
    Title,
    /// `placeholder` attribute.
    Placeholder,
}

impl fmt::Display for NameSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::None => "none",
            Self::AriaLabelledby => "aria-labelledby",
            Self::AriaLabel => "aria-label",
            Self::Alt => "alt",
            Self::Label => "label",
            Self::Legend => "legend",
            Self::Caption => "caption",
            Self::Value => "value",
            Self::Contents => "contents",
            Self::Title => "title",
            Self::Placeholder => "placeholder",
        };
        f.write_str(s)
    }
}

/// A computed accessible name.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AccessibleName {
    /// The name as exposed to assistive technology.
    pub name: String,
    /// Lower-cased, whitespace-collapsed form used for duplicate detection.
    pub for_comparison: String,
    /// Where the name came from.
    pub source: NameSource,
}

impl AccessibleName {
    /// Creates a name, normalizing whitespace.
    #[must_use]
    pub fn new(name: &str, source: NameSource) -> Self {
        let name = normalize_whitespace(name);
        let for_comparison = name.to_lowercase();
        Self {
            name,
            for_comparison,
            source,
        }
    }

    /// Returns `true` when the name has no content.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
    }
}

/// One rendered element.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomElement {
    /// Arena id (document order).
    pub id: NodeId,
    /// Parent element.
    pub parent: Option<NodeId>,
    /// Child elements and text runs, in order.
    pub children: Vec<NodeId>,
    /// Lower-case tag name.
    pub tag_name: String,
    /// Attributes in source order; names are lower-case.
    pub attributes: Vec<(String, String)>,
    /// Value of the `id` attribute.
    pub element_id: Option<String>,
    /// Resolved ARIA role.
    pub role: Option<String>,
    /// `true` when the role came from a `role` attribute.
    pub has_explicit_role: bool,
    /// Accessible name.
    pub accessible_name: AccessibleName,
    /// Visibility state.
    pub visibility: Visibility,
    /// Resolved style and contrast.
    pub style: ResolvedStyle,
    /// Bounding box in CSS pixels.
    pub rect: Option<Rect>,
    /// Element nesting depth (roots are 0).
    pub depth: usize,
    /// Nearest enclosing landmark element.
    pub parent_landmark: Option<NodeId>,
    /// Nearest preceding heading in document order.
    pub parent_heading: Option<NodeId>,
    /// Tree the element was reached through.
    pub origin: NodeOrigin,
    /// Frame content status for `frame`/`iframe` elements.
    pub frame_access: Option<FrameAccess>,
    /// `true` when the element directly owns a text run.
    pub has_text: bool,
}

impl DomElement {
    /// Returns an attribute value.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Returns `true` when the attribute is present.
    #[must_use]
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }

    /// Returns `true` when the element is exposed to assistive technology.
    #[must_use]
    pub fn is_visible_to_at(&self) -> bool {
        self.visibility.visible_to_at
    }

    /// Returns `true` when the element is rendered on screen.
    #[must_use]
    pub fn is_visible_on_screen(&self) -> bool {
        self.visibility.visible_on_screen
    }

    /// Returns `true` when the resolved role equals `role`.
    #[must_use]
    pub fn has_role(&self, role: &str) -> bool {
        self.role.as_deref() == Some(role)
    }

    /// Heading level, for headings.
    #[must_use]
    pub fn heading_level(&self) -> Option<u8> {
        roles::heading_level(&self.tag_name, self.role.as_deref(), self.attribute("aria-level"))
    }

    /// Returns `true` when the element is a landmark.
    #[must_use]
    pub fn is_landmark(&self) -> bool {
        self.role.as_deref().is_some_and(roles::is_landmark_role)
    }

    /// Position in document order.
    #[must_use]
    pub fn document_order(&self) -> usize {
        self.id.0
    }

    /// Short description such as `a#home` or `input[type=text]`.
    #[must_use]
    pub fn label(&self) -> String {
        if let Some(id) = &self.element_id {
            format!("{}#{id}", self.tag_name)
        } else if let Some(ty) = self.attribute("type") {
            format!("{}[type={ty}]", self.tag_name)
        } else {
            self.tag_name.clone()
        }
    }
}

/// A merged run of text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomText {
    /// Arena id (document order).
    pub id: NodeId,
    /// Owning element.
    pub parent: NodeId,
    /// Whitespace-normalized text; never empty.
    pub text: String,
}

/// A node of the DOM cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DomNode {
    /// An element.
    Element(DomElement),
    /// A text run.
    Text(DomText),
}

impl DomNode {
    /// Returns the node id.
    #[must_use]
    pub fn id(&self) -> NodeId {
        match self {
            Self::Element(e) => e.id,
            Self::Text(t) => t.id,
        }
    }

    /// Returns the element, if this is one.
    #[must_use]
    pub fn as_element(&self) -> Option<&DomElement> {
        match self {
            Self::Element(e) => Some(e),
            Self::Text(_) => None,
        }
    }

    /// Returns the text run, if this is one.
    #[must_use]
    pub fn as_text(&self) -> Option<&DomText> {
        match self {
            Self::Text(t) => Some(t),
            Self::Element(_) => None,
        }
    }
}

/// The frozen DOM cache of one evaluation.
#[derive(Debug, Default)]
pub struct DomCache {
    nodes: Vec<DomNode>,
    roots: Vec<NodeId>,
    ids: HashMap<String, NodeId>,
    title: Option<String>,
    language: Option<String>,
    links: OnceCell<LinksCache>,
    lists: OnceCell<ListsCache>,
    tables: OnceCell<TablesCache>,
    controls: OnceCell<ControlsCache>,
    headings: OnceCell<HeadingsLandmarksCache>,
    color_contrast: OnceCell<ColorContrastCache>,
    images: OnceCell<ImagesCache>,
}

impl DomCache {
    /// Returns the number of nodes (elements and text runs).
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` when nothing was rendered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the top-level node ids.
    #[must_use]
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Returns a node by id.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&DomNode> {
        self.nodes.get(id.0)
    }

    /// Returns an element by id.
    #[must_use]
    pub fn element(&self, id: NodeId) -> Option<&DomElement> {
        self.node(id).and_then(DomNode::as_element)
    }

    /// Returns all nodes in document order.
    pub fn nodes(&self) -> impl Iterator<Item = &DomNode> {
        self.nodes.iter()
    }

    /// Returns all elements in document order.
    pub fn elements(&self) -> impl Iterator<Item = &DomElement> {
        self.nodes.iter().filter_map(DomNode::as_element)
    }

    /// Returns all text runs in document order.
    pub fn texts(&self) -> impl Iterator<Item = &DomText> {
        self.nodes.iter().filter_map(DomNode::as_text)
    }

    /// Returns the number of elements.
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.elements().count()
    }

    /// Returns the element child nodes of `id`.
    pub fn child_elements(&self, id: NodeId) -> impl Iterator<Item = &DomElement> {
        self.element(id)
            .map(|e| e.children.as_slice())
            .unwrap_or_default()
            .iter()
            .filter_map(|c| self.element(*c))
    }

    /// Iterates the ancestors of `id`, nearest first.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = &DomElement> {
        let start = self.node(id).and_then(|n| match n {
            DomNode::Element(e) => e.parent,
            DomNode::Text(t) => Some(t.parent),
        });
        std::iter::successors(start.and_then(|p| self.element(p)), |e| {
            e.parent.and_then(|p| self.element(p))
        })
    }

    /// Returns the first element whose `id` attribute equals `element_id`.
    #[must_use]
    pub fn element_by_id(&self, element_id: &str) -> Option<&DomElement> {
        self.ids.get(element_id).and_then(|id| self.element(*id))
    }

    /// Returns the accessible name of the element with the given `id` attribute.
    #[must_use]
    pub fn accessible_name_by_id(&self, element_id: &str) -> Option<&str> {
        self.element_by_id(element_id)
            .map(|e| e.accessible_name.name.as_str())
    }

    /// Text content of an element's subtree, restricted to nodes visible to AT.
    #[must_use]
    pub fn text_content(&self, id: NodeId) -> String {
        names::subtree_text(&self.nodes, id, false, None)
    }

    /// Text content of an element's subtree, hidden descendants included.
    #[must_use]
    pub fn full_text_content(&self, id: NodeId) -> String {
        names::subtree_text(&self.nodes, id, true, None)
    }

    /// Document title from `<title>`.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Document language from `<html lang>`.
    #[must_use]
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    /// Links sub-cache.
    pub fn links(&self) -> &LinksCache {
        self.links.get_or_init(|| LinksCache::build(self))
    }

    /// Lists sub-cache.
    pub fn lists(&self) -> &ListsCache {
        self.lists.get_or_init(|| ListsCache::build(self))
    }

    /// Tables sub-cache.
    pub fn tables(&self) -> &TablesCache {
        self.tables.get_or_init(|| TablesCache::build(self))
    }

    /// Form controls and widgets sub-cache.
    pub fn controls(&self) -> &ControlsCache {
        self.controls.get_or_init(|| ControlsCache::build(self))
    }

    /// Headings and landmarks sub-cache.
    pub fn headings(&self) -> &HeadingsLandmarksCache {
        self.headings
            .get_or_init(|| HeadingsLandmarksCache::build(self))
    }

    /// Colour contrast sub-cache.
    pub fn color_contrast(&self) -> &ColorContrastCache {
        self.color_contrast
            .get_or_init(|| ColorContrastCache::build(self))
    }

    /// Images sub-cache.
    pub fn images(&self) -> &ImagesCache {
        self.images.get_or_init(|| ImagesCache::build(self))
    }
}
