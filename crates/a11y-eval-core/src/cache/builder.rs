//! Pre-order traversal of the host DOM into a [`DomCache`].

use super::{
    names, roles, DomCache, DomElement, DomNode, DomText, FrameAccess, NodeId, NodeOrigin,
};
use crate::cache::AccessibleName;
use crate::color::ResolvedStyle;
use crate::host::{FrameContent, HostNode, NodeKind};
use crate::visibility::Visibility;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Elements that never render content and are skipped with their subtree.
pub const SKIPPED_TAGS: &[&str] = &[
    "base", "link", "noscript", "object", "script", "style", "template", "content", "shadow",
];

/// Default limit on element nesting depth.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Options for building a DOM cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildOptions {
    /// Elements nested deeper than this are recorded as leaves.
    pub max_depth: usize,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Which nodes the traversal descends into below an element.
#[derive(Debug)]
pub enum Boundary<N> {
    /// Ordinary light-DOM children.
    LightChildren(Vec<N>),
    /// The shadow root of a custom element, replacing its light children.
    ShadowRoot(Vec<N>),
    /// The nodes assigned to a `slot`.
    SlotAssigned(Vec<N>),
    /// The readable content document of a frame.
    FrameDocument(N),
    /// A cross-origin frame; treated as a leaf.
    OpaqueFrame,
}

/// Decides how the traversal crosses the boundary below `node`.
///
/// * custom elements (tag containing `-`) with a shadow root descend into it;
/// * `slot` elements descend into their assigned nodes, or their own fallback
///   children when nothing is assigned;
/// * `frame`/`iframe` descend into a readable content document, and are
///   opaque leaves when the document is cross-origin.
pub fn boundary_for<N: HostNode>(node: &N) -> Boundary<N> {
    let tag = node.tag_name().unwrap_or_default().to_ascii_lowercase();

    if tag.contains('-') {
        if let Some(shadow) = node.shadow_root() {
            return Boundary::ShadowRoot(shadow);
        }
    }

    if tag == "slot" {
        if let Some(assigned) = node.assigned_nodes().filter(|a| !a.is_empty()) {
            return Boundary::SlotAssigned(assigned);
        }
    }

    if tag == "frame" || tag == "iframe" {
        match node.content_document() {
            FrameContent::Document(doc) => return Boundary::FrameDocument(doc),
            FrameContent::CrossOrigin => return Boundary::OpaqueFrame,
            FrameContent::None => {}
        }
    }

    Boundary::LightChildren(node.children())
}

fn find_attribute<'a>(attributes: &'a [(String, String)], name: &str) -> Option<&'a str> {
    attributes
        .iter()
        .find(|(n, _)| n == name)
        .map(|(_, v)| v.as_str())
}

/// State threaded down the recursion.
#[derive(Clone)]
struct Context {
    parent: Option<NodeId>,
    visibility: Visibility,
    style: ResolvedStyle,
    depth: usize,
    landmark: Option<NodeId>,
    origin: NodeOrigin,
    in_sectioning: bool,
}

impl Context {
    fn root() -> Self {
        Self {
            parent: None,
            visibility: Visibility::root(),
            style: ResolvedStyle::root(),
            depth: 0,
            landmark: None,
            origin: NodeOrigin::Document,
            in_sectioning: false,
        }
    }
}

struct Builder {
    options: BuildOptions,
    nodes: Vec<DomNode>,
    roots: Vec<NodeId>,
    last_heading: Option<NodeId>,
    title: Option<String>,
    language: Option<String>,
}

impl Builder {
    fn push(&mut self, node: DomNode, parent: Option<NodeId>) -> NodeId {
        let id = node.id();
        self.nodes.push(node);
        match parent.and_then(|p| self.nodes.get_mut(p.0)) {
            Some(DomNode::Element(p)) => p.children.push(id),
            _ => self.roots.push(id),
        }
        id
    }

    fn next_id(&self) -> NodeId {
        NodeId(self.nodes.len())
    }

    fn flush_text(&mut self, buffer: &mut String, ctx: &Context) {
        let text = names::normalize_whitespace(buffer);
        buffer.clear();
        let Some(parent) = ctx.parent else {
            return;
        };
        if text.is_empty() {
            return;
        }
        let id = self.next_id();
        self.push(DomNode::Text(DomText { id, parent, text }), Some(parent));
        if let Some(DomNode::Element(p)) = self.nodes.get_mut(parent.0) {
            p.has_text = true;
        }
    }

    fn visit_children<N: HostNode>(&mut self, children: Vec<N>, ctx: &Context) {
        let mut text = String::new();
        for child in children {
            match child.kind() {
                NodeKind::Text => text.push_str(child.text().unwrap_or_default()),
                NodeKind::Element => {
                    self.flush_text(&mut text, ctx);
                    self.visit_element(&child, ctx);
                }
                NodeKind::Document => {
                    self.flush_text(&mut text, ctx);
                    self.visit_children(child.children(), ctx);
                }
                NodeKind::Comment | NodeKind::Other => {}
            }
        }
        self.flush_text(&mut text, ctx);
    }

    fn visit_element<N: HostNode>(&mut self, node: &N, ctx: &Context) {
        let tag = node.tag_name().unwrap_or_default().to_ascii_lowercase();
        if SKIPPED_TAGS.contains(&tag.as_str()) {
            return;
        }
        if tag == "head" {
            self.read_head(node);
            return;
        }

        let attributes: Vec<(String, String)> = node
            .attributes()
            .into_iter()
            .map(|(n, v)| (n.to_ascii_lowercase(), v.to_string()))
            .collect();
        let attr = |name: &str| find_attribute(&attributes, name);

        if tag == "html" && self.language.is_none() {
            self.language = attr("lang")
                .or_else(|| attr("xml:lang"))
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(String::from);
        }

        let style = node.computed_style();
        if style.is_none() {
            debug!("No computed style for <{}>, assuming visible", tag);
        }
        let visibility = Visibility::resolve(
            &tag,
            attr("hidden").is_some(),
            attr("aria-hidden"),
            style.as_ref(),
            &ctx.visibility,
        );
        let resolved = ResolvedStyle::resolve(style.as_ref(), &ctx.style);
        let (role, has_explicit_role) = roles::resolve_role(&tag, &attributes, ctx.in_sectioning);
        let element_id = attr("id").filter(|v| !v.is_empty()).map(String::from);

        let id = self.next_id();
        let element = DomElement {
            id,
            parent: ctx.parent,
            children: Vec::new(),
            tag_name: tag.clone(),
            attributes,
            element_id,
            role,
            has_explicit_role,
            accessible_name: AccessibleName::default(),
            visibility,
            style: resolved,
            rect: node.bounding_rect(),
            depth: ctx.depth,
            parent_landmark: ctx.landmark,
            parent_heading: self.last_heading,
            origin: ctx.origin,
            frame_access: None,
            has_text: false,
        };

        let is_heading = element.heading_level().is_some();
        let is_landmark = element.is_landmark();
        let child_ctx = Context {
            parent: Some(id),
            visibility: element.visibility,
            style: element.style.clone(),
            depth: ctx.depth + 1,
            landmark: if is_landmark { Some(id) } else { ctx.landmark },
            origin: ctx.origin,
            in_sectioning: ctx.in_sectioning || roles::is_sectioning_tag(&tag),
        };

        self.push(DomNode::Element(element), ctx.parent);
        if is_heading {
            self.last_heading = Some(id);
        }

        if ctx.depth >= self.options.max_depth {
            warn!(
                "Maximum depth {} reached at <{}>, not descending further",
                self.options.max_depth, tag
            );
            return;
        }

        match boundary_for(node) {
            Boundary::LightChildren(children) | Boundary::SlotAssigned(children) => {
                self.visit_children(children, &child_ctx);
            }
            Boundary::ShadowRoot(children) => {
                let ctx = Context {
                    origin: NodeOrigin::ShadowTree,
                    ..child_ctx
                };
                self.visit_children(children, &ctx);
            }
            Boundary::FrameDocument(document) => {
                self.set_frame_access(id, FrameAccess::Accessible);
                let ctx = Context {
                    origin: NodeOrigin::Frame,
                    style: ResolvedStyle::root(),
                    in_sectioning: false,
                    ..child_ctx
                };
                self.visit_children(vec![document], &ctx);
            }
            Boundary::OpaqueFrame => {
                debug!("Skipping cross-origin frame content of <{}>", tag);
                self.set_frame_access(id, FrameAccess::CrossOrigin);
            }
        }
    }

    fn set_frame_access(&mut self, id: NodeId, access: FrameAccess) {
        if let Some(DomNode::Element(e)) = self.nodes.get_mut(id.0) {
            e.frame_access = Some(access);
        }
    }

    /// Reads document metadata from `<head>`; nothing in it is rendered.
    fn read_head<N: HostNode>(&mut self, head: &N) {
        for child in head.children() {
            if child.kind() != NodeKind::Element
                || !child.tag_name().is_some_and(|t| t.eq_ignore_ascii_case("title"))
            {
                continue;
            }
            if self.title.is_none() {
                let text: String = child
                    .children()
                    .iter()
                    .filter_map(|c| c.text())
                    .collect();
                self.title = Some(names::normalize_whitespace(&text));
            }
        }
    }
}

impl DomCache {
    /// Builds the cache from a host DOM root (a document or an element).
    ///
    /// Traversal problems never abort the build: cross-origin frames become
    /// leaves, missing styles default to visible, and elements nested deeper
    /// than [`BuildOptions::max_depth`] are recorded without their subtree.
    pub fn build<N: HostNode>(root: N, options: &BuildOptions) -> Self {
        let mut builder = Builder {
            options: *options,
            nodes: Vec::new(),
            roots: Vec::new(),
            last_heading: None,
            title: None,
            language: None,
        };

        let ctx = Context::root();
        match root.kind() {
            NodeKind::Element => builder.visit_element(&root, &ctx),
            _ => builder.visit_children(root.children(), &ctx),
        }

        let mut ids = HashMap::new();
        for node in &builder.nodes {
            if let DomNode::Element(e) = node {
                if let Some(element_id) = &e.element_id {
                    ids.entry(element_id.clone()).or_insert(e.id);
                }
            }
        }

        names::assign_accessible_names(&mut builder.nodes, &ids);

        debug!(
            "Built DOM cache with {} nodes ({} roots)",
            builder.nodes.len(),
            builder.roots.len()
        );

        Self {
            nodes: builder.nodes,
            roots: builder.roots,
            ids,
            title: builder.title,
            language: builder.language,
            ..Self::default()
        }
    }
}
