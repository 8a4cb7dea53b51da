//! Accessible name computation.
//!
//! Names are computed in a second pass over the finished arena so that
//! `aria-labelledby` and `label[for]` may reference elements that appear
//! later in document order.

use super::{AccessibleName, DomElement, DomNode, NameSource, NodeId};
use crate::cache::roles;
use std::collections::HashMap;

/// Collapses runs of whitespace into single spaces and trims the ends.
#[must_use]
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn element(nodes: &[DomNode], id: NodeId) -> Option<&DomElement> {
    nodes.get(id.0).and_then(DomNode::as_element)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn is_image_input(e: &DomElement) -> bool {
    e.tag_name == "input"
        && e.attribute("type")
            .is_some_and(|t| t.trim().eq_ignore_ascii_case("image"))
}

/// Text of the subtree below `id`.
///
/// Images contribute their `alt`, elements with an `aria-label` contribute
/// the label instead of their content. Unless `include_hidden` is set, nodes
/// hidden from assistive technology are skipped. `exclude` removes one
/// subtree, used to drop the labelled control from a wrapping label.
pub(crate) fn subtree_text(
    nodes: &[DomNode],
    id: NodeId,
    include_hidden: bool,
    exclude: Option<NodeId>,
) -> String {
    let mut parts = Vec::new();
    collect_text(nodes, id, include_hidden, exclude, &mut parts);
    normalize_whitespace(&parts.join(" "))
}

fn collect_text<'a>(
    nodes: &'a [DomNode],
    id: NodeId,
    include_hidden: bool,
    exclude: Option<NodeId>,
    parts: &mut Vec<&'a str>,
) {
    let Some(parent) = element(nodes, id) else {
        return;
    };
    for child in &parent.children {
        match nodes.get(child.0) {
            Some(DomNode::Text(t)) => parts.push(&t.text),
            Some(DomNode::Element(e)) => {
                if Some(e.id) == exclude || (!include_hidden && !e.is_visible_to_at()) {
                    continue;
                }
                if let Some(label) = non_empty(e.attribute("aria-label")) {
                    parts.push(label);
                } else if e.tag_name == "img" || e.tag_name == "area" || is_image_input(e) {
                    if let Some(alt) = non_empty(e.attribute("alt")) {
                        parts.push(alt);
                    }
                } else {
                    collect_text(nodes, e.id, include_hidden, exclude, parts);
                }
            }
            None => {}
        }
    }
}

/// Elements that can be associated with a `<label>`.
fn is_labelable(e: &DomElement) -> bool {
    match e.tag_name.as_str() {
        "button" | "meter" | "output" | "progress" | "select" | "textarea" => true,
        "input" => !e
            .attribute("type")
            .is_some_and(|t| t.trim().eq_ignore_ascii_case("hidden")),
        _ => false,
    }
}

struct NameContext<'a> {
    nodes: &'a [DomNode],
    ids: &'a HashMap<String, NodeId>,
    labels_for: HashMap<&'a str, NodeId>,
}

impl<'a> NameContext<'a> {
    fn new(nodes: &'a [DomNode], ids: &'a HashMap<String, NodeId>) -> Self {
        let mut labels_for = HashMap::new();
        for node in nodes {
            if let DomNode::Element(e) = node {
                if e.tag_name == "label" {
                    if let Some(target) = non_empty(e.attribute("for")) {
                        labels_for.entry(target).or_insert(e.id);
                    }
                }
            }
        }
        Self {
            nodes,
            ids,
            labels_for,
        }
    }

    fn compute(&self, e: &DomElement) -> AccessibleName {
        self.from_labelledby(e)
            .or_else(|| {
                non_empty(e.attribute("aria-label"))
                    .map(|l| AccessibleName::new(l, NameSource::AriaLabel))
            })
            .or_else(|| self.from_native(e))
            .or_else(|| self.from_contents(e))
            .or_else(|| {
                non_empty(e.attribute("title")).map(|t| AccessibleName::new(t, NameSource::Title))
            })
            .or_else(|| {
                matches!(e.tag_name.as_str(), "input" | "textarea")
                    .then(|| non_empty(e.attribute("placeholder")))
                    .flatten()
                    .map(|p| AccessibleName::new(p, NameSource::Placeholder))
            })
            .unwrap_or_default()
    }

    fn from_labelledby(&self, e: &DomElement) -> Option<AccessibleName> {
        let refs = non_empty(e.attribute("aria-labelledby"))?;
        let text: Vec<String> = refs
            .split_whitespace()
            .filter_map(|r| self.ids.get(r))
            .filter_map(|id| element(self.nodes, *id))
            .map(|target| match non_empty(target.attribute("aria-label")) {
                Some(label) => label.to_string(),
                None => subtree_text(self.nodes, target.id, true, None),
            })
            .filter(|t| !t.is_empty())
            .collect();
        let text = text.join(" ");
        (!text.is_empty()).then(|| AccessibleName::new(&text, NameSource::AriaLabelledby))
    }

    fn from_native(&self, e: &DomElement) -> Option<AccessibleName> {
        let tag = e.tag_name.as_str();
        if tag == "img" || tag == "area" || is_image_input(e) {
            if let Some(alt) = non_empty(e.attribute("alt")) {
                return Some(AccessibleName::new(alt, NameSource::Alt));
            }
        }
        if is_labelable(e) {
            if let Some(label) = self.from_label(e) {
                return Some(label);
            }
        }
        match tag {
            "input" => {
                let ty = e
                    .attribute("type")
                    .map(|t| t.trim().to_ascii_lowercase())
                    .unwrap_or_default();
                let value = non_empty(e.attribute("value"));
                match (ty.as_str(), value) {
                    ("button" | "submit" | "reset" | "image", Some(v)) => {
                        Some(AccessibleName::new(v, NameSource::Value))
                    }
                    ("submit" | "image", None) => {
                        Some(AccessibleName::new("Submit", NameSource::Value))
                    }
                    ("reset", None) => Some(AccessibleName::new("Reset", NameSource::Value)),
                    _ => None,
                }
            }
            "fieldset" => self.first_child_text(e, "legend", NameSource::Legend),
            "table" => self.first_child_text(e, "caption", NameSource::Caption),
            _ => None,
        }
    }

    fn from_label(&self, e: &DomElement) -> Option<AccessibleName> {
        let by_for = e
            .element_id
            .as_deref()
            .and_then(|id| self.labels_for.get(id))
            .copied();
        let wrapping = || {
            let mut parent = e.parent;
            while let Some(p) = parent.and_then(|p| element(self.nodes, p)) {
                if p.tag_name == "label" {
                    return Some(p.id);
                }
                parent = p.parent;
            }
            None
        };
        let label = by_for.or_else(wrapping)?;
        let text = subtree_text(self.nodes, label, false, Some(e.id));
        (!text.is_empty()).then(|| AccessibleName::new(&text, NameSource::Label))
    }

    fn first_child_text(
        &self,
        e: &DomElement,
        child_tag: &str,
        source: NameSource,
    ) -> Option<AccessibleName> {
        let child = e
            .children
            .iter()
            .filter_map(|c| element(self.nodes, *c))
            .find(|c| c.tag_name == child_tag)?;
        let text = subtree_text(self.nodes, child.id, false, None);
        (!text.is_empty()).then(|| AccessibleName::new(&text, source))
    }

    fn from_contents(&self, e: &DomElement) -> Option<AccessibleName> {
        let role = e.role.as_deref()?;
        if !roles::allows_name_from_content(role) {
            return None;
        }
        let text = subtree_text(self.nodes, e.id, false, None);
        (!text.is_empty()).then(|| AccessibleName::new(&text, NameSource::Contents))
    }
}

/// Computes and stores the accessible name of every element.
pub(crate) fn assign_accessible_names(nodes: &mut [DomNode], ids: &HashMap<String, NodeId>) {
    let names: Vec<(usize, AccessibleName)> = {
        let ctx = NameContext::new(nodes, ids);
        nodes
            .iter()
            .filter_map(DomNode::as_element)
            .map(|e| (e.id.0, ctx.compute(e)))
            .filter(|(_, name)| !name.is_empty())
            .collect()
    };
    for (index, name) in names {
        if let Some(DomNode::Element(e)) = nodes.get_mut(index) {
            e.accessible_name = name;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{BuildOptions, DomCache};
    use crate::host::ComputedStyle;
    use crate::snapshot::SnapshotNode;

    fn el(tag: &str) -> SnapshotNode {
        SnapshotNode::element(tag)
    }

    fn text(t: &str) -> SnapshotNode {
        SnapshotNode::text(t)
    }

    fn cache(children: Vec<SnapshotNode>) -> DomCache {
        DomCache::build(&SnapshotNode::document(children), &BuildOptions::default())
    }

    fn name_of<'a>(cache: &'a DomCache, tag: &str) -> &'a AccessibleName {
        &cache
            .elements()
            .find(|e| e.tag_name == tag)
            .unwrap()
            .accessible_name
    }

    #[test]
    fn normalizes_whitespace() {
        assert_eq!(normalize_whitespace("  a \n\t b  "), "a b");
        assert_eq!(normalize_whitespace("   "), "");
    }

    #[test]
    fn link_name_from_contents_and_image_alt() {
        let c = cache(vec![el("a")
            .attr("href", "/")
            .child(text("Go"))
            .child(el("img").attr("alt", "home"))]);
        let name = name_of(&c, "a");
        assert_eq!(name.name, "Go home");
        assert_eq!(name.source, NameSource::Contents);
    }

    #[test]
    fn hidden_descendants_do_not_contribute() {
        let c = cache(vec![el("button")
            .child(text("Save"))
            .child(
                el("span")
                    .style(ComputedStyle::default().display("none"))
                    .child(text("secret")),
            )]);
        assert_eq!(name_of(&c, "button").name, "Save");
    }

    #[test]
    fn aria_labelledby_wins_and_allows_forward_references() {
        let c = cache(vec![
            el("button")
                .attr("aria-labelledby", "a b")
                .attr("aria-label", "ignored")
                .child(text("contents")),
            el("span").attr("id", "a").child(text("First")),
            el("span")
                .attr("id", "b")
                .attr("hidden", "")
                .child(text("Second")),
        ]);
        let name = name_of(&c, "button");
        assert_eq!(name.name, "First Second");
        assert_eq!(name.source, NameSource::AriaLabelledby);
    }

    #[test]
    fn label_for_and_wrapping_label() {
        let c = cache(vec![
            el("label").attr("for", "email").child(text("E-mail")),
            el("input").attr("id", "email"),
            el("label")
                .child(text("Remember me"))
                .child(el("select").child(el("option").child(text("yes")))),
        ]);
        let input = name_of(&c, "input");
        assert_eq!(input.name, "E-mail");
        assert_eq!(input.source, NameSource::Label);
        assert_eq!(name_of(&c, "select").name, "Remember me");
    }

    #[test]
    fn submit_defaults_and_placeholder() {
        let c = cache(vec![
            el("input").attr("type", "submit"),
            el("textarea").attr("placeholder", "Comment"),
        ]);
        assert_eq!(name_of(&c, "input").name, "Submit");
        let textarea = name_of(&c, "textarea");
        assert_eq!(textarea.name, "Comment");
        assert_eq!(textarea.source, NameSource::Placeholder);
    }

    #[test]
    fn legend_and_caption() {
        let c = cache(vec![
            el("fieldset").child(el("legend").child(text("Shipping"))),
            el("table").child(el("caption").child(text("Prices"))),
        ]);
        assert_eq!(name_of(&c, "fieldset").source, NameSource::Legend);
        assert_eq!(name_of(&c, "table").name, "Prices");
    }

    #[test]
    fn comparison_form_is_lowercase() {
        let name = AccessibleName::new("  Read   MORE ", NameSource::Contents);
        assert_eq!(name.name, "Read MORE");
        assert_eq!(name.for_comparison, "read more");
    }
}
