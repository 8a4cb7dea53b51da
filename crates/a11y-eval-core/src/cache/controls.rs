//! Form controls and ARIA widgets sub-cache.

use super::{group_duplicates, roles, DomCache, DomElement, DuplicateGroup, NameSource, NodeId};
use serde::{Deserialize, Serialize};

/// Kind of control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlKind {
    /// `input` other than `type=hidden`.
    Input,
    /// `button`
    Button,
    /// `select`
    Select,
    /// `textarea`
    Textarea,
    /// `output`
    Output,
    /// `fieldset`
    Fieldset,
    /// Any element with an explicit widget role.
    Widget,
}

/// One control or widget.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlElement {
    /// Cache-scoped id.
    pub cache_id: usize,
    /// The control element.
    pub node: NodeId,
    /// Control kind.
    pub kind: ControlKind,
    /// Lower-case `type` of an `input`.
    pub input_type: Option<String>,
    /// The `<label>` associated by `for` or by wrapping.
    pub label_element: Option<NodeId>,
    /// Where the accessible name came from.
    pub label_source: NameSource,
    /// Nearest enclosing `fieldset`, `radiogroup` or `group`.
    pub grouping_element: Option<NodeId>,
    /// `legend` of the grouping fieldset.
    pub legend_element: Option<NodeId>,
    /// Enclosing `form`.
    pub parent_form: Option<NodeId>,
}

impl ControlElement {
    /// Returns `true` when the control must be labelled by an author.
    ///
    /// Button-like inputs are named by their value and fieldsets by their
    /// legend; neither needs a label.
    #[must_use]
    pub fn needs_label(&self, element: &DomElement) -> bool {
        match self.kind {
            ControlKind::Input => !matches!(
                self.input_type.as_deref(),
                Some("submit" | "reset" | "button" | "image")
            ),
            ControlKind::Select | ControlKind::Textarea => true,
            ControlKind::Widget => element.role.as_deref().is_some_and(|r| {
                matches!(
                    r,
                    "checkbox"
                        | "combobox"
                        | "listbox"
                        | "radio"
                        | "searchbox"
                        | "slider"
                        | "spinbutton"
                        | "switch"
                        | "textbox"
                )
            }),
            ControlKind::Button | ControlKind::Output | ControlKind::Fieldset => false,
        }
    }

    /// Returns `true` for buttons of any form.
    #[must_use]
    pub fn is_button(&self, element: &DomElement) -> bool {
        match self.kind {
            ControlKind::Button => true,
            ControlKind::Input => matches!(
                self.input_type.as_deref(),
                Some("submit" | "reset" | "button" | "image")
            ),
            ControlKind::Widget => element.has_role("button"),
            _ => false,
        }
    }
}

/// One `<label>` element.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelElement {
    /// Cache-scoped id.
    pub cache_id: usize,
    /// The label element.
    pub node: NodeId,
    /// Value of the `for` attribute.
    pub for_id: Option<String>,
    /// The control it labels.
    pub control: Option<NodeId>,
}

/// All controls, widgets and labels of the page.
#[derive(Debug, Default)]
pub struct ControlsCache {
    controls: Vec<ControlElement>,
    labels: Vec<LabelElement>,
    duplicate_groups: Vec<DuplicateGroup<String>>,
}

fn control_kind(e: &DomElement) -> Option<ControlKind> {
    let native = match e.tag_name.as_str() {
        "input" => (!e
            .attribute("type")
            .is_some_and(|t| t.trim().eq_ignore_ascii_case("hidden")))
        .then_some(ControlKind::Input),
        "button" => Some(ControlKind::Button),
        "select" => Some(ControlKind::Select),
        "textarea" => Some(ControlKind::Textarea),
        "output" => Some(ControlKind::Output),
        "fieldset" => Some(ControlKind::Fieldset),
        _ => None,
    };
    native.or_else(|| {
        (e.has_explicit_role
            && e.role
                .as_deref()
                .is_some_and(|r| r != "link" && roles::is_widget_role(r)))
        .then_some(ControlKind::Widget)
    })
}

fn is_labelable(kind: ControlKind) -> bool {
    matches!(
        kind,
        ControlKind::Input
            | ControlKind::Button
            | ControlKind::Select
            | ControlKind::Textarea
            | ControlKind::Output
    )
}

impl ControlsCache {
    /// Collects controls from the DOM cache.
    #[must_use]
    pub fn build(cache: &DomCache) -> Self {
        let labels: Vec<LabelElement> = cache
            .elements()
            .filter(|e| e.tag_name == "label")
            .enumerate()
            .map(|(cache_id, e)| {
                let for_id = e
                    .attribute("for")
                    .map(str::trim)
                    .filter(|f| !f.is_empty())
                    .map(String::from);
                let control = match &for_id {
                    Some(id) => cache.element_by_id(id).map(|c| c.id),
                    None => first_labelable_descendant(cache, e.id),
                };
                LabelElement {
                    cache_id,
                    node: e.id,
                    for_id,
                    control,
                }
            })
            .collect();

        let controls: Vec<ControlElement> = cache
            .elements()
            .filter_map(|e| control_kind(e).map(|k| (e, k)))
            .enumerate()
            .map(|(cache_id, (e, kind))| {
                let label_element = if is_labelable(kind) {
                    labels
                        .iter()
                        .find(|l| l.for_id.is_some() && l.control == Some(e.id))
                        .map(|l| l.node)
                        .or_else(|| {
                            cache
                                .ancestors(e.id)
                                .find(|a| a.tag_name == "label")
                                .map(|a| a.id)
                        })
                } else {
                    None
                };
                let grouping = cache.ancestors(e.id).find(|a| {
                    a.tag_name == "fieldset" || a.has_role("radiogroup") || a.has_role("group")
                });
                let legend_element = grouping
                    .filter(|g| g.tag_name == "fieldset")
                    .and_then(|g| cache.child_elements(g.id).find(|c| c.tag_name == "legend"))
                    .map(|l| l.id);
                ControlElement {
                    cache_id,
                    node: e.id,
                    kind,
                    input_type: (e.tag_name == "input").then(|| {
                        e.attribute("type")
                            .map_or_else(|| "text".to_string(), |t| t.trim().to_ascii_lowercase())
                    }),
                    label_element,
                    label_source: e.accessible_name.source,
                    grouping_element: grouping.map(|g| g.id),
                    legend_element,
                    parent_form: cache
                        .ancestors(e.id)
                        .find(|a| a.tag_name == "form")
                        .map(|a| a.id),
                }
            })
            .collect();

        let keyed = controls.iter().filter_map(|c| {
            let e = cache.element(c.node)?;
            if !e.is_visible_to_at()
                || e.accessible_name.is_empty()
                || c.kind == ControlKind::Fieldset
                || c.is_button(e)
            {
                return None;
            }
            Some((duplicate_key(cache, c, e), c.node))
        });
        let duplicate_groups = group_duplicates(cache, keyed);

        tracing::debug!(
            "Controls cache: {} control(s), {} label(s)",
            controls.len(),
            labels.len()
        );
        Self {
            controls,
            labels,
            duplicate_groups,
        }
    }

    /// Controls and widgets in document order.
    #[must_use]
    pub fn controls(&self) -> &[ControlElement] {
        &self.controls
    }

    /// Labels in document order.
    #[must_use]
    pub fn labels(&self) -> &[LabelElement] {
        &self.labels
    }

    /// Visible named controls grouped by label, qualified by the name of
    /// their grouping element.
    #[must_use]
    pub fn duplicate_groups(&self) -> &[DuplicateGroup<String>] {
        &self.duplicate_groups
    }

    /// Returns the control record of `node`.
    #[must_use]
    pub fn control(&self, node: NodeId) -> Option<&ControlElement> {
        self.controls.iter().find(|c| c.node == node)
    }
}

/// A control's comparison key: its name, prefixed by the name of its group
/// so that "Yes"/"No" radios in different fieldsets stay distinct.
fn duplicate_key(cache: &DomCache, control: &ControlElement, element: &DomElement) -> String {
    let group = control
        .grouping_element
        .and_then(|g| cache.element(g))
        .map(|g| g.accessible_name.for_comparison.as_str())
        .unwrap_or_default();
    if group.is_empty() {
        element.accessible_name.for_comparison.clone()
    } else {
        format!("{group} / {}", element.accessible_name.for_comparison)
    }
}

fn first_labelable_descendant(cache: &DomCache, id: NodeId) -> Option<NodeId> {
    cache.child_elements(id).find_map(|c| {
        if control_kind(c).is_some_and(is_labelable) {
            Some(c.id)
        } else {
            first_labelable_descendant(cache, c.id)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::BuildOptions;
    use crate::snapshot::SnapshotNode;

    fn el(tag: &str) -> SnapshotNode {
        SnapshotNode::element(tag)
    }

    fn text(t: &str) -> SnapshotNode {
        SnapshotNode::text(t)
    }

    fn build(children: Vec<SnapshotNode>) -> DomCache {
        DomCache::build(&SnapshotNode::document(children), &BuildOptions::default())
    }

    #[test]
    fn resolves_labels_groups_and_forms() {
        let cache = build(vec![el("form").children(vec![
            el("label").attr("for", "name").child(text("Name")),
            el("input").attr("id", "name"),
            el("fieldset").children(vec![
                el("legend").child(text("Colour")),
                el("label").child(el("input").attr("type", "radio")).child(text("Red")),
            ]),
            el("input").attr("type", "hidden"),
        ])]);
        let controls = cache.controls();
        assert_eq!(controls.controls().len(), 3);
        assert_eq!(controls.labels().len(), 2);

        let name = &controls.controls()[0];
        assert_eq!(name.kind, ControlKind::Input);
        assert_eq!(name.input_type.as_deref(), Some("text"));
        assert_eq!(name.label_element, Some(controls.labels()[0].node));
        assert_eq!(name.label_source, NameSource::Label);
        assert!(name.parent_form.is_some());

        let fieldset = &controls.controls()[1];
        assert_eq!(fieldset.kind, ControlKind::Fieldset);

        let radio = &controls.controls()[2];
        assert_eq!(radio.grouping_element, Some(fieldset.node));
        assert!(radio.legend_element.is_some());
        assert_eq!(radio.label_element, Some(controls.labels()[1].node));
        assert_eq!(controls.labels()[1].control, Some(radio.node));
    }

    #[test]
    fn widgets_need_labels_but_buttons_do_not() {
        let cache = build(vec![
            el("div").attr("role", "slider"),
            el("input").attr("type", "submit"),
            el("div").attr("role", "link"),
        ]);
        let controls = cache.controls();
        assert_eq!(controls.controls().len(), 2);
        let slider = &controls.controls()[0];
        let submit = &controls.controls()[1];
        assert!(slider.needs_label(cache.element(slider.node).unwrap()));
        assert!(!submit.needs_label(cache.element(submit.node).unwrap()));
        assert!(submit.is_button(cache.element(submit.node).unwrap()));
    }

    #[test]
    fn same_label_in_different_groups_is_not_duplicate() {
        let group = |legend: &str| {
            el("fieldset").children(vec![
                el("legend").child(text(legend)),
                el("label").child(el("input").attr("type", "radio")).child(text("Yes")),
            ])
        };
        let cache = build(vec![
            group("Newsletter"),
            group("Offers"),
            el("input").attr("aria-label", "Search"),
            el("input").attr("aria-label", "search"),
        ]);
        let groups = cache.controls().duplicate_groups();
        let duplicates: Vec<_> = groups.iter().filter(|g| g.is_duplicate).collect();
        assert_eq!(duplicates.len(), 1);
        assert_eq!(duplicates[0].key, "search");
    }
}
