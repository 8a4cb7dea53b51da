//! Lists sub-cache: containers, items and their nesting.

use super::{DomCache, DomElement, NodeId};
use serde::{Deserialize, Serialize};

/// Kind of list container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListKind {
    /// `ul`
    Unordered,
    /// `ol`
    Ordered,
    /// `dl`
    Description,
    /// `menu` or an ARIA `menu`/`menubar`.
    Menu,
    /// Any element with an explicit `role="list"`.
    Aria,
}

/// A list container.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListContainer {
    /// Cache-scoped id.
    pub cache_id: usize,
    /// The container element.
    pub node: NodeId,
    /// Container kind.
    pub kind: ListKind,
    /// Enclosing list container.
    pub parent_container: Option<NodeId>,
    /// Number of enclosing list containers.
    pub nesting_depth: usize,
    /// Items owned by this container, in document order.
    pub items: Vec<NodeId>,
}

/// A list item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListItem {
    /// Cache-scoped id.
    pub cache_id: usize,
    /// The item element.
    pub node: NodeId,
    /// Nearest enclosing list container.
    pub container: Option<NodeId>,
}

/// All lists of the page.
#[derive(Debug, Default)]
pub struct ListsCache {
    containers: Vec<ListContainer>,
    items: Vec<ListItem>,
    next_id: usize,
}

fn container_kind(e: &DomElement) -> Option<ListKind> {
    if e.has_explicit_role {
        return match e.role.as_deref() {
            Some("list") => Some(ListKind::Aria),
            Some("menu" | "menubar") => Some(ListKind::Menu),
            _ => None,
        };
    }
    match e.tag_name.as_str() {
        "ul" => Some(ListKind::Unordered),
        "ol" => Some(ListKind::Ordered),
        "dl" => Some(ListKind::Description),
        "menu" => Some(ListKind::Menu),
        _ => None,
    }
}

fn is_item(e: &DomElement) -> bool {
    if e.has_explicit_role {
        return matches!(
            e.role.as_deref(),
            Some("listitem" | "menuitem" | "menuitemcheckbox" | "menuitemradio")
        );
    }
    matches!(e.tag_name.as_str(), "li" | "dt" | "dd")
}

impl ListsCache {
    /// Collects lists from the DOM cache.
    #[must_use]
    pub fn build(cache: &DomCache) -> Self {
        let mut lists = Self::default();
        for root in cache.roots() {
            lists.visit(cache, *root, None, 0);
        }
        lists.containers.sort_by_key(|c| c.node);
        tracing::debug!(
            "Lists cache: {} container(s), {} item(s)",
            lists.containers.len(),
            lists.items.len()
        );
        lists
    }

    fn next_cache_id(&mut self) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn visit(&mut self, cache: &DomCache, id: NodeId, container: Option<NodeId>, depth: usize) {
        let Some(e) = cache.element(id) else {
            return;
        };

        let mut child_container = container;
        let mut child_depth = depth;
        if let Some(kind) = container_kind(e) {
            let cache_id = self.next_cache_id();
            self.containers.push(ListContainer {
                cache_id,
                node: id,
                kind,
                parent_container: container,
                nesting_depth: depth,
                items: Vec::new(),
            });
            child_container = Some(id);
            child_depth = depth + 1;
        } else if is_item(e) {
            let cache_id = self.next_cache_id();
            self.items.push(ListItem {
                cache_id,
                node: id,
                container,
            });
            if let Some(c) = container.and_then(|c| self.containers.iter_mut().find(|x| x.node == c)) {
                c.items.push(id);
            }
        }

        for child in &e.children {
            self.visit(cache, *child, child_container, child_depth);
        }
    }

    /// Containers in document order.
    #[must_use]
    pub fn containers(&self) -> &[ListContainer] {
        &self.containers
    }

    /// Items in document order.
    #[must_use]
    pub fn items(&self) -> &[ListItem] {
        &self.items
    }

    /// Returns the container record of `node`.
    #[must_use]
    pub fn container(&self, node: NodeId) -> Option<&ListContainer> {
        self.containers.iter().find(|c| c.node == node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::BuildOptions;
    use crate::snapshot::SnapshotNode;

    fn li(text: &str) -> SnapshotNode {
        SnapshotNode::element("li").child(SnapshotNode::text(text))
    }

    #[test]
    fn nested_lists_track_parent_and_depth() {
        let doc = SnapshotNode::document(vec![SnapshotNode::element("ul")
            .child(li("one"))
            .child(
                SnapshotNode::element("li")
                    .child(SnapshotNode::text("two"))
                    .child(SnapshotNode::element("ol").child(li("a")).child(li("b"))),
            )]);
        let cache = DomCache::build(&doc, &BuildOptions::default());
        let lists = cache.lists();

        assert_eq!(lists.containers().len(), 2);
        let ul = &lists.containers()[0];
        let ol = &lists.containers()[1];
        assert_eq!(ul.kind, ListKind::Unordered);
        assert_eq!(ul.items.len(), 2);
        assert_eq!(ol.kind, ListKind::Ordered);
        assert_eq!(ol.parent_container, Some(ul.node));
        assert_eq!(ol.nesting_depth, 1);
        assert_eq!(ol.items.len(), 2);
        assert_eq!(lists.items().len(), 4);
        assert!(lists.items().iter().all(|i| i.container.is_some()));
    }

    #[test]
    fn aria_roles_define_containers_and_items() {
        let doc = SnapshotNode::document(vec![SnapshotNode::element("div")
            .attr("role", "list")
            .child(SnapshotNode::element("div").attr("role", "listitem"))
            .child(SnapshotNode::element("ul").attr("role", "presentation"))]);
        let cache = DomCache::build(&doc, &BuildOptions::default());
        let lists = cache.lists();
        assert_eq!(lists.containers().len(), 1);
        assert_eq!(lists.containers()[0].kind, ListKind::Aria);
        assert_eq!(lists.containers()[0].items.len(), 1);
    }
}
