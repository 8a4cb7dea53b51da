//! Headings and landmarks sub-cache.
//!
//! Every heading records two logical parents: the nearest preceding
//! AT-visible heading of a shallower level in the whole page, and the same
//! but restricted to the heading's own landmark. Whether a heading is
//! properly nested is answered by [`NestingMemo`], which composes the
//! verdict along the parent chain.

use super::{DomCache, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One heading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeadingElement {
    /// Cache-scoped id.
    pub cache_id: usize,
    /// The heading element.
    pub node: NodeId,
    /// Level 1-6 (ARIA headings may go deeper).
    pub level: u8,
    /// `true` when exposed to assistive technology.
    pub is_visible_to_at: bool,
    /// Nearest enclosing landmark.
    pub parent_landmark: Option<NodeId>,
    /// Nearest preceding visible heading of a shallower level.
    pub nesting_parent_heading: Option<NodeId>,
    /// As `nesting_parent_heading`, restricted to the same landmark.
    pub landmark_parent_heading: Option<NodeId>,
}

/// One landmark.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LandmarkElement {
    /// Cache-scoped id.
    pub cache_id: usize,
    /// The landmark element.
    pub node: NodeId,
    /// Landmark role.
    pub role: String,
    /// Enclosing landmark.
    pub parent_landmark: Option<NodeId>,
    /// Number of enclosing landmarks.
    pub nesting_depth: usize,
}

/// Headings and landmarks of the page.
#[derive(Debug, Default)]
pub struct HeadingsLandmarksCache {
    headings: Vec<HeadingElement>,
    landmarks: Vec<LandmarkElement>,
}

/// Finds the nearest shallower heading on `stack`. Only visible headings
/// reshape the stack; hidden ones are looked up without side effects.
fn parent_from_stack(stack: &mut Vec<(NodeId, u8)>, level: u8, visible: bool) -> Option<NodeId> {
    let keep = stack
        .iter()
        .rposition(|(_, l)| *l < level)
        .map_or(0, |i| i + 1);
    let parent = keep.checked_sub(1).and_then(|i| stack.get(i)).map(|(id, _)| *id);
    if visible {
        stack.truncate(keep);
    }
    parent
}

impl HeadingsLandmarksCache {
    /// Collects headings and landmarks from the DOM cache.
    #[must_use]
    pub fn build(cache: &DomCache) -> Self {
        let mut headings = Vec::new();
        let mut landmarks: Vec<LandmarkElement> = Vec::new();
        let mut global: Vec<(NodeId, u8)> = Vec::new();
        let mut per_landmark: HashMap<Option<NodeId>, Vec<(NodeId, u8)>> = HashMap::new();

        for e in cache.elements() {
            if e.is_landmark() {
                let nesting_depth = e
                    .parent_landmark
                    .and_then(|p| landmarks.iter().find(|l| l.node == p))
                    .map_or(0, |p| p.nesting_depth + 1);
                landmarks.push(LandmarkElement {
                    cache_id: landmarks.len(),
                    node: e.id,
                    role: e.role.clone().unwrap_or_default(),
                    parent_landmark: e.parent_landmark,
                    nesting_depth,
                });
            }

            let Some(level) = e.heading_level() else {
                continue;
            };
            let visible = e.is_visible_to_at();
            let nesting_parent_heading = parent_from_stack(&mut global, level, visible);
            let scoped = per_landmark.entry(e.parent_landmark).or_default();
            let landmark_parent_heading = parent_from_stack(scoped, level, visible);
            if visible {
                global.push((e.id, level));
                scoped.push((e.id, level));
            }
            headings.push(HeadingElement {
                cache_id: headings.len(),
                node: e.id,
                level,
                is_visible_to_at: visible,
                parent_landmark: e.parent_landmark,
                nesting_parent_heading,
                landmark_parent_heading,
            });
        }

        tracing::debug!(
            "Headings cache: {} heading(s), {} landmark(s)",
            headings.len(),
            landmarks.len()
        );
        Self {
            headings,
            landmarks,
        }
    }

    /// Headings in document order.
    #[must_use]
    pub fn headings(&self) -> &[HeadingElement] {
        &self.headings
    }

    /// Landmarks in document order.
    #[must_use]
    pub fn landmarks(&self) -> &[LandmarkElement] {
        &self.landmarks
    }

    /// Returns the heading record of `node`.
    #[must_use]
    pub fn heading(&self, node: NodeId) -> Option<&HeadingElement> {
        self.headings.iter().find(|h| h.node == node)
    }

    /// Landmarks with the given role.
    pub fn landmarks_with_role<'a>(
        &'a self,
        role: &'a str,
    ) -> impl Iterator<Item = &'a LandmarkElement> + 'a {
        self.landmarks.iter().filter(move |l| l.role == role)
    }
}

/// Which parent chain a nesting check follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NestingScope {
    /// `nesting_parent_heading` across the page.
    Global,
    /// `landmark_parent_heading` within each landmark.
    Landmark,
}

/// Read-through memo of "properly nested" verdicts for one rule pass.
///
/// A heading is properly nested when it has no parent heading, or when its
/// level is at most one deeper than its parent's and the parent is itself
/// properly nested. A single skipped level therefore marks every heading
/// below it in the logical heading tree.
#[derive(Debug)]
pub struct NestingMemo<'a> {
    headings: &'a HeadingsLandmarksCache,
    scope: NestingScope,
    verdicts: HashMap<NodeId, bool>,
}

impl<'a> NestingMemo<'a> {
    /// Creates an empty memo.
    #[must_use]
    pub fn new(headings: &'a HeadingsLandmarksCache, scope: NestingScope) -> Self {
        Self {
            headings,
            scope,
            verdicts: HashMap::new(),
        }
    }

    fn parent_of(&self, heading: &HeadingElement) -> Option<&'a HeadingElement> {
        let parent = match self.scope {
            NestingScope::Global => heading.nesting_parent_heading,
            NestingScope::Landmark => heading.landmark_parent_heading,
        }?;
        self.headings.heading(parent)
    }

    /// Returns the verdict for `node`, computing and storing it (and those
    /// of its ancestors) on first use.
    pub fn is_properly_nested(&mut self, node: NodeId) -> bool {
        let Some(start) = self.headings.heading(node) else {
            return true;
        };

        let mut chain: Vec<&'a HeadingElement> = Vec::new();
        let mut current = Some(start);
        let mut known = true;
        while let Some(h) = current {
            if let Some(v) = self.verdicts.get(&h.node) {
                known = *v;
                break;
            }
            chain.push(h);
            current = self.parent_of(h);
        }

        // Resolve from the outermost unresolved heading downwards.
        for h in chain.into_iter().rev() {
            let verdict = match self.parent_of(h) {
                None => true,
                Some(parent) => known && h.level <= parent.level.saturating_add(1),
            };
            self.verdicts.insert(h.node, verdict);
            known = verdict;
        }
        self.verdicts.get(&node).copied().unwrap_or(true)
    }

    /// Returns the parent heading the verdict for `node` was based on.
    #[must_use]
    pub fn parent(&self, node: NodeId) -> Option<&'a HeadingElement> {
        self.headings.heading(node).and_then(|h| self.parent_of(h))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::BuildOptions;
    use crate::host::ComputedStyle;
    use crate::snapshot::SnapshotNode;

    fn h(level: u8, text: &str) -> SnapshotNode {
        SnapshotNode::element(format!("h{level}")).child(SnapshotNode::text(text))
    }

    fn build(children: Vec<SnapshotNode>) -> DomCache {
        DomCache::build(&SnapshotNode::document(children), &BuildOptions::default())
    }

    fn verdicts(cache: &DomCache, scope: NestingScope) -> Vec<(u8, bool)> {
        let headings = cache.headings();
        let mut memo = NestingMemo::new(headings, scope);
        headings
            .headings()
            .iter()
            .map(|h| (h.level, memo.is_properly_nested(h.node)))
            .collect()
    }

    #[test]
    fn nesting_parent_is_nearest_shallower_visible_heading() {
        let cache = build(vec![
            h(1, "a"),
            h(2, "b"),
            h(3, "c"),
            h(2, "d"),
            h(2, "hidden").style(ComputedStyle::default().display("none")),
            h(3, "e"),
        ]);
        let headings = cache.headings().headings();
        let parent = |i: usize| headings[i].nesting_parent_heading;
        assert_eq!(parent(0), None);
        assert_eq!(parent(1), Some(headings[0].node));
        assert_eq!(parent(2), Some(headings[1].node));
        assert_eq!(parent(3), Some(headings[0].node));
        assert_eq!(parent(5), Some(headings[3].node));
        assert!(!headings[4].is_visible_to_at);
    }

    #[test]
    fn improper_nesting_poisons_descendants() {
        let cache = build(vec![h(1, "a"), h(3, "skip"), h(4, "child"), h(5, "grandchild"), h(2, "ok")]);
        assert_eq!(
            verdicts(&cache, NestingScope::Global),
            vec![(1, true), (3, false), (4, false), (5, false), (2, true)]
        );
    }

    #[test]
    fn memo_answers_in_any_order() {
        let cache = build(vec![h(1, "a"), h(3, "skip"), h(4, "child")]);
        let headings = cache.headings();
        let mut memo = NestingMemo::new(headings, NestingScope::Global);
        let child = headings.headings()[2].node;
        assert!(!memo.is_properly_nested(child));
        assert!(!memo.is_properly_nested(headings.headings()[1].node));
        assert!(memo.is_properly_nested(headings.headings()[0].node));
        assert_eq!(memo.parent(child).map(|p| p.level), Some(3));
    }

    #[test]
    fn landmark_scope_resets_at_landmark_boundary() {
        let cache = build(vec![
            h(1, "page"),
            SnapshotNode::element("nav").child(h(3, "menu")),
            SnapshotNode::element("main").children(vec![h(1, "title"), h(2, "section")]),
        ]);
        let headings = cache.headings();
        let nav_heading = &headings.headings()[1];
        assert_eq!(nav_heading.landmark_parent_heading, None);
        assert!(nav_heading.nesting_parent_heading.is_some());
        assert_eq!(
            verdicts(&cache, NestingScope::Landmark),
            vec![(1, true), (3, true), (1, true), (2, true)]
        );
        assert_eq!(
            verdicts(&cache, NestingScope::Global),
            vec![(1, true), (3, false), (1, true), (2, true)]
        );
    }

    #[test]
    fn landmarks_record_role_and_nesting() {
        let cache = build(vec![
            SnapshotNode::element("header"),
            SnapshotNode::element("main").child(
                SnapshotNode::element("section")
                    .attr("aria-label", "News")
                    .child(SnapshotNode::element("header")),
            ),
        ]);
        let landmarks = cache.headings().landmarks();
        let roles: Vec<&str> = landmarks.iter().map(|l| l.role.as_str()).collect();
        assert_eq!(roles, vec!["banner", "main", "region"]);
        assert_eq!(landmarks[2].nesting_depth, 1);
        assert_eq!(cache.headings().landmarks_with_role("main").count(), 1);
    }
}
