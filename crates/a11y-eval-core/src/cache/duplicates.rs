//! Duplicate detection by sorted adjacent scan.

use super::{DomCache, NodeId};

/// A run of entries sharing one comparison key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateGroup<K> {
    /// The shared key.
    pub key: K,
    /// Members in document order.
    pub members: Vec<NodeId>,
    /// `true` when the run counts as a duplicate.
    pub is_duplicate: bool,
}

impl<K> DuplicateGroup<K> {
    /// Returns `true` when `id` belongs to this group.
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.members.contains(&id)
    }
}

/// Groups `entries` by key.
///
/// Entries are sorted by key (then document order) and runs of equal keys
/// are collected with a single adjacent-pair scan. A run of one is unique.
/// A run made of exactly one `tab` and one `tabpanel` is allowed to share a
/// name and is not a duplicate. Callers exclude AT-hidden entries first.
pub fn group_duplicates<K: Ord + Clone>(
    cache: &DomCache,
    entries: impl IntoIterator<Item = (K, NodeId)>,
) -> Vec<DuplicateGroup<K>> {
    let mut entries: Vec<(K, NodeId)> = entries.into_iter().collect();
    entries.sort();

    let mut groups: Vec<DuplicateGroup<K>> = Vec::new();
    for (key, id) in entries {
        match groups.last_mut() {
            Some(group) if group.key == key => group.members.push(id),
            _ => groups.push(DuplicateGroup {
                key,
                members: vec![id],
                is_duplicate: false,
            }),
        }
    }

    for group in &mut groups {
        group.is_duplicate = group.members.len() > 1 && !is_tab_pair(cache, &group.members);
    }
    groups
}

fn is_tab_pair(cache: &DomCache, members: &[NodeId]) -> bool {
    let [a, b] = members else {
        return false;
    };
    let role = |id: &NodeId| cache.element(*id).and_then(|e| e.role.as_deref());
    matches!(
        (role(a), role(b)),
        (Some("tab"), Some("tabpanel")) | (Some("tabpanel"), Some("tab"))
    )
}
