//! Links sub-cache.

use super::{group_duplicates, DomCache, DomElement, NodeId};
use serde::{Deserialize, Serialize};

/// Kind of link target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkType {
    /// Fragment within the page (`#...`).
    Internal,
    /// Web resource, absolute (`http:`/`https:`) or relative.
    Http,
    /// `mailto:` address.
    Mailto,
    /// `tel:` number.
    Tel,
    /// `javascript:` pseudo-URL.
    Javascript,
    /// Empty or missing `href`.
    Empty,
    /// Any other scheme.
    Other,
}

impl LinkType {
    /// Classifies an `href` value.
    #[must_use]
    pub fn from_href(href: &str) -> Self {
        let href = href.trim();
        if href.is_empty() {
            return Self::Empty;
        }
        if href.starts_with('#') {
            return Self::Internal;
        }
        let lower = href.to_ascii_lowercase();
        match lower.split_once(':') {
            Some(("http" | "https", _)) => Self::Http,
            Some(("mailto", _)) => Self::Mailto,
            Some(("tel", _)) => Self::Tel,
            Some(("javascript", _)) => Self::Javascript,
            Some((scheme, _))
                if !scheme.is_empty()
                    && !scheme.contains('/')
                    && scheme
                        .chars()
                        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')) =>
            {
                Self::Other
            }
            _ => Self::Http,
        }
    }
}

/// One link.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkElement {
    /// Cache-scoped id, in insertion order.
    pub cache_id: usize,
    /// The link element.
    pub node: NodeId,
    /// Trimmed `href` (empty for ARIA links without one).
    pub href: String,
    /// Target kind.
    pub link_type: LinkType,
}

/// Visible links sharing one accessible name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkNameGroup {
    /// Comparison form of the shared name.
    pub name: String,
    /// Members in document order.
    pub members: Vec<NodeId>,
    /// `true` when every member points to the same `href`.
    pub same_href: bool,
}

/// Visible links sharing one destination.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkHrefGroup {
    /// Normalized form of the shared `href`.
    pub href: String,
    /// Members in document order.
    pub members: Vec<NodeId>,
    /// `true` when every member has the same accessible name.
    pub same_name: bool,
}

/// All links of the page.
#[derive(Debug, Default)]
pub struct LinksCache {
    links: Vec<LinkElement>,
    name_groups: Vec<LinkNameGroup>,
    href_groups: Vec<LinkHrefGroup>,
}

/// Comparison form of an `href`, or `None` when it names no destination.
///
/// Scheme and host of absolute URLs are case-insensitive, and a trailing
/// `/` after a non-root path is dropped.
#[must_use]
pub fn normalize_href(href: &str) -> Option<String> {
    let href = href.trim();
    if matches!(
        LinkType::from_href(href),
        LinkType::Empty | LinkType::Javascript
    ) {
        return None;
    }
    let mut normalized = match href.split_once("://") {
        Some((scheme, rest)) => {
            let (authority, path) = rest.find('/').map_or((rest, ""), |i| rest.split_at(i));
            format!(
                "{}://{}{}",
                scheme.to_ascii_lowercase(),
                authority.to_ascii_lowercase(),
                path
            )
        }
        None => href.to_string(),
    };
    if normalized.len() > 1 && normalized.ends_with('/') && !normalized.ends_with("://") {
        normalized.pop();
    }
    Some(normalized)
}

fn is_link(e: &DomElement) -> bool {
    if e.has_explicit_role {
        return e.has_role("link");
    }
    matches!(e.tag_name.as_str(), "a" | "area") && e.has_attribute("href")
}

impl LinksCache {
    /// Collects links from the DOM cache.
    #[must_use]
    pub fn build(cache: &DomCache) -> Self {
        let links: Vec<LinkElement> = cache
            .elements()
            .filter(|e| is_link(e))
            .enumerate()
            .map(|(cache_id, e)| {
                let href = e.attribute("href").unwrap_or_default().trim().to_string();
                LinkElement {
                    cache_id,
                    node: e.id,
                    link_type: LinkType::from_href(&href),
                    href,
                }
            })
            .collect();

        let named = links.iter().filter_map(|l| {
            let e = cache.element(l.node)?;
            (e.is_visible_to_at() && !e.accessible_name.is_empty())
                .then(|| (e.accessible_name.for_comparison.clone(), l.node))
        });
        let name_groups = group_duplicates(cache, named)
            .into_iter()
            .map(|group| {
                let hrefs: Vec<&str> = group
                    .members
                    .iter()
                    .filter_map(|id| links.iter().find(|l| l.node == *id))
                    .map(|l| l.href.as_str())
                    .collect();
                let same_href = hrefs.windows(2).all(|w| w[0] == w[1]);
                LinkNameGroup {
                    name: group.key,
                    members: group.members,
                    same_href,
                }
            })
            .collect();

        let by_href = links.iter().filter_map(|l| {
            let e = cache.element(l.node)?;
            if !e.is_visible_to_at() {
                return None;
            }
            Some((normalize_href(&l.href)?, l.node))
        });
        let href_groups = group_duplicates(cache, by_href)
            .into_iter()
            .map(|group| {
                let names: Vec<&str> = group
                    .members
                    .iter()
                    .filter_map(|id| cache.element(*id))
                    .map(|e| e.accessible_name.for_comparison.as_str())
                    .collect();
                let same_name = names.windows(2).all(|w| w[0] == w[1]);
                LinkHrefGroup {
                    href: group.key,
                    members: group.members,
                    same_name,
                }
            })
            .collect();

        tracing::debug!("Links cache: {} link(s)", links.len());
        Self {
            links,
            name_groups,
            href_groups,
        }
    }

    /// Links in document order.
    #[must_use]
    pub fn links(&self) -> &[LinkElement] {
        &self.links
    }

    /// Groups of visible named links by accessible name.
    #[must_use]
    pub fn name_groups(&self) -> &[LinkNameGroup] {
        &self.name_groups
    }

    /// Returns the name group containing `node`.
    #[must_use]
    pub fn name_group_of(&self, node: NodeId) -> Option<&LinkNameGroup> {
        self.name_groups.iter().find(|g| g.members.contains(&node))
    }

    /// Groups of visible links by normalized `href`.
    #[must_use]
    pub fn href_groups(&self) -> &[LinkHrefGroup] {
        &self.href_groups
    }

    /// Returns the href group containing `node`.
    #[must_use]
    pub fn href_group_of(&self, node: NodeId) -> Option<&LinkHrefGroup> {
        self.href_groups.iter().find(|g| g.members.contains(&node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::BuildOptions;
    use crate::snapshot::SnapshotNode;

    fn link(href: &str, text: &str) -> SnapshotNode {
        SnapshotNode::element("a")
            .attr("href", href)
            .child(SnapshotNode::text(text))
    }

    #[test]
    fn classifies_hrefs() {
        assert_eq!(LinkType::from_href(""), LinkType::Empty);
        assert_eq!(LinkType::from_href("#top"), LinkType::Internal);
        assert_eq!(LinkType::from_href("/x"), LinkType::Http);
        assert_eq!(LinkType::from_href("page.html?a=b:c"), LinkType::Http);
        assert_eq!(LinkType::from_href("HTTPS://example.com"), LinkType::Http);
        assert_eq!(LinkType::from_href("mailto:a@b.c"), LinkType::Mailto);
        assert_eq!(LinkType::from_href("tel:123"), LinkType::Tel);
        assert_eq!(LinkType::from_href("javascript:void(0)"), LinkType::Javascript);
        assert_eq!(LinkType::from_href("ftp://host"), LinkType::Other);
    }

    #[test]
    fn groups_links_by_name_and_compares_hrefs() {
        let doc = SnapshotNode::document(vec![
            link("/x", "Click here"),
            link("/x", "click  HERE"),
            link("/a", "More"),
            link("/b", "more"),
            SnapshotNode::element("a").child(SnapshotNode::text("no href")),
        ]);
        let cache = DomCache::build(&doc, &BuildOptions::default());
        let links = cache.links();
        assert_eq!(links.links().len(), 4);
        assert_eq!(links.links()[3].cache_id, 3);

        let groups = links.name_groups();
        assert_eq!(groups.len(), 2);
        let click = links.name_group_of(links.links()[0].node).unwrap();
        assert_eq!(click.name, "click here");
        assert!(click.same_href);
        let more = links.name_group_of(links.links()[2].node).unwrap();
        assert!(!more.same_href);
    }

    #[test]
    fn normalizes_hrefs() {
        assert_eq!(normalize_href(" /x/ ").as_deref(), Some("/x"));
        assert_eq!(normalize_href("/").as_deref(), Some("/"));
        assert_eq!(
            normalize_href("HTTPS://Example.COM/Path/").as_deref(),
            Some("https://example.com/Path")
        );
        assert_eq!(
            normalize_href("https://example.com/").as_deref(),
            Some("https://example.com")
        );
        assert_eq!(normalize_href(""), None);
        assert_eq!(normalize_href("javascript:void(0)"), None);
    }

    #[test]
    fn groups_links_by_href_and_compares_names() {
        let doc = SnapshotNode::document(vec![
            link("/x", "Home"),
            link("/x/", "Start page"),
            link("/y", "Docs"),
            link("/y", "docs"),
            link("/x", "Hidden").attr("aria-hidden", "true"),
            link("javascript:go()", "Go"),
        ]);
        let cache = DomCache::build(&doc, &BuildOptions::default());
        let links = cache.links();

        let home = links.href_group_of(links.links()[0].node).unwrap();
        assert_eq!(home.href, "/x");
        assert_eq!(home.members.len(), 2);
        assert!(!home.same_name);
        let docs = links.href_group_of(links.links()[2].node).unwrap();
        assert!(docs.same_name);
        assert!(links.href_group_of(links.links()[4].node).is_none());
        assert!(links.href_group_of(links.links()[5].node).is_none());
        assert_eq!(links.href_groups().len(), 2);
    }
}
