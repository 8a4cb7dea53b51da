//! Images sub-cache.

use super::{DomCache, DomElement, NodeId};
use serde::{Deserialize, Serialize};

/// One image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageElement {
    /// Cache-scoped id.
    pub cache_id: usize,
    /// The image element.
    pub node: NodeId,
    /// `alt` attribute, untrimmed.
    pub alt: Option<String>,
    /// `src` (or `href` for `area`).
    pub src: Option<String>,
    /// Marked as decorative with `alt=""` or a `presentation`/`none` role.
    pub is_decorative: bool,
}

/// All images of the page.
#[derive(Debug, Default)]
pub struct ImagesCache {
    images: Vec<ImageElement>,
}

fn is_image(e: &DomElement) -> bool {
    if e.has_explicit_role && e.has_role("img") {
        return true;
    }
    match e.tag_name.as_str() {
        "img" | "area" => true,
        "input" => e
            .attribute("type")
            .is_some_and(|t| t.trim().eq_ignore_ascii_case("image")),
        _ => false,
    }
}

impl ImagesCache {
    /// Collects images from the DOM cache.
    #[must_use]
    pub fn build(cache: &DomCache) -> Self {
        let images: Vec<ImageElement> = cache
            .elements()
            .filter(|e| is_image(e))
            .enumerate()
            .map(|(cache_id, e)| {
                let alt = e.attribute("alt").map(String::from);
                let is_decorative = e.tag_name == "img"
                    && (alt.as_deref() == Some("")
                        || (e.has_explicit_role
                            && matches!(e.role.as_deref(), Some("presentation" | "none"))));
                ImageElement {
                    cache_id,
                    node: e.id,
                    src: e
                        .attribute("src")
                        .or_else(|| e.attribute("href"))
                        .map(String::from),
                    alt,
                    is_decorative,
                }
            })
            .collect();
        tracing::debug!("Images cache: {} image(s)", images.len());
        Self { images }
    }

    /// Images in document order.
    #[must_use]
    pub fn images(&self) -> &[ImageElement] {
        &self.images
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::BuildOptions;
    use crate::snapshot::SnapshotNode;

    #[test]
    fn collects_images_and_decorative_flags() {
        let doc = SnapshotNode::document(vec![
            SnapshotNode::element("img").attr("src", "a.png").attr("alt", "Logo"),
            SnapshotNode::element("img").attr("src", "b.png").attr("alt", ""),
            SnapshotNode::element("img").attr("role", "presentation"),
            SnapshotNode::element("input").attr("type", "image"),
            SnapshotNode::element("div").attr("role", "img").attr("aria-label", "Chart"),
            SnapshotNode::element("input").attr("type", "text"),
        ]);
        let cache = DomCache::build(&doc, &BuildOptions::default());
        let images = cache.images().images();
        assert_eq!(images.len(), 5);
        let decorative: Vec<bool> = images.iter().map(|i| i.is_decorative).collect();
        assert_eq!(decorative, vec![false, true, true, false, false]);
        assert_eq!(images[0].src.as_deref(), Some("a.png"));
        assert_eq!(images[0].alt.as_deref(), Some("Logo"));
    }
}
