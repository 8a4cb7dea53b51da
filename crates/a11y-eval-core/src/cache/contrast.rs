//! Colour contrast aggregation.

use super::{DomCache, DomElement, NodeId};
use serde::{Deserialize, Serialize};

/// The style properties that decide a contrast verdict.
///
/// Elements with equal signatures always get the same result, so reports can
/// show one row per signature.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StyleSignature {
    /// Foreground `#rrggbb`.
    pub color_hex: String,
    /// Background `#rrggbb`.
    pub background_hex: String,
    /// Background image, if any.
    pub background_image: Option<String>,
    /// Font size in tenths of a CSS pixel.
    pub font_size_tenths: u32,
    /// Numeric font weight.
    pub font_weight: u16,
    /// Font family list.
    pub font_family: String,
}

impl StyleSignature {
    /// Signature of an element's resolved style.
    #[must_use]
    pub fn of(element: &DomElement) -> Self {
        let style = &element.style;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let font_size_tenths = (style.font_size * 10.0).round().max(0.0) as u32;
        Self {
            color_hex: style.color_hex.clone(),
            background_hex: style.background_hex.clone(),
            background_image: style.background_image.clone(),
            font_size_tenths,
            font_weight: style.font_weight,
            font_family: style.font_family.clone(),
        }
    }
}

/// One element that directly owns text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColorContrastItem {
    /// Cache-scoped id.
    pub cache_id: usize,
    /// The text-bearing element.
    pub node: NodeId,
    /// Contrast between foreground and background.
    pub contrast_ratio: f64,
    /// Large-text threshold met.
    pub is_large_font: bool,
    /// Effective opacity.
    pub opacity: f64,
    /// Grouping signature.
    pub signature: StyleSignature,
}

impl ColorContrastItem {
    /// Returns `true` when a background image makes the computed ratio
    /// unreliable.
    #[must_use]
    pub fn has_background_image(&self) -> bool {
        self.signature.background_image.is_some()
    }
}

/// Items sharing one style signature.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColorContrastGroup {
    /// The shared signature.
    pub signature: StyleSignature,
    /// Contrast ratio of the group.
    pub contrast_ratio: f64,
    /// Large-text threshold met.
    pub is_large_font: bool,
    /// Member elements in document order.
    pub members: Vec<NodeId>,
}

/// Text-bearing elements and their style groups.
#[derive(Debug, Default)]
pub struct ColorContrastCache {
    items: Vec<ColorContrastItem>,
    groups: Vec<ColorContrastGroup>,
}

impl ColorContrastCache {
    /// Collects text-bearing elements from the DOM cache.
    #[must_use]
    pub fn build(cache: &DomCache) -> Self {
        let items: Vec<ColorContrastItem> = cache
            .elements()
            .filter(|e| e.has_text)
            .enumerate()
            .map(|(cache_id, e)| ColorContrastItem {
                cache_id,
                node: e.id,
                contrast_ratio: e.style.contrast_ratio,
                is_large_font: e.style.is_large_font,
                opacity: e.style.opacity,
                signature: StyleSignature::of(e),
            })
            .collect();

        let mut groups: Vec<ColorContrastGroup> = Vec::new();
        for item in &items {
            match groups.iter_mut().find(|g| g.signature == item.signature) {
                Some(group) => group.members.push(item.node),
                None => groups.push(ColorContrastGroup {
                    signature: item.signature.clone(),
                    contrast_ratio: item.contrast_ratio,
                    is_large_font: item.is_large_font,
                    members: vec![item.node],
                }),
            }
        }

        tracing::debug!(
            "Colour contrast cache: {} item(s) in {} group(s)",
            items.len(),
            groups.len()
        );
        Self { items, groups }
    }

    /// Items in document order.
    #[must_use]
    pub fn items(&self) -> &[ColorContrastItem] {
        &self.items
    }

    /// Groups in order of first appearance.
    #[must_use]
    pub fn groups(&self) -> &[ColorContrastGroup] {
        &self.groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::BuildOptions;
    use crate::host::ComputedStyle;
    use crate::snapshot::SnapshotNode;

    fn p(style: ComputedStyle, text: &str) -> SnapshotNode {
        SnapshotNode::element("p")
            .style(style)
            .child(SnapshotNode::text(text))
    }

    #[test]
    fn items_are_grouped_by_signature() {
        let grey = ComputedStyle::default().color("#777777");
        let doc = SnapshotNode::document(vec![SnapshotNode::element("div")
            .style(ComputedStyle::default().background_color("rgb(255, 255, 255)"))
            .children(vec![
                p(ComputedStyle::default(), "a"),
                p(grey.clone(), "b"),
                p(ComputedStyle::default(), "c"),
                p(grey, "d"),
                SnapshotNode::element("span"),
            ])]);
        let cache = DomCache::build(&doc, &BuildOptions::default());
        let contrast = cache.color_contrast();

        assert_eq!(contrast.items().len(), 4);
        assert_eq!(contrast.groups().len(), 2);
        let black = &contrast.groups()[0];
        assert_eq!(black.signature.color_hex, "#000000");
        assert!((black.contrast_ratio - 21.0).abs() < f64::EPSILON);
        assert_eq!(black.members.len(), 2);
        let grey = &contrast.groups()[1];
        assert_eq!(grey.signature.color_hex, "#777777");
        assert!((grey.contrast_ratio - 4.5).abs() < f64::EPSILON);
        assert_eq!(grey.signature.font_size_tenths, 160);
    }
}
