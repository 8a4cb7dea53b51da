//! Text contrast rules (COLOR_1, COLOR_2).
//!
//! Both rules visit every element that directly owns text and compare the
//! contrast ratio resolved while the cache was built with a threshold that
//! depends on whether the text is large.
//!
//! # Classification
//!
//! - Not rendered on screen: hidden
//! - Background image: manual check (the image may change the contrast)
//! - Meets the threshold with opacity below 1: manual check
//! - Meets the threshold: pass
//! - Otherwise: fail
//!
//! # Configuration
//!
//! - `threshold`: minimum ratio for normal text
//! - `large_threshold`: minimum ratio for large text

use crate::support::{format_ratio, positive_or};
use a11y_eval_core::cache::ColorContrastItem;
use a11y_eval_core::{
    DomCache, Rule, RuleCategory, RuleResult, RuleScope, TestResult, WcagLevel,
};

const TARGETS: &[&str] = &["text"];

/// Normal and large-text contrast thresholds.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Thresholds {
    normal: f64,
    large: f64,
}

impl Thresholds {
    fn for_item(self, item: &ColorContrastItem) -> f64 {
        if item.is_large_font {
            self.large
        } else {
            self.normal
        }
    }
}

fn check_contrast(thresholds: Thresholds, cache: &DomCache, result: &mut RuleResult) {
    for item in cache.color_contrast().items() {
        let Some(element) = cache.element(item.node) else {
            continue;
        };
        let cache_id = Some(item.cache_id);
        if !element.is_visible_on_screen() {
            crate::support::add_hidden(result, element, cache_id);
            continue;
        }

        let threshold = thresholds.for_item(item);
        let ratio = format_ratio(item.contrast_ratio);
        let required = format_ratio(threshold);
        let meets = item.contrast_ratio >= threshold;

        let (outcome, message_id, args) = if item.has_background_image() {
            (TestResult::ManualCheck, "ELEMENT_MC_1", vec![ratio, required])
        } else if meets && item.opacity < 1.0 {
            let opacity = format!("{:.2}", item.opacity);
            (TestResult::ManualCheck, "ELEMENT_MC_2", vec![ratio, required, opacity])
        } else if meets && item.is_large_font {
            (TestResult::Pass, "ELEMENT_PASS_2", vec![ratio])
        } else if meets {
            (TestResult::Pass, "ELEMENT_PASS_1", vec![ratio])
        } else {
            (TestResult::Fail, "ELEMENT_FAIL_1", vec![ratio, required])
        };
        result.add_element_result(outcome, item.node, cache_id, message_id, args);
    }
}

/// COLOR_1: text has a contrast ratio of at least 4.5:1 (3:1 for large
/// text).
#[derive(Debug, Clone)]
pub struct ContrastMinimum {
    thresholds: Thresholds,
}

impl Default for ContrastMinimum {
    fn default() -> Self {
        Self::new()
    }
}

impl ContrastMinimum {
    /// Rule id.
    pub const ID: &'static str = "COLOR_1";

    /// Creates the rule with the WCAG AA thresholds.
    #[must_use]
    pub fn new() -> Self {
        Self {
            thresholds: Thresholds {
                normal: 4.5,
                large: 3.0,
            },
        }
    }

    /// Overrides the thresholds. Non-positive values keep the defaults.
    #[must_use]
    pub fn thresholds(mut self, normal: f64, large: f64) -> Self {
        self.thresholds = Thresholds {
            normal: positive_or(normal, self.thresholds.normal),
            large: positive_or(large, self.thresholds.large),
        };
        self
    }
}

impl Rule for ContrastMinimum {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn scope(&self) -> RuleScope {
        RuleScope::Element
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Color
    }

    fn wcag_primary_id(&self) -> &'static str {
        "1.4.3"
    }

    fn wcag_related_ids(&self) -> &'static [&'static str] {
        &["1.4.6"]
    }

    fn wcag_level(&self) -> WcagLevel {
        WcagLevel::AA
    }

    fn target_resources(&self) -> &'static [&'static str] {
        TARGETS
    }

    fn description(&self) -> &'static str {
        "Text has sufficient contrast with its background"
    }

    fn validate(&self, cache: &DomCache, result: &mut RuleResult) {
        check_contrast(self.thresholds, cache, result);
    }
}

/// COLOR_2: text has a contrast ratio of at least 7:1 (4.5:1 for large
/// text).
#[derive(Debug, Clone)]
pub struct ContrastEnhanced {
    thresholds: Thresholds,
}

impl Default for ContrastEnhanced {
    fn default() -> Self {
        Self::new()
    }
}

impl ContrastEnhanced {
    /// Rule id.
    pub const ID: &'static str = "COLOR_2";

    /// Creates the rule with the WCAG AAA thresholds.
    #[must_use]
    pub fn new() -> Self {
        Self {
            thresholds: Thresholds {
                normal: 7.0,
                large: 4.5,
            },
        }
    }

    /// Overrides the thresholds. Non-positive values keep the defaults.
    #[must_use]
    pub fn thresholds(mut self, normal: f64, large: f64) -> Self {
        self.thresholds = Thresholds {
            normal: positive_or(normal, self.thresholds.normal),
            large: positive_or(large, self.thresholds.large),
        };
        self
    }
}

impl Rule for ContrastEnhanced {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn scope(&self) -> RuleScope {
        RuleScope::Element
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Color
    }

    fn wcag_primary_id(&self) -> &'static str {
        "1.4.6"
    }

    fn wcag_related_ids(&self) -> &'static [&'static str] {
        &["1.4.3"]
    }

    fn wcag_level(&self) -> WcagLevel {
        WcagLevel::AAA
    }

    fn target_resources(&self) -> &'static [&'static str] {
        TARGETS
    }

    fn description(&self) -> &'static str {
        "Text has enhanced contrast with its background"
    }

    fn default_required(&self) -> bool {
        false
    }

    fn validate(&self, cache: &DomCache, result: &mut RuleResult) {
        check_contrast(self.thresholds, cache, result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::support::{message_ids, run};
    use a11y_eval_core::{ComputedStyle, ResultKind, SnapshotNode};

    fn page(style: ComputedStyle) -> SnapshotNode {
        SnapshotNode::document(vec![SnapshotNode::element("body").child(
            SnapshotNode::element("p")
                .style(style)
                .child(SnapshotNode::text("Hello")),
        )])
    }

    #[test]
    fn black_on_white_passes_both() {
        let doc = page(ComputedStyle::default());
        let (_, minimum) = run(&ContrastMinimum::new(), &doc);
        let (_, enhanced) = run(&ContrastEnhanced::new(), &doc);

        assert_eq!(message_ids(&minimum), ["ELEMENT_PASS_1"]);
        assert_eq!(minimum.results()[0].args(), ["21.0"]);
        assert_eq!(message_ids(&enhanced), ["ELEMENT_PASS_1"]);
    }

    #[test]
    fn low_contrast_is_violation_or_warning() {
        let doc = page(ComputedStyle::default().color("#aaaaaa"));
        let (_, minimum) = run(&ContrastMinimum::new(), &doc);
        let (_, enhanced) = run(&ContrastEnhanced::new(), &doc);

        assert_eq!(minimum.summary().violations, 1);
        assert_eq!(minimum.results()[0].args()[1], "4.5");
        assert_eq!(enhanced.summary().warnings, 1);
        assert_eq!(enhanced.results()[0].args()[1], "7.0");
    }

    #[test]
    fn background_image_needs_manual_check() {
        let doc = page(ComputedStyle::default().background_image("url(hero.png)"));
        let (_, result) = run(&ContrastMinimum::new(), &doc);
        assert_eq!(message_ids(&result), ["ELEMENT_MC_1"]);
        assert_eq!(result.results()[0].kind(), ResultKind::ManualCheck);
    }

    #[test]
    fn translucent_text_needs_manual_check() {
        let doc = page(ComputedStyle::default().opacity("0.5"));
        let (_, result) = run(&ContrastMinimum::new(), &doc);
        assert_eq!(message_ids(&result), ["ELEMENT_MC_2"]);
        assert_eq!(result.results()[0].args()[2], "0.50");
    }

    #[test]
    fn large_text_uses_lower_threshold() {
        // #777777 on white is 4.5:1: short of 7 but enough for large text.
        let doc = page(
            ComputedStyle::default()
                .color("#777777")
                .font_size("24px"),
        );
        let (_, result) = run(&ContrastEnhanced::new(), &doc);
        assert_eq!(message_ids(&result), ["ELEMENT_PASS_2"]);
    }

    #[test]
    fn text_off_screen_is_hidden() {
        let doc = page(ComputedStyle::default().visibility("hidden"));
        let (_, result) = run(&ContrastMinimum::new(), &doc);
        assert_eq!(result.summary().hidden, 1);
        assert_eq!(message_ids(&result), ["ELEMENT_HIDDEN_1"]);
    }

    #[test]
    fn thresholds_are_configurable() {
        let doc = page(ComputedStyle::default().color("#777777"));
        let (_, result) = run(&ContrastMinimum::new().thresholds(5.0, -1.0), &doc);
        assert_eq!(message_ids(&result), ["ELEMENT_FAIL_1"]);
    }
}
