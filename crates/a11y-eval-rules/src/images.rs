//! Image rules (IMAGE_1, IMAGE_2).

use crate::support::add_hidden;
use a11y_eval_core::cache::ImageElement;
use a11y_eval_core::{DomCache, DomElement, Rule, RuleCategory, RuleResult, RuleScope, TestResult};

const TARGETS: &[&str] = &["img", "area", "input[type=\"image\"]", "[role=\"img\"]"];

fn visible_images<'a>(
    cache: &'a DomCache,
    result: &mut RuleResult,
) -> Vec<(&'a ImageElement, &'a DomElement)> {
    let mut visible = Vec::new();
    for image in cache.images().images() {
        let Some(element) = cache.element(image.node) else {
            continue;
        };
        if element.is_visible_to_at() {
            visible.push((image, element));
        } else {
            add_hidden(result, element, Some(image.cache_id));
        }
    }
    visible
}

/// IMAGE_1: images have a text alternative or are marked decorative.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageHasAlt;

impl ImageHasAlt {
    /// Rule id.
    pub const ID: &'static str = "IMAGE_1";
}

impl Rule for ImageHasAlt {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn scope(&self) -> RuleScope {
        RuleScope::Element
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Images
    }

    fn wcag_primary_id(&self) -> &'static str {
        "1.1.1"
    }

    fn target_resources(&self) -> &'static [&'static str] {
        TARGETS
    }

    fn description(&self) -> &'static str {
        "Images have alternative text or are marked decorative"
    }

    fn validate(&self, cache: &DomCache, result: &mut RuleResult) {
        for (image, element) in visible_images(cache, result) {
            let tag = element.tag_name.clone();
            let (outcome, message_id, args) = if image.is_decorative {
                (TestResult::Pass, "ELEMENT_PASS_2", vec![tag])
            } else if element.accessible_name.is_empty() {
                (TestResult::Fail, "ELEMENT_FAIL_1", vec![tag])
            } else {
                (
                    TestResult::Pass,
                    "ELEMENT_PASS_1",
                    vec![tag, element.accessible_name.name.clone()],
                )
            };
            result.add_element_result(outcome, element.id, Some(image.cache_id), message_id, args);
        }
    }
}

/// IMAGE_2: long text alternatives need review.
///
/// # Configuration
///
/// - `max_length`: longest alternative, in characters, that passes
///   without review (default 100)
#[derive(Debug, Clone, Copy)]
pub struct AltTextLength {
    max_length: usize,
}

impl Default for AltTextLength {
    fn default() -> Self {
        Self::new()
    }
}

impl AltTextLength {
    /// Rule id.
    pub const ID: &'static str = "IMAGE_2";

    const DEFAULT_MAX_LENGTH: usize = 100;

    /// Creates the rule with a 100 character limit.
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_length: Self::DEFAULT_MAX_LENGTH,
        }
    }

    /// Sets the character limit. Zero keeps the default.
    #[must_use]
    pub fn max_length(mut self, max_length: usize) -> Self {
        self.max_length = if max_length == 0 {
            Self::DEFAULT_MAX_LENGTH
        } else {
            max_length
        };
        self
    }
}

impl Rule for AltTextLength {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn scope(&self) -> RuleScope {
        RuleScope::Element
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Images
    }

    fn wcag_primary_id(&self) -> &'static str {
        "1.1.1"
    }

    fn target_resources(&self) -> &'static [&'static str] {
        TARGETS
    }

    fn description(&self) -> &'static str {
        "Long alternative text is reviewed"
    }

    fn default_required(&self) -> bool {
        false
    }

    fn validate(&self, cache: &DomCache, result: &mut RuleResult) {
        for (image, element) in visible_images(cache, result) {
            let name = &element.accessible_name.name;
            if image.is_decorative || name.is_empty() {
                continue;
            }
            let length = name.chars().count();
            let tag = element.tag_name.clone();
            if length > self.max_length {
                result.add_element_result(
                    TestResult::ManualCheck,
                    element.id,
                    Some(image.cache_id),
                    "ELEMENT_MC_1",
                    vec![tag, length.to_string(), self.max_length.to_string()],
                );
            } else {
                result.add_element_result(
                    TestResult::Pass,
                    element.id,
                    Some(image.cache_id),
                    "ELEMENT_PASS_1",
                    vec![tag, length.to_string()],
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::support::{message_ids, run};
    use a11y_eval_core::SnapshotNode;

    fn img(alt: Option<&str>) -> SnapshotNode {
        let node = SnapshotNode::element("img").attr("src", "photo.jpg");
        match alt {
            Some(alt) => node.attr("alt", alt),
            None => node,
        }
    }

    fn body(children: Vec<SnapshotNode>) -> SnapshotNode {
        SnapshotNode::document(vec![SnapshotNode::element("body").children(children)])
    }

    #[test]
    fn missing_alt_fails_and_empty_alt_is_decorative() {
        let doc = body(vec![img(Some("A cat")), img(Some("")), img(None)]);
        let (_, result) = run(&ImageHasAlt, &doc);
        assert_eq!(
            message_ids(&result),
            ["ELEMENT_PASS_1", "ELEMENT_PASS_2", "ELEMENT_FAIL_1"]
        );
        assert_eq!(result.results()[0].args(), ["img", "A cat"]);
        assert_eq!(result.summary().violations, 1);
    }

    #[test]
    fn long_alt_needs_review() {
        let long = "x".repeat(101);
        let doc = body(vec![img(Some("Short")), img(Some(&long)), img(Some(""))]);
        let (_, result) = run(&AltTextLength::new(), &doc);
        assert_eq!(message_ids(&result), ["ELEMENT_PASS_1", "ELEMENT_MC_1"]);
        assert_eq!(result.results()[1].args(), ["img", "101", "100"]);

        let (_, result) = run(&AltTextLength::new().max_length(3), &doc);
        assert_eq!(result.summary().manual_checks, 2);
    }
}
