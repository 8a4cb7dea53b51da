//! Link rules (LINK_1 to LINK_3).

use crate::support::{add_hidden, positive_or};
use a11y_eval_core::cache::LinkElement;
use a11y_eval_core::{
    DomCache, DomElement, Rule, RuleCategory, RuleResult, RuleScope, TestResult, WcagLevel,
};

const TARGETS: &[&str] = &["a[href]", "area[href]", "[role=\"link\"]"];

/// Links visible to assistive technology, hidden ones recorded as such.
fn visible_links<'a>(
    cache: &'a DomCache,
    result: &mut RuleResult,
) -> Vec<(&'a LinkElement, &'a DomElement)> {
    let mut visible = Vec::new();
    for link in cache.links().links() {
        let Some(element) = cache.element(link.node) else {
            continue;
        };
        if element.is_visible_to_at() {
            visible.push((link, element));
        } else {
            add_hidden(result, element, Some(link.cache_id));
        }
    }
    visible
}

/// LINK_1: links have an accessible name.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinkHasName;

impl LinkHasName {
    /// Rule id.
    pub const ID: &'static str = "LINK_1";
}

impl Rule for LinkHasName {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn scope(&self) -> RuleScope {
        RuleScope::Element
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Links
    }

    fn wcag_primary_id(&self) -> &'static str {
        "2.4.4"
    }

    fn wcag_related_ids(&self) -> &'static [&'static str] {
        &["4.1.2"]
    }

    fn target_resources(&self) -> &'static [&'static str] {
        TARGETS
    }

    fn description(&self) -> &'static str {
        "Links have accessible names"
    }

    fn validate(&self, cache: &DomCache, result: &mut RuleResult) {
        for (link, element) in visible_links(cache, result) {
            let name = &element.accessible_name;
            if name.is_empty() {
                result.add_element_result(
                    TestResult::Fail,
                    element.id,
                    Some(link.cache_id),
                    "ELEMENT_FAIL_1",
                    vec![link.href.clone()],
                );
            } else {
                result.add_element_result(
                    TestResult::Pass,
                    element.id,
                    Some(link.cache_id),
                    "ELEMENT_PASS_1",
                    vec![name.name.clone()],
                );
            }
        }
    }
}

/// LINK_2: links that share a name point to the same resource.
///
/// Links that share a destination but not a name are a manual check.
/// Links with both a unique name and a unique destination are not targeted.
#[derive(Debug, Clone, Copy, Default)]
pub struct SameNameSameHref;

impl SameNameSameHref {
    /// Rule id.
    pub const ID: &'static str = "LINK_2";
}

impl Rule for SameNameSameHref {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn scope(&self) -> RuleScope {
        RuleScope::Element
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Links
    }

    fn wcag_primary_id(&self) -> &'static str {
        "2.4.4"
    }

    fn wcag_related_ids(&self) -> &'static [&'static str] {
        &["2.4.9"]
    }

    fn target_resources(&self) -> &'static [&'static str] {
        TARGETS
    }

    fn description(&self) -> &'static str {
        "Links with the same name point to the same resource"
    }

    fn default_required(&self) -> bool {
        false
    }

    fn validate(&self, cache: &DomCache, result: &mut RuleResult) {
        let links = cache.links();
        for (link, element) in visible_links(cache, result) {
            let Some(group) = links
                .name_group_of(link.node)
                .filter(|g| g.members.len() > 1)
            else {
                if let Some(group) = links
                    .href_group_of(link.node)
                    .filter(|g| g.members.len() > 1 && !g.same_name)
                {
                    result.add_element_result(
                        TestResult::ManualCheck,
                        element.id,
                        Some(link.cache_id),
                        "ELEMENT_MC_1",
                        vec![group.href.clone(), group.members.len().to_string()],
                    );
                }
                continue;
            };
            let outcome = if group.same_href {
                (TestResult::Pass, "ELEMENT_PASS_1")
            } else {
                (TestResult::Fail, "ELEMENT_FAIL_1")
            };
            result.add_element_result(
                outcome.0,
                element.id,
                Some(link.cache_id),
                outcome.1,
                vec![
                    element.accessible_name.name.clone(),
                    group.members.len().to_string(),
                ],
            );
        }
    }
}

/// LINK_3: link targets are large enough to activate.
///
/// # Configuration
///
/// - `min_size`: minimum width and height in CSS pixels (default 12)
#[derive(Debug, Clone, Copy)]
pub struct TargetSize {
    min_size: f64,
}

impl Default for TargetSize {
    fn default() -> Self {
        Self::new()
    }
}

impl TargetSize {
    /// Rule id.
    pub const ID: &'static str = "LINK_3";

    const DEFAULT_MIN_SIZE: f64 = 12.0;

    /// Creates the rule with a 12 pixel minimum.
    #[must_use]
    pub fn new() -> Self {
        Self {
            min_size: Self::DEFAULT_MIN_SIZE,
        }
    }

    /// Sets the minimum width and height. Non-positive values keep the
    /// default.
    #[must_use]
    pub fn min_size(mut self, min_size: f64) -> Self {
        self.min_size = positive_or(min_size, Self::DEFAULT_MIN_SIZE);
        self
    }
}

impl Rule for TargetSize {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn scope(&self) -> RuleScope {
        RuleScope::Element
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Links
    }

    fn wcag_primary_id(&self) -> &'static str {
        "2.5.8"
    }

    fn wcag_related_ids(&self) -> &'static [&'static str] {
        &["2.5.5"]
    }

    fn wcag_level(&self) -> WcagLevel {
        WcagLevel::AA
    }

    fn target_resources(&self) -> &'static [&'static str] {
        TARGETS
    }

    fn description(&self) -> &'static str {
        "Link targets are at least the minimum size"
    }

    fn default_required(&self) -> bool {
        false
    }

    fn validate(&self, cache: &DomCache, result: &mut RuleResult) {
        let min = self.min_size.to_string();
        for (link, element) in visible_links(cache, result) {
            let cache_id = Some(link.cache_id);
            let Some(rect) = element.rect else {
                result.add_element_result(
                    TestResult::ManualCheck,
                    element.id,
                    cache_id,
                    "ELEMENT_MC_1",
                    vec![min.clone()],
                );
                continue;
            };
            let size = vec![rect.width.to_string(), rect.height.to_string()];
            if rect.width >= self.min_size && rect.height >= self.min_size {
                result.add_element_result(TestResult::Pass, element.id, cache_id, "ELEMENT_PASS_1", size);
            } else {
                let mut args = size;
                args.push(min.clone());
                result.add_element_result(TestResult::Fail, element.id, cache_id, "ELEMENT_FAIL_1", args);
            }
        }
    }
}
