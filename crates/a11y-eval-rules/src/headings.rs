//! Heading rules (HEADING_1 to HEADING_6).
//!
//! | Id | Checks |
//! |----|--------|
//! | HEADING_1 | the page has an `h1` visible to assistive technology |
//! | HEADING_2 | `h1` elements are inside a main landmark, when one exists |
//! | HEADING_3 | sibling headings have unique names |
//! | HEADING_4 | headings are properly nested within their landmark |
//! | HEADING_5 | headings are properly nested across the page |
//! | HEADING_6 | headings have text content |
//!
//! A heading is properly nested when it is at most one level deeper than
//! its logical parent and that parent is itself properly nested, so one
//! skipped level fails every heading beneath it.

use crate::support::add_hidden;
use a11y_eval_core::cache::{group_duplicates, HeadingElement, NestingMemo, NestingScope};
use a11y_eval_core::{
    DomCache, DomElement, NodeId, Rule, RuleCategory, RuleResult, RuleScope, TestResult,
    WcagLevel,
};

/// Visible headings paired with their element, hidden ones recorded as such.
fn visible_headings<'a>(
    cache: &'a DomCache,
    result: &mut RuleResult,
    filter: impl Fn(&HeadingElement) -> bool,
) -> Vec<(&'a HeadingElement, &'a DomElement)> {
    let mut visible = Vec::new();
    for heading in cache.headings().headings().iter().filter(|h| filter(h)) {
        let Some(element) = cache.element(heading.node) else {
            continue;
        };
        if heading.is_visible_to_at {
            visible.push((heading, element));
        } else {
            add_hidden(result, element, Some(heading.cache_id));
        }
    }
    visible
}

/// HEADING_1: the page contains at least one `h1` visible to assistive
/// technology.
#[derive(Debug, Clone, Copy, Default)]
pub struct PageHasH1;

impl PageHasH1 {
    /// Rule id.
    pub const ID: &'static str = "HEADING_1";
}

impl Rule for PageHasH1 {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn scope(&self) -> RuleScope {
        RuleScope::Page
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Headings
    }

    fn wcag_primary_id(&self) -> &'static str {
        "1.3.1"
    }

    fn wcag_related_ids(&self) -> &'static [&'static str] {
        &["2.4.6"]
    }

    fn target_resources(&self) -> &'static [&'static str] {
        &["h1", "[role=\"heading\"][aria-level=\"1\"]"]
    }

    fn description(&self) -> &'static str {
        "Page has a level one heading"
    }

    fn validate(&self, cache: &DomCache, result: &mut RuleResult) {
        let visible = visible_headings(cache, result, |h| h.level == 1);
        for (heading, element) in &visible {
            result.add_element_result(
                TestResult::Pass,
                element.id,
                Some(heading.cache_id),
                "ELEMENT_PASS_1",
                vec![],
            );
        }
        if visible.is_empty() {
            result.add_page_result(TestResult::Fail, "PAGE_FAIL_1", vec![]);
        } else {
            result.add_page_result(
                TestResult::Pass,
                "PAGE_PASS_1",
                vec![visible.len().to_string()],
            );
        }
    }
}

/// HEADING_2: when the page has a main landmark, its `h1` elements are
/// inside one.
#[derive(Debug, Clone, Copy, Default)]
pub struct H1InMain;

impl H1InMain {
    /// Rule id.
    pub const ID: &'static str = "HEADING_2";
}

impl Rule for H1InMain {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn scope(&self) -> RuleScope {
        RuleScope::Element
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Headings
    }

    fn wcag_primary_id(&self) -> &'static str {
        "2.4.6"
    }

    fn wcag_related_ids(&self) -> &'static [&'static str] {
        &["1.3.1"]
    }

    fn wcag_level(&self) -> WcagLevel {
        WcagLevel::AA
    }

    fn target_resources(&self) -> &'static [&'static str] {
        &["h1", "main", "[role=\"main\"]"]
    }

    fn description(&self) -> &'static str {
        "Level one headings are inside the main landmark"
    }

    fn default_required(&self) -> bool {
        false
    }

    fn validate(&self, cache: &DomCache, result: &mut RuleResult) {
        let has_main = cache
            .headings()
            .landmarks_with_role("main")
            .any(|l| cache.element(l.node).is_some_and(DomElement::is_visible_to_at));
        if !has_main {
            return;
        }

        for (heading, element) in visible_headings(cache, result, |h| h.level == 1) {
            let in_main = cache.ancestors(element.id).any(|a| a.has_role("main"));
            let (outcome, message_id) = if in_main {
                (TestResult::Pass, "ELEMENT_PASS_1")
            } else {
                (TestResult::Fail, "ELEMENT_FAIL_1")
            };
            result.add_element_result(outcome, element.id, Some(heading.cache_id), message_id, vec![]);
        }
    }
}

/// HEADING_3: headings of the same level under the same parent heading have
/// distinct names.
#[derive(Debug, Clone, Copy, Default)]
pub struct SiblingHeadingsUnique;

impl SiblingHeadingsUnique {
    /// Rule id.
    pub const ID: &'static str = "HEADING_3";
}

impl Rule for SiblingHeadingsUnique {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn scope(&self) -> RuleScope {
        RuleScope::Element
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Headings
    }

    fn wcag_primary_id(&self) -> &'static str {
        "2.4.6"
    }

    fn wcag_related_ids(&self) -> &'static [&'static str] {
        &["1.3.1"]
    }

    fn wcag_level(&self) -> WcagLevel {
        WcagLevel::AA
    }

    fn target_resources(&self) -> &'static [&'static str] {
        &["h1", "h2", "h3", "h4", "h5", "h6", "[role=\"heading\"]"]
    }

    fn description(&self) -> &'static str {
        "Sibling headings have unique names"
    }

    fn default_required(&self) -> bool {
        false
    }

    fn validate(&self, cache: &DomCache, result: &mut RuleResult) {
        let named: Vec<_> = visible_headings(cache, result, |_| true)
            .into_iter()
            .filter(|(_, e)| !e.accessible_name.is_empty())
            .collect();
        let groups = group_duplicates(
            cache,
            named.iter().map(|(h, e)| {
                let key: (Option<NodeId>, u8, String) = (
                    h.nesting_parent_heading,
                    h.level,
                    e.accessible_name.for_comparison.clone(),
                );
                (key, h.node)
            }),
        );

        for (heading, element) in named {
            let duplicate = groups
                .iter()
                .any(|g| g.is_duplicate && g.contains(heading.node));
            let (outcome, message_id) = if duplicate {
                (TestResult::Fail, "ELEMENT_FAIL_1")
            } else {
                (TestResult::Pass, "ELEMENT_PASS_1")
            };
            result.add_element_result(
                outcome,
                element.id,
                Some(heading.cache_id),
                message_id,
                vec![element.accessible_name.name.clone(), heading.level.to_string()],
            );
        }
    }
}

fn check_nesting(scope: NestingScope, cache: &DomCache, result: &mut RuleResult) {
    let headings = cache.headings();
    let mut memo = NestingMemo::new(headings, scope);
    for (heading, element) in visible_headings(cache, result, |_| true) {
        let level = heading.level.to_string();
        let (outcome, message_id, args) = if memo.is_properly_nested(heading.node) {
            (TestResult::Pass, "ELEMENT_PASS_1", vec![level])
        } else {
            match memo.parent(heading.node) {
                Some(parent) if heading.level > parent.level.saturating_add(1) => (
                    TestResult::Fail,
                    "ELEMENT_FAIL_1",
                    vec![level, parent.level.to_string()],
                ),
                _ => (TestResult::Fail, "ELEMENT_FAIL_2", vec![level]),
            }
        };
        result.add_element_result(outcome, element.id, Some(heading.cache_id), message_id, args);
    }
}

/// HEADING_4: headings are properly nested within their landmark.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadingsNestedInLandmark;

impl HeadingsNestedInLandmark {
    /// Rule id.
    pub const ID: &'static str = "HEADING_4";
}

impl Rule for HeadingsNestedInLandmark {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn scope(&self) -> RuleScope {
        RuleScope::Element
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Headings
    }

    fn wcag_primary_id(&self) -> &'static str {
        "1.3.1"
    }

    fn target_resources(&self) -> &'static [&'static str] {
        &["h1", "h2", "h3", "h4", "h5", "h6", "[role=\"heading\"]"]
    }

    fn description(&self) -> &'static str {
        "Headings are properly nested within each landmark"
    }

    fn default_required(&self) -> bool {
        false
    }

    fn validate(&self, cache: &DomCache, result: &mut RuleResult) {
        check_nesting(NestingScope::Landmark, cache, result);
    }
}

/// HEADING_5: headings are properly nested across the page.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadingsNested;

impl HeadingsNested {
    /// Rule id.
    pub const ID: &'static str = "HEADING_5";
}

impl Rule for HeadingsNested {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn scope(&self) -> RuleScope {
        RuleScope::Element
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Headings
    }

    fn wcag_primary_id(&self) -> &'static str {
        "1.3.1"
    }

    fn target_resources(&self) -> &'static [&'static str] {
        &["h1", "h2", "h3", "h4", "h5", "h6", "[role=\"heading\"]"]
    }

    fn description(&self) -> &'static str {
        "Headings are properly nested"
    }

    fn default_required(&self) -> bool {
        false
    }

    fn validate(&self, cache: &DomCache, result: &mut RuleResult) {
        check_nesting(NestingScope::Global, cache, result);
    }
}

/// HEADING_6: headings have text content.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadingHasName;

impl HeadingHasName {
    /// Rule id.
    pub const ID: &'static str = "HEADING_6";
}

impl Rule for HeadingHasName {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn scope(&self) -> RuleScope {
        RuleScope::Element
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Headings
    }

    fn wcag_primary_id(&self) -> &'static str {
        "2.4.6"
    }

    fn wcag_level(&self) -> WcagLevel {
        WcagLevel::AA
    }

    fn target_resources(&self) -> &'static [&'static str] {
        &["h1", "h2", "h3", "h4", "h5", "h6", "[role=\"heading\"]"]
    }

    fn description(&self) -> &'static str {
        "Headings have text content"
    }

    fn validate(&self, cache: &DomCache, result: &mut RuleResult) {
        for (heading, element) in visible_headings(cache, result, |_| true) {
            let level = heading.level.to_string();
            if element.accessible_name.is_empty() {
                result.add_element_result(
                    TestResult::Fail,
                    element.id,
                    Some(heading.cache_id),
                    "ELEMENT_FAIL_1",
                    vec![level],
                );
            } else {
                result.add_element_result(
                    TestResult::Pass,
                    element.id,
                    Some(heading.cache_id),
                    "ELEMENT_PASS_1",
                    vec![element.accessible_name.name.clone(), level],
                );
            }
        }
    }
}
