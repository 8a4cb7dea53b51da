//! Landmark rules (LANDMARK_1 to LANDMARK_3).

use crate::support::add_hidden;
use a11y_eval_core::cache::{group_duplicates, LandmarkElement};
use a11y_eval_core::{
    DomCache, DomElement, Rule, RuleCategory, RuleResult, RuleScope, TestResult,
};
use std::collections::HashMap;

/// LANDMARK_1: the page has a `main` landmark.
#[derive(Debug, Clone, Copy, Default)]
pub struct PageHasMain;

impl PageHasMain {
    /// Rule id.
    pub const ID: &'static str = "LANDMARK_1";
}

impl Rule for PageHasMain {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn scope(&self) -> RuleScope {
        RuleScope::Page
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Landmarks
    }

    fn wcag_primary_id(&self) -> &'static str {
        "1.3.1"
    }

    fn wcag_related_ids(&self) -> &'static [&'static str] {
        &["2.4.1"]
    }

    fn target_resources(&self) -> &'static [&'static str] {
        &["main", "[role=\"main\"]"]
    }

    fn description(&self) -> &'static str {
        "Page has a main landmark"
    }

    fn validate(&self, cache: &DomCache, result: &mut RuleResult) {
        let mut count = 0usize;
        for landmark in cache.headings().landmarks_with_role("main") {
            let Some(element) = cache.element(landmark.node) else {
                continue;
            };
            if element.is_visible_to_at() {
                count += 1;
                result.add_element_result(
                    TestResult::Pass,
                    element.id,
                    Some(landmark.cache_id),
                    "ELEMENT_PASS_1",
                    vec![element.tag_name.clone()],
                );
            } else {
                add_hidden(result, element, Some(landmark.cache_id));
            }
        }
        if count == 0 {
            result.add_page_result(TestResult::Fail, "PAGE_FAIL_1", vec![]);
        } else {
            result.add_page_result(TestResult::Pass, "PAGE_PASS_1", vec![count.to_string()]);
        }
    }
}

/// LANDMARK_2: rendered text is contained in a landmark.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContentInLandmark;

impl ContentInLandmark {
    /// Rule id.
    pub const ID: &'static str = "LANDMARK_2";

    fn landmark_of<'a>(cache: &'a DomCache, element: &'a DomElement) -> Option<&'a DomElement> {
        if element.is_landmark() {
            return Some(element);
        }
        element.parent_landmark.and_then(|l| cache.element(l))
    }
}

impl Rule for ContentInLandmark {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn scope(&self) -> RuleScope {
        RuleScope::Element
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Landmarks
    }

    fn wcag_primary_id(&self) -> &'static str {
        "1.3.1"
    }

    fn wcag_related_ids(&self) -> &'static [&'static str] {
        &["2.4.1"]
    }

    fn target_resources(&self) -> &'static [&'static str] {
        &["text"]
    }

    fn description(&self) -> &'static str {
        "Rendered content is contained in landmarks"
    }

    fn validate(&self, cache: &DomCache, result: &mut RuleResult) {
        for element in cache.elements().filter(|e| e.has_text) {
            if !element.is_visible_to_at() {
                add_hidden(result, element, None);
                continue;
            }
            match Self::landmark_of(cache, element) {
                Some(landmark) => result.add_element_result(
                    TestResult::Pass,
                    element.id,
                    None,
                    "ELEMENT_PASS_1",
                    vec![
                        element.tag_name.clone(),
                        landmark.role.clone().unwrap_or_default(),
                    ],
                ),
                None => result.add_element_result(
                    TestResult::Fail,
                    element.id,
                    None,
                    "ELEMENT_FAIL_1",
                    vec![element.tag_name.clone()],
                ),
            }
        }
    }
}

/// LANDMARK_3: landmarks that share a role have unique names.
#[derive(Debug, Clone, Copy, Default)]
pub struct LandmarkNamesUnique;

impl LandmarkNamesUnique {
    /// Rule id.
    pub const ID: &'static str = "LANDMARK_3";
}

impl Rule for LandmarkNamesUnique {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn scope(&self) -> RuleScope {
        RuleScope::Element
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Landmarks
    }

    fn wcag_primary_id(&self) -> &'static str {
        "1.3.1"
    }

    fn wcag_related_ids(&self) -> &'static [&'static str] {
        &["2.4.1", "2.4.6"]
    }

    fn target_resources(&self) -> &'static [&'static str] {
        &["aside", "footer", "form", "header", "main", "nav", "section", "[role]"]
    }

    fn description(&self) -> &'static str {
        "Landmarks sharing a role have unique names"
    }

    fn validate(&self, cache: &DomCache, result: &mut RuleResult) {
        let landmarks = cache.headings().landmarks();
        let mut role_counts: HashMap<&str, usize> = HashMap::new();
        for landmark in landmarks {
            *role_counts.entry(landmark.role.as_str()).or_default() += 1;
        }

        let mut targets: Vec<(&LandmarkElement, &DomElement)> = Vec::new();
        for landmark in landmarks {
            if role_counts.get(landmark.role.as_str()).copied().unwrap_or(0) < 2 {
                continue;
            }
            let Some(element) = cache.element(landmark.node) else {
                continue;
            };
            if element.is_visible_to_at() {
                targets.push((landmark, element));
            } else {
                add_hidden(result, element, Some(landmark.cache_id));
            }
        }

        let groups = group_duplicates(
            cache,
            targets
                .iter()
                .filter(|(_, e)| !e.accessible_name.is_empty())
                .map(|(l, e)| ((l.role.clone(), e.accessible_name.for_comparison.clone()), l.node)),
        );

        for (landmark, element) in targets {
            let name = &element.accessible_name;
            let role = landmark.role.clone();
            let (outcome, message_id, args) = if name.is_empty() {
                (TestResult::Fail, "ELEMENT_FAIL_1", vec![role])
            } else if groups
                .iter()
                .any(|g| g.is_duplicate && g.contains(landmark.node))
            {
                (TestResult::Fail, "ELEMENT_FAIL_2", vec![role, name.name.clone()])
            } else {
                (TestResult::Pass, "ELEMENT_PASS_1", vec![role, name.name.clone()])
            };
            result.add_element_result(outcome, element.id, Some(landmark.cache_id), message_id, args);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::support::{message_ids, run};
    use a11y_eval_core::SnapshotNode;

    fn text(tag: &str, data: &str) -> SnapshotNode {
        SnapshotNode::element(tag).child(SnapshotNode::text(data))
    }

    fn body(children: Vec<SnapshotNode>) -> SnapshotNode {
        SnapshotNode::document(vec![SnapshotNode::element("body").children(children)])
    }

    #[test]
    fn missing_main_fails_page() {
        let (_, result) = run(&PageHasMain, &body(vec![text("p", "Hi")]));
        assert_eq!(message_ids(&result), ["PAGE_FAIL_1"]);
        assert_eq!(result.summary().violations, 1);

        let (_, result) = run(&PageHasMain, &body(vec![SnapshotNode::element("main")]));
        assert_eq!(message_ids(&result), ["ELEMENT_PASS_1", "PAGE_PASS_1"]);
    }

    #[test]
    fn text_outside_landmarks_fails() {
        let doc = body(vec![
            text("p", "Loose"),
            SnapshotNode::element("main").child(text("p", "Inside")),
            text("nav", "Menu"),
        ]);
        let (_, result) = run(&ContentInLandmark, &doc);
        assert_eq!(
            message_ids(&result),
            ["ELEMENT_FAIL_1", "ELEMENT_PASS_1", "ELEMENT_PASS_1"]
        );
        assert_eq!(result.results()[1].args(), ["p", "main"]);
        assert_eq!(result.results()[2].args(), ["nav", "navigation"]);
    }

    #[test]
    fn shared_roles_need_distinct_names() {
        let doc = body(vec![
            SnapshotNode::element("nav").attr("aria-label", "Primary"),
            SnapshotNode::element("nav").attr("aria-label", "primary"),
            SnapshotNode::element("nav"),
            SnapshotNode::element("main"),
        ]);
        let (_, result) = run(&LandmarkNamesUnique, &doc);
        assert_eq!(
            message_ids(&result),
            ["ELEMENT_FAIL_2", "ELEMENT_FAIL_2", "ELEMENT_FAIL_1"]
        );
    }

    #[test]
    fn single_landmark_of_a_role_is_not_targeted() {
        let doc = body(vec![
            SnapshotNode::element("nav").attr("aria-label", "Primary"),
            SnapshotNode::element("nav").attr("aria-label", "Footer"),
            SnapshotNode::element("main"),
        ]);
        let (_, result) = run(&LandmarkNamesUnique, &doc);
        assert_eq!(message_ids(&result), ["ELEMENT_PASS_1", "ELEMENT_PASS_1"]);
    }
}
