//! List rules (LIST_1, LIST_2).

use crate::support::add_hidden;
use a11y_eval_core::cache::{ListContainer, ListKind};
use a11y_eval_core::{DomCache, DomElement, Rule, RuleCategory, RuleResult, RuleScope, TestResult};

fn visible_containers<'a>(
    cache: &'a DomCache,
    result: &mut RuleResult,
    kinds: &[ListKind],
) -> Vec<(&'a ListContainer, &'a DomElement)> {
    let mut visible = Vec::new();
    for container in cache.lists().containers().iter().filter(|c| kinds.contains(&c.kind)) {
        let Some(element) = cache.element(container.node) else {
            continue;
        };
        if element.is_visible_to_at() {
            visible.push((container, element));
        } else {
            add_hidden(result, element, Some(container.cache_id));
        }
    }
    visible
}

/// LIST_1: elements with `role="list"` own at least one list item.
#[derive(Debug, Clone, Copy, Default)]
pub struct AriaListOwnsItems;

impl AriaListOwnsItems {
    /// Rule id.
    pub const ID: &'static str = "LIST_1";
}

impl Rule for AriaListOwnsItems {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn scope(&self) -> RuleScope {
        RuleScope::Element
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Lists
    }

    fn wcag_primary_id(&self) -> &'static str {
        "1.3.1"
    }

    fn target_resources(&self) -> &'static [&'static str] {
        &["[role=\"list\"]", "[role=\"listitem\"]"]
    }

    fn description(&self) -> &'static str {
        "ARIA lists own list items"
    }

    fn validate(&self, cache: &DomCache, result: &mut RuleResult) {
        for (container, element) in visible_containers(cache, result, &[ListKind::Aria]) {
            if container.items.is_empty() {
                result.add_element_result(
                    TestResult::Fail,
                    element.id,
                    Some(container.cache_id),
                    "ELEMENT_FAIL_1",
                    vec![],
                );
            } else {
                result.add_element_result(
                    TestResult::Pass,
                    element.id,
                    Some(container.cache_id),
                    "ELEMENT_PASS_1",
                    vec![container.items.len().to_string()],
                );
            }
        }
    }
}

/// LIST_2: `ul` and `ol` elements contain only `li` children.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListChildrenAreItems;

impl ListChildrenAreItems {
    /// Rule id.
    pub const ID: &'static str = "LIST_2";
}

impl Rule for ListChildrenAreItems {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn scope(&self) -> RuleScope {
        RuleScope::Element
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Lists
    }

    fn wcag_primary_id(&self) -> &'static str {
        "1.3.1"
    }

    fn target_resources(&self) -> &'static [&'static str] {
        &["ul", "ol", "li"]
    }

    fn description(&self) -> &'static str {
        "Lists contain only list items"
    }

    fn validate(&self, cache: &DomCache, result: &mut RuleResult) {
        let kinds = [ListKind::Unordered, ListKind::Ordered];
        for (container, element) in visible_containers(cache, result, &kinds) {
            let mut offending: Vec<&str> = Vec::new();
            for child in cache.child_elements(element.id) {
                if child.tag_name != "li" && !offending.contains(&child.tag_name.as_str()) {
                    offending.push(&child.tag_name);
                }
            }
            let tag = element.tag_name.clone();
            if offending.is_empty() {
                result.add_element_result(
                    TestResult::Pass,
                    element.id,
                    Some(container.cache_id),
                    "ELEMENT_PASS_1",
                    vec![tag],
                );
            } else {
                result.add_element_result(
                    TestResult::Fail,
                    element.id,
                    Some(container.cache_id),
                    "ELEMENT_FAIL_1",
                    vec![tag, offending.join(", ")],
                );
            }
        }
    }
}
