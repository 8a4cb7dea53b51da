//! Data table rules (TABLE_1 to TABLE_3).
//!
//! Only tables classified as data or complex are targeted; layout tables
//! are ignored.

use crate::support::add_hidden;
use a11y_eval_core::cache::{group_duplicates, TableElement};
use a11y_eval_core::{DomCache, DomElement, Rule, RuleCategory, RuleResult, RuleScope, TestResult};

fn visible_data_tables<'a>(
    cache: &'a DomCache,
    result: &mut RuleResult,
) -> Vec<(&'a TableElement, &'a DomElement)> {
    let mut visible = Vec::new();
    for table in cache.tables().data_tables() {
        let Some(element) = cache.element(table.node) else {
            continue;
        };
        if element.is_visible_to_at() {
            visible.push((table, element));
        } else {
            add_hidden(result, element, Some(table.cache_id));
        }
    }
    visible
}

fn header_names(cache: &DomCache, headers: &[a11y_eval_core::NodeId]) -> String {
    headers
        .iter()
        .filter_map(|h| cache.element(*h))
        .map(|h| {
            if h.accessible_name.is_empty() {
                cache.text_content(h.id)
            } else {
                h.accessible_name.name.clone()
            }
        })
        .filter(|n| !n.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

/// TABLE_1: data cells of data tables have header cells.
///
/// Empty cells are not targeted. A cell spanning several grid slots is
/// evaluated once.
#[derive(Debug, Clone, Copy, Default)]
pub struct DataCellsHaveHeaders;

impl DataCellsHaveHeaders {
    /// Rule id.
    pub const ID: &'static str = "TABLE_1";
}

impl Rule for DataCellsHaveHeaders {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn scope(&self) -> RuleScope {
        RuleScope::Element
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Tables
    }

    fn wcag_primary_id(&self) -> &'static str {
        "1.3.1"
    }

    fn target_resources(&self) -> &'static [&'static str] {
        &["td", "[role=\"cell\"]", "[role=\"gridcell\"]"]
    }

    fn description(&self) -> &'static str {
        "Data cells have header cells"
    }

    fn validate(&self, cache: &DomCache, result: &mut RuleResult) {
        for table in cache.tables().data_tables() {
            for cell in table.unique_cells().into_iter().filter(|c| !c.is_header) {
                let Some(element) = cache.element(cell.node) else {
                    continue;
                };
                if cache.full_text_content(cell.node).is_empty() {
                    continue;
                }
                if !element.is_visible_to_at() {
                    add_hidden(result, element, None);
                    continue;
                }
                if cell.headers.is_empty() {
                    result.add_element_result(
                        TestResult::Fail,
                        element.id,
                        None,
                        "ELEMENT_FAIL_1",
                        vec![(cell.row + 1).to_string(), (cell.column + 1).to_string()],
                    );
                } else {
                    result.add_element_result(
                        TestResult::Pass,
                        element.id,
                        None,
                        "ELEMENT_PASS_1",
                        vec![header_names(cache, &cell.headers)],
                    );
                }
            }
        }
    }
}

/// TABLE_2: data tables have an accessible name.
#[derive(Debug, Clone, Copy, Default)]
pub struct DataTableHasName;

impl DataTableHasName {
    /// Rule id.
    pub const ID: &'static str = "TABLE_2";
}

impl Rule for DataTableHasName {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn scope(&self) -> RuleScope {
        RuleScope::Element
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Tables
    }

    fn wcag_primary_id(&self) -> &'static str {
        "1.3.1"
    }

    fn wcag_related_ids(&self) -> &'static [&'static str] {
        &["2.4.6"]
    }

    fn target_resources(&self) -> &'static [&'static str] {
        &["table", "caption", "[role=\"table\"]", "[role=\"grid\"]"]
    }

    fn description(&self) -> &'static str {
        "Data tables have names"
    }

    fn default_required(&self) -> bool {
        false
    }

    fn validate(&self, cache: &DomCache, result: &mut RuleResult) {
        for (table, element) in visible_data_tables(cache, result) {
            let name = &element.accessible_name;
            if name.is_empty() {
                result.add_element_result(
                    TestResult::Fail,
                    element.id,
                    Some(table.cache_id),
                    "ELEMENT_FAIL_1",
                    vec![],
                );
            } else {
                result.add_element_result(
                    TestResult::Pass,
                    element.id,
                    Some(table.cache_id),
                    "ELEMENT_PASS_1",
                    vec![name.name.clone()],
                );
            }
        }
    }
}

/// TABLE_3: names of data tables are unique.
#[derive(Debug, Clone, Copy, Default)]
pub struct DataTableNamesUnique;

impl DataTableNamesUnique {
    /// Rule id.
    pub const ID: &'static str = "TABLE_3";
}

impl Rule for DataTableNamesUnique {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn scope(&self) -> RuleScope {
        RuleScope::Element
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Tables
    }

    fn wcag_primary_id(&self) -> &'static str {
        "1.3.1"
    }

    fn wcag_related_ids(&self) -> &'static [&'static str] {
        &["2.4.6"]
    }

    fn target_resources(&self) -> &'static [&'static str] {
        &["table", "caption", "[role=\"table\"]", "[role=\"grid\"]"]
    }

    fn description(&self) -> &'static str {
        "Data table names are unique"
    }

    fn default_required(&self) -> bool {
        false
    }

    fn validate(&self, cache: &DomCache, result: &mut RuleResult) {
        let named: Vec<_> = visible_data_tables(cache, result)
            .into_iter()
            .filter(|(_, e)| !e.accessible_name.is_empty())
            .collect();
        let groups = group_duplicates(
            cache,
            named
                .iter()
                .map(|(t, e)| (e.accessible_name.for_comparison.clone(), t.node)),
        );
        for (table, element) in named {
            let duplicate = groups
                .iter()
                .any(|g| g.is_duplicate && g.contains(table.node));
            let (outcome, message_id) = if duplicate {
                (TestResult::Fail, "ELEMENT_FAIL_1")
            } else {
                (TestResult::Pass, "ELEMENT_PASS_1")
            };
            result.add_element_result(
                outcome,
                element.id,
                Some(table.cache_id),
                message_id,
                vec![element.accessible_name.name.clone()],
            );
        }
    }
}
