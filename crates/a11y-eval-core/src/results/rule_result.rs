use super::{ElementResult, ResultKind, ResultTarget, ResultsSummary, TestResult};
use crate::cache::NodeId;
use crate::messages::{self, MessageCatalog};
use crate::rule::{Rule, RuleCategory, RuleScope, WcagLevel};
use std::sync::Arc;

/// All results of one rule on one page.
#[derive(Debug)]
pub struct RuleResult {
    rule_id: &'static str,
    scope: RuleScope,
    category: RuleCategory,
    wcag_primary_id: &'static str,
    wcag_level: WcagLevel,
    required: bool,
    catalog: Arc<MessageCatalog>,
    results: Vec<ElementResult>,
    summary: ResultsSummary,
}

impl RuleResult {
    /// Creates an empty result for `rule`.
    #[must_use]
    pub fn new(rule: &dyn Rule, required: bool, catalog: Arc<MessageCatalog>) -> Self {
        Self {
            rule_id: rule.id(),
            scope: rule.scope(),
            category: rule.category(),
            wcag_primary_id: rule.wcag_primary_id(),
            wcag_level: rule.wcag_level(),
            required,
            catalog,
            results: Vec::new(),
            summary: ResultsSummary::default(),
        }
    }

    /// Records a classification of `target`.
    pub fn add_result(
        &mut self,
        result: TestResult,
        target: ResultTarget,
        message_id: &str,
        args: Vec<String>,
    ) {
        let kind = ResultKind::from_test(result, self.required);
        self.summary.record(kind);
        self.results.push(ElementResult::new(
            self.rule_id,
            kind,
            target,
            message_id,
            args,
            self.required,
            Arc::clone(&self.catalog),
        ));
    }

    /// Records a page-level classification.
    pub fn add_page_result(&mut self, result: TestResult, message_id: &str, args: Vec<String>) {
        self.add_result(result, ResultTarget::Page, message_id, args);
    }

    /// Records a classification of an element reached through a sub-cache
    /// entry (`cache_id`), or directly when `cache_id` is `None`.
    pub fn add_element_result(
        &mut self,
        result: TestResult,
        node: NodeId,
        cache_id: Option<usize>,
        message_id: &str,
        args: Vec<String>,
    ) {
        self.add_result(result, ResultTarget::Element { node, cache_id }, message_id, args);
    }

    /// Rule id.
    #[must_use]
    pub fn rule_id(&self) -> &'static str {
        self.rule_id
    }

    /// Rule scope.
    #[must_use]
    pub fn scope(&self) -> RuleScope {
        self.scope
    }

    /// Rule category.
    #[must_use]
    pub fn category(&self) -> RuleCategory {
        self.category
    }

    /// Primary WCAG success criterion.
    #[must_use]
    pub fn wcag_primary_id(&self) -> &'static str {
        self.wcag_primary_id
    }

    /// Conformance level of the primary criterion.
    #[must_use]
    pub fn wcag_level(&self) -> WcagLevel {
        self.wcag_level
    }

    /// Whether failures count as violations.
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Results in the order they were recorded.
    #[must_use]
    pub fn results(&self) -> &[ElementResult] {
        &self.results
    }

    /// Results of one kind.
    pub fn results_of(&self, kind: ResultKind) -> impl Iterator<Item = &ElementResult> {
        self.results.iter().filter(move |r| r.kind() == kind)
    }

    /// Results about one element.
    pub fn results_for(&self, node: NodeId) -> impl Iterator<Item = &ElementResult> {
        self.results.iter().filter(move |r| r.node() == Some(node))
    }

    /// Counts by kind.
    #[must_use]
    pub fn summary(&self) -> ResultsSummary {
        self.summary
    }

    /// Key of the rule-level message for the current counts.
    #[must_use]
    pub fn result_message_key(&self) -> &'static str {
        let s = &self.summary;
        if s.is_not_applicable() {
            "NOT_APPLICABLE"
        } else if s.violations + s.warnings > 0 {
            "SOME_FAIL"
        } else if s.manual_checks > 0 {
            "MANUAL_CHECK"
        } else if s.passed > 0 {
            "ALL_PASS"
        } else {
            "ALL_HIDDEN"
        }
    }

    /// Rendered rule-level message.
    #[must_use]
    pub fn result_message(&self) -> String {
        let key = self.result_message_key();
        self.catalog.rule_message(self.rule_id, key).map_or_else(
            || messages::missing_message(key),
            |template| messages::render_summary(template, &self.summary),
        )
    }

    /// Catalog summary line of the rule.
    #[must_use]
    pub fn rule_summary(&self) -> Option<&str> {
        self.catalog.summary(self.rule_id)
    }
}
