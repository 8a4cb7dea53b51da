use super::{ElementReport, EvaluationReport, ResultKind, RuleReport, RuleResult, ResultsSummary};
use crate::cache::{DomCache, DomElement, NodeId};
use std::collections::HashMap;

/// Outcome of evaluating one page.
///
/// Owns the DOM cache the rules ran against, so element results can be
/// resolved back to their elements.
#[derive(Debug)]
pub struct EvaluationResult {
    title: String,
    url: String,
    ruleset: Option<String>,
    dom_cache: DomCache,
    rule_results: Vec<RuleResult>,
    index: HashMap<&'static str, usize>,
}

impl EvaluationResult {
    pub(crate) fn new(
        title: String,
        url: String,
        ruleset: Option<String>,
        dom_cache: DomCache,
        rule_results: Vec<RuleResult>,
    ) -> Self {
        let index = rule_results
            .iter()
            .enumerate()
            .map(|(i, r)| (r.rule_id(), i))
            .collect();
        Self {
            title,
            url,
            ruleset,
            dom_cache,
            rule_results,
            index,
        }
    }

    /// Page title given to the evaluator, else the document's `<title>`.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Page URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// `id@version` of the declarative ruleset used, if any.
    #[must_use]
    pub fn ruleset(&self) -> Option<&str> {
        self.ruleset.as_deref()
    }

    /// The DOM cache the rules ran against.
    #[must_use]
    pub fn dom_cache(&self) -> &DomCache {
        &self.dom_cache
    }

    /// Result of one rule.
    #[must_use]
    pub fn rule_result(&self, rule_id: &str) -> Option<&RuleResult> {
        self.index.get(rule_id).and_then(|i| self.rule_results.get(*i))
    }

    /// Rule results in evaluation order.
    #[must_use]
    pub fn rule_results(&self) -> &[RuleResult] {
        &self.rule_results
    }

    /// Element of the DOM cache.
    #[must_use]
    pub fn dom_element(&self, node: NodeId) -> Option<&DomElement> {
        self.dom_cache.element(node)
    }

    /// Element with the given `id` attribute.
    #[must_use]
    pub fn dom_element_by_id(&self, element_id: &str) -> Option<&DomElement> {
        self.dom_cache.element_by_id(element_id)
    }

    /// Accessible name of the element with the given `id` attribute.
    #[must_use]
    pub fn accessible_name_by_id(&self, element_id: &str) -> Option<&str> {
        self.dom_cache.accessible_name_by_id(element_id)
    }

    /// Counts across all rules.
    #[must_use]
    pub fn summary(&self) -> ResultsSummary {
        let mut total = ResultsSummary::default();
        for r in &self.rule_results {
            total.merge(&r.summary());
        }
        total
    }

    /// Returns `true` when any result is at least as severe as `threshold`.
    #[must_use]
    pub fn has_results_at_least(&self, threshold: ResultKind) -> bool {
        self.summary().has_at_least(threshold)
    }

    /// Builds a serializable report. Passed and hidden element results are
    /// included only when `include_passed` is set.
    #[must_use]
    pub fn report(&self, include_passed: bool) -> EvaluationReport {
        let rules = self
            .rule_results
            .iter()
            .map(|r| RuleReport {
                rule_id: r.rule_id().to_string(),
                category: r.category(),
                scope: r.scope(),
                wcag: r.wcag_primary_id().to_string(),
                level: r.wcag_level(),
                required: r.is_required(),
                summary: r.summary(),
                message: r.result_message(),
                results: r
                    .results()
                    .iter()
                    .filter(|e| include_passed || e.kind().is_at_least(ResultKind::ManualCheck))
                    .map(|e| ElementReport {
                        kind: e.kind(),
                        target: e.target(),
                        element: e
                            .node()
                            .and_then(|n| self.dom_cache.element(n))
                            .map(DomElement::label),
                        message_id: e.message_id().to_string(),
                        message: e.message().to_string(),
                    })
                    .collect(),
            })
            .collect();

        EvaluationReport {
            title: self.title.clone(),
            url: self.url.clone(),
            ruleset: self.ruleset.clone(),
            summary: self.summary(),
            rules,
        }
    }
}
