//! Classified results and their aggregation.

mod element;
mod evaluation;
mod report;
mod rule_result;

pub use element::ElementResult;
pub use evaluation::EvaluationResult;
pub use report::{ElementReport, EvaluationReport, RuleReport};
pub use rule_result::RuleResult;

use crate::cache::NodeId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What a rule reports for one target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TestResult {
    /// The target fails; a violation or warning depending on the rule.
    Fail,
    /// The target passes.
    Pass,
    /// A person must judge the target.
    ManualCheck,
    /// The target is hidden from assistive technology.
    Hidden,
}

/// Final classification of one result.
///
/// Variants are declared in display order, most severe first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultKind {
    /// Failure of a required rule.
    Violation,
    /// Failure of a recommended rule.
    Warning,
    /// Needs human review.
    ManualCheck,
    /// Passed.
    Pass,
    /// Hidden from assistive technology.
    Hidden,
}

impl ResultKind {
    /// Maps a rule's test result using whether the rule is required.
    #[must_use]
    pub fn from_test(result: TestResult, required: bool) -> Self {
        match result {
            TestResult::Fail if required => Self::Violation,
            TestResult::Fail => Self::Warning,
            TestResult::Pass => Self::Pass,
            TestResult::ManualCheck => Self::ManualCheck,
            TestResult::Hidden => Self::Hidden,
        }
    }

    /// Returns `true` when this kind is at least as severe as `threshold`.
    #[must_use]
    pub fn is_at_least(self, threshold: Self) -> bool {
        self <= threshold
    }

    /// Parses a kind name as used in configuration.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "violation" | "violations" => Some(Self::Violation),
            "warning" | "warnings" => Some(Self::Warning),
            "manual_check" | "manual_checks" => Some(Self::ManualCheck),
            "pass" | "passed" => Some(Self::Pass),
            "hidden" => Some(Self::Hidden),
            _ => None,
        }
    }
}

impl fmt::Display for ResultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Violation => "violation",
            Self::Warning => "warning",
            Self::ManualCheck => "manual check",
            Self::Pass => "pass",
            Self::Hidden => "hidden",
        };
        f.write_str(s)
    }
}

/// What a result is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ResultTarget {
    /// The page as a whole.
    Page,
    /// One element, and the sub-cache entry it was reached through.
    Element {
        /// The element.
        node: NodeId,
        /// Cache-scoped id of the sub-cache entry, when there is one.
        cache_id: Option<usize>,
    },
}

impl ResultTarget {
    /// Targets an element without a sub-cache entry.
    #[must_use]
    pub fn element(node: NodeId) -> Self {
        Self::Element {
            node,
            cache_id: None,
        }
    }

    /// Targets a sub-cache entry.
    #[must_use]
    pub fn entry(node: NodeId, cache_id: usize) -> Self {
        Self::Element {
            node,
            cache_id: Some(cache_id),
        }
    }

    /// Returns the element, if any.
    #[must_use]
    pub fn node(&self) -> Option<NodeId> {
        match self {
            Self::Page => None,
            Self::Element { node, .. } => Some(*node),
        }
    }
}

/// Counts of results by kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultsSummary {
    /// Violations.
    pub violations: usize,
    /// Warnings.
    pub warnings: usize,
    /// Manual checks.
    pub manual_checks: usize,
    /// Passes.
    pub passed: usize,
    /// Hidden.
    pub hidden: usize,
}

impl ResultsSummary {
    /// Counts one result.
    pub fn record(&mut self, kind: ResultKind) {
        match kind {
            ResultKind::Violation => self.violations += 1,
            ResultKind::Warning => self.warnings += 1,
            ResultKind::ManualCheck => self.manual_checks += 1,
            ResultKind::Pass => self.passed += 1,
            ResultKind::Hidden => self.hidden += 1,
        }
    }

    /// Adds another summary.
    pub fn merge(&mut self, other: &Self) {
        self.violations += other.violations;
        self.warnings += other.warnings;
        self.manual_checks += other.manual_checks;
        self.passed += other.passed;
        self.hidden += other.hidden;
    }

    /// Total number of results.
    #[must_use]
    pub fn total(&self) -> usize {
        self.violations + self.warnings + self.manual_checks + self.passed + self.hidden
    }

    /// Returns the count for a kind.
    #[must_use]
    pub fn count(&self, kind: ResultKind) -> usize {
        match kind {
            ResultKind::Violation => self.violations,
            ResultKind::Warning => self.warnings,
            ResultKind::ManualCheck => self.manual_checks,
            ResultKind::Pass => self.passed,
            ResultKind::Hidden => self.hidden,
        }
    }

    /// Returns `true` when the rule had no targets.
    #[must_use]
    pub fn is_not_applicable(&self) -> bool {
        self.total() == 0
    }

    /// Returns `true` when any result is at least as severe as `threshold`.
    #[must_use]
    pub fn has_at_least(&self, threshold: ResultKind) -> bool {
        [
            ResultKind::Violation,
            ResultKind::Warning,
            ResultKind::ManualCheck,
            ResultKind::Pass,
            ResultKind::Hidden,
        ]
        .into_iter()
        .any(|k| k.is_at_least(threshold) && self.count(k) > 0)
    }
}

impl fmt::Display for ResultsSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} violation(s), {} warning(s), {} manual check(s), {} passed, {} hidden",
            self.violations, self.warnings, self.manual_checks, self.passed, self.hidden
        )
    }
}
