//! Serializable report of an evaluation.

use super::{ResultKind, ResultTarget, ResultsSummary};
use crate::rule::{RuleCategory, RuleScope, WcagLevel};
use serde::{Deserialize, Serialize};

/// Report of one page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationReport {
    /// Page title.
    pub title: String,
    /// Page URL.
    pub url: String,
    /// Declarative ruleset, if one was used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ruleset: Option<String>,
    /// Counts across all rules.
    pub summary: ResultsSummary,
    /// Per-rule reports in evaluation order.
    pub rules: Vec<RuleReport>,
}

/// Report of one rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleReport {
    /// Rule id.
    pub rule_id: String,
    /// Rule category.
    pub category: RuleCategory,
    /// Rule scope.
    pub scope: RuleScope,
    /// Primary WCAG success criterion.
    pub wcag: String,
    /// WCAG level.
    pub level: WcagLevel,
    /// Whether failures are violations.
    pub required: bool,
    /// Counts.
    pub summary: ResultsSummary,
    /// Rule-level message.
    pub message: String,
    /// Element results.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub results: Vec<ElementReport>,
}

/// Report of one element result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElementReport {
    /// Classification.
    pub kind: ResultKind,
    /// Target.
    pub target: ResultTarget,
    /// Short element description, e.g. `a#home`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element: Option<String>,
    /// Message id.
    pub message_id: String,
    /// Rendered message.
    pub message: String,
}
