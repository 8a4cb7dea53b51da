//! Rule trait for defining accessibility rules.

use crate::cache::DomCache;
use crate::results::RuleResult;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Whether a rule classifies elements or the page as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleScope {
    /// One result for the page.
    Page,
    /// One result per target element.
    Element,
}

impl fmt::Display for RuleScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Page => write!(f, "page"),
            Self::Element => write!(f, "element"),
        }
    }
}

/// Rule category, used for grouping in reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleCategory {
    /// Text colour and contrast.
    Color,
    /// Headings.
    Headings,
    /// Landmark regions.
    Landmarks,
    /// Links.
    Links,
    /// Images.
    Images,
    /// Form controls and widgets.
    Forms,
    /// Lists.
    Lists,
    /// Tables.
    Tables,
    /// Page-level metadata.
    Page,
    /// Frames and iframes.
    Frames,
}

impl fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Color => "color",
            Self::Headings => "headings",
            Self::Landmarks => "landmarks",
            Self::Links => "links",
            Self::Images => "images",
            Self::Forms => "forms",
            Self::Lists => "lists",
            Self::Tables => "tables",
            Self::Page => "page",
            Self::Frames => "frames",
        };
        f.write_str(s)
    }
}

/// WCAG conformance level of a rule's primary success criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WcagLevel {
    /// Level A.
    A,
    /// Level AA.
    AA,
    /// Level AAA.
    AAA,
}

impl fmt::Display for WcagLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::A => write!(f, "A"),
            Self::AA => write!(f, "AA"),
            Self::AAA => write!(f, "AAA"),
        }
    }
}

/// An accessibility rule evaluated against a [`DomCache`].
///
/// `validate` reads the cache and appends one classification per target it
/// visits. Nothing is added implicitly: a rule that finds no targets leaves
/// its result empty, which reports as "not applicable".
///
/// # Example
///
/// ```ignore
/// use a11y_eval_core::{DomCache, Rule, RuleCategory, RuleResult, RuleScope, TestResult};
///
/// pub struct PageHasTitle;
///
/// impl Rule for PageHasTitle {
///     fn id(&self) -> &'static str { "TITLE_1" }
///     fn scope(&self) -> RuleScope { RuleScope::Page }
///     fn category(&self) -> RuleCategory { RuleCategory::Page }
///     fn wcag_primary_id(&self) -> &'static str { "2.4.2" }
///     fn target_resources(&self) -> &'static [&'static str] { &["title"] }
///
///     fn validate(&self, cache: &DomCache, result: &mut RuleResult) {
///         if cache.title().is_some_and(|t| !t.is_empty()) {
///             result.add_page_result(TestResult::Pass, "PAGE_PASS_1", vec![]);
///         } else {
///             result.add_page_result(TestResult::Fail, "PAGE_FAIL_1", vec![]);
///         }
///     }
/// }
/// ```
pub trait Rule: Send + Sync {
    /// Returns the rule id (e.g., "HEADING_1").
    fn id(&self) -> &'static str;

    /// Returns whether the rule classifies the page or elements.
    fn scope(&self) -> RuleScope;

    /// Returns the rule category.
    fn category(&self) -> RuleCategory;

    /// Returns the primary WCAG success criterion (e.g., "1.4.3").
    fn wcag_primary_id(&self) -> &'static str;

    /// Returns related WCAG success criteria.
    fn wcag_related_ids(&self) -> &'static [&'static str] {
        &[]
    }

    /// Returns the conformance level of the primary criterion.
    fn wcag_level(&self) -> WcagLevel {
        WcagLevel::A
    }

    /// Returns the tag/attribute selectors the rule examines.
    fn target_resources(&self) -> &'static [&'static str];

    /// Returns a brief description of what this rule checks.
    fn description(&self) -> &'static str {
        ""
    }

    /// Whether failures are violations (`true`) or warnings (`false`) when
    /// no configuration overrides it.
    fn default_required(&self) -> bool {
        true
    }

    /// Classifies the rule's targets, appending to `result`.
    fn validate(&self, cache: &DomCache, result: &mut RuleResult);
}

/// Type alias for boxed Rule trait objects.
pub type RuleBox = Box<dyn Rule>;

/// Shared handle to a registered rule.
pub type RuleRef = Arc<dyn Rule>;
