//! Helpers shared by the rule modules.

use a11y_eval_core::{DomElement, RuleResult, TestResult};

/// Message id recorded for targets hidden from assistive technology.
pub(crate) const ELEMENT_HIDDEN: &str = "ELEMENT_HIDDEN_1";

/// Records `element` as hidden.
pub(crate) fn add_hidden(result: &mut RuleResult, element: &DomElement, cache_id: Option<usize>) {
    result.add_element_result(
        TestResult::Hidden,
        element.id,
        cache_id,
        ELEMENT_HIDDEN,
        vec![element.tag_name.clone()],
    );
}

/// Formats a contrast ratio for messages.
pub(crate) fn format_ratio(ratio: f64) -> String {
    format!("{ratio:.1}")
}

/// Reads a positive numeric option, keeping `default` for anything else.
pub(crate) fn positive_or(value: f64, default: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        tracing::warn!("Ignoring non-positive rule option {}, using {}", value, default);
        default
    }
}

/// Builds a cache of `page` and runs `rule` on it with the embedded messages.
#[cfg(test)]
pub(crate) fn run(
    rule: &dyn a11y_eval_core::Rule,
    page: &a11y_eval_core::SnapshotNode,
) -> (a11y_eval_core::DomCache, RuleResult) {
    use a11y_eval_core::{BuildOptions, DomCache, MessageCatalog};

    let cache = DomCache::build(page, &BuildOptions::default());
    let mut result = RuleResult::new(rule, rule.default_required(), MessageCatalog::embedded());
    rule.validate(&cache, &mut result);
    (cache, result)
}

/// Message ids of every result, in order.
#[cfg(test)]
pub(crate) fn message_ids(result: &RuleResult) -> Vec<&str> {
    result.results().iter().map(|r| r.message_id()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratio_has_one_decimal() {
        assert_eq!(format_ratio(21.0), "21.0");
        assert_eq!(format_ratio(4.4999), "4.5");
    }

    #[test]
    fn non_positive_options_fall_back() {
        assert!((positive_or(24.0, 12.0) - 24.0).abs() < f64::EPSILON);
        assert!((positive_or(0.0, 12.0) - 12.0).abs() < f64::EPSILON);
        assert!((positive_or(f64::NAN, 12.0) - 12.0).abs() < f64::EPSILON);
    }
}
