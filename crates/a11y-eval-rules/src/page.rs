//! Page metadata rules (TITLE_1, LANGUAGE_1).

use a11y_eval_core::{DomCache, Rule, RuleCategory, RuleResult, RuleScope, TestResult};

/// TITLE_1: the document has a non-empty `<title>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PageHasTitle;

impl PageHasTitle {
    /// Rule id.
    pub const ID: &'static str = "TITLE_1";
}

impl Rule for PageHasTitle {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn scope(&self) -> RuleScope {
        RuleScope::Page
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Page
    }

    fn wcag_primary_id(&self) -> &'static str {
        "2.4.2"
    }

    fn target_resources(&self) -> &'static [&'static str] {
        &["title"]
    }

    fn description(&self) -> &'static str {
        "Page has a title"
    }

    fn validate(&self, cache: &DomCache, result: &mut RuleResult) {
        match cache.title().map(str::trim).filter(|t| !t.is_empty()) {
            Some(title) => {
                result.add_page_result(TestResult::Pass, "PAGE_PASS_1", vec![title.to_string()]);
            }
            None => result.add_page_result(TestResult::Fail, "PAGE_FAIL_1", vec![]),
        }
    }
}

/// LANGUAGE_1: the `<html>` element declares a valid language.
#[derive(Debug, Clone, Copy, Default)]
pub struct PageHasLanguage;

impl PageHasLanguage {
    /// Rule id.
    pub const ID: &'static str = "LANGUAGE_1";
}

/// Checks the shape of a BCP 47 tag: a primary subtag of 2-3 or 5-8
/// letters, then alphanumeric subtags of 1-8 characters.
fn is_valid_language_tag(tag: &str) -> bool {
    let mut subtags = tag.split('-');
    let primary_ok = subtags.next().is_some_and(|p| {
        matches!(p.len(), 2 | 3 | 5..=8) && p.chars().all(|c| c.is_ascii_alphabetic())
    });
    primary_ok
        && subtags.all(|s| (1..=8).contains(&s.len()) && s.chars().all(|c| c.is_ascii_alphanumeric()))
}

impl Rule for PageHasLanguage {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn scope(&self) -> RuleScope {
        RuleScope::Page
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Page
    }

    fn wcag_primary_id(&self) -> &'static str {
        "3.1.1"
    }

    fn target_resources(&self) -> &'static [&'static str] {
        &["html[lang]", "html[xml:lang]"]
    }

    fn description(&self) -> &'static str {
        "Page declares its language"
    }

    fn validate(&self, cache: &DomCache, result: &mut RuleResult) {
        match cache.language() {
            None => result.add_page_result(TestResult::Fail, "PAGE_FAIL_1", vec![]),
            Some(lang) if is_valid_language_tag(lang) => {
                result.add_page_result(TestResult::Pass, "PAGE_PASS_1", vec![lang.to_string()]);
            }
            Some(lang) => {
                result.add_page_result(TestResult::Fail, "PAGE_FAIL_2", vec![lang.to_string()]);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::support::{message_ids, run};
    use a11y_eval_core::SnapshotNode;

    fn html(lang: Option<&str>, title: Option<&str>) -> SnapshotNode {
        let mut head = SnapshotNode::element("head");
        if let Some(title) = title {
            head = head.child(SnapshotNode::element("title").child(SnapshotNode::text(title)));
        }
        let mut root = SnapshotNode::element("html")
            .child(head)
            .child(SnapshotNode::element("body"));
        if let Some(lang) = lang {
            root = root.attr("lang", lang);
        }
        SnapshotNode::document(vec![root])
    }

    #[test]
    fn language_tags() {
        assert!(is_valid_language_tag("en"));
        assert!(is_valid_language_tag("en-US"));
        assert!(is_valid_language_tag("zh-Hant-TW"));
        assert!(is_valid_language_tag("es-419"));
        assert!(!is_valid_language_tag("e"));
        assert!(!is_valid_language_tag("en-abcdefghi"));
        assert!(!is_valid_language_tag("e1"));
        assert!(!is_valid_language_tag("en_US"));
        assert!(!is_valid_language_tag("en-"));
    }

    #[test]
    fn title_rule() {
        let (_, result) = run(&PageHasTitle, &html(None, Some(" Home ")));
        assert_eq!(message_ids(&result), ["PAGE_PASS_1"]);
        assert_eq!(result.results()[0].args(), ["Home"]);

        let (_, result) = run(&PageHasTitle, &html(None, Some("  ")));
        assert_eq!(message_ids(&result), ["PAGE_FAIL_1"]);
        assert_eq!(
            result.results()[0].message(),
            "The page MUST have a non-empty title element."
        );
    }

    #[test]
    fn language_rule() {
        let (_, result) = run(&PageHasLanguage, &html(Some("fr-CA"), None));
        assert_eq!(message_ids(&result), ["PAGE_PASS_1"]);

        let (_, result) = run(&PageHasLanguage, &html(None, None));
        assert_eq!(message_ids(&result), ["PAGE_FAIL_1"]);

        let (_, result) = run(&PageHasLanguage, &html(Some("en_GB"), None));
        assert_eq!(message_ids(&result), ["PAGE_FAIL_2"]);
        assert_eq!(result.summary().violations, 1);
    }
}
