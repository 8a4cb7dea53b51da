//! Frame rule (FRAME_1).

use crate::support::add_hidden;
use a11y_eval_core::cache::FrameAccess;
use a11y_eval_core::{DomCache, Rule, RuleCategory, RuleResult, RuleScope, TestResult};

/// FRAME_1: frames have a title. Content from another origin cannot be
/// evaluated and needs a manual check.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameHasTitle;

impl FrameHasTitle {
    /// Rule id.
    pub const ID: &'static str = "FRAME_1";
}

impl Rule for FrameHasTitle {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn scope(&self) -> RuleScope {
        RuleScope::Element
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Frames
    }

    fn wcag_primary_id(&self) -> &'static str {
        "4.1.2"
    }

    fn wcag_related_ids(&self) -> &'static [&'static str] {
        &["2.4.1"]
    }

    fn target_resources(&self) -> &'static [&'static str] {
        &["frame", "iframe"]
    }

    fn description(&self) -> &'static str {
        "Frames have titles"
    }

    fn validate(&self, cache: &DomCache, result: &mut RuleResult) {
        let frames = cache
            .elements()
            .filter(|e| matches!(e.tag_name.as_str(), "frame" | "iframe"));
        for element in frames {
            if !element.is_visible_to_at() {
                add_hidden(result, element, None);
                continue;
            }
            let tag = element.tag_name.clone();
            let name = &element.accessible_name;
            let (outcome, message_id, args) = if name.is_empty() {
                (TestResult::Fail, "ELEMENT_FAIL_1", vec![tag])
            } else if element.frame_access == Some(FrameAccess::CrossOrigin) {
                (TestResult::ManualCheck, "ELEMENT_MC_1", vec![tag, name.name.clone()])
            } else {
                (TestResult::Pass, "ELEMENT_PASS_1", vec![tag, name.name.clone()])
            };
            result.add_element_result(outcome, element.id, None, message_id, args);
        }
    }
}
