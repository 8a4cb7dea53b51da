//! Form control rules (CONTROL_1 to CONTROL_4).
//!
//! Controls include native form elements and any element with an explicit
//! widget role.

use crate::support::add_hidden;
use a11y_eval_core::cache::{ControlElement, ControlKind, NameSource};
use a11y_eval_core::{DomCache, DomElement, Rule, RuleCategory, RuleResult, RuleScope, TestResult, WcagLevel};

const TARGETS: &[&str] = &["input", "select", "textarea", "button", "output", "[role]"];

/// Controls matching `filter` that are visible to assistive technology;
/// hidden ones are recorded as such.
fn visible_controls<'a>(
    cache: &'a DomCache,
    result: &mut RuleResult,
    filter: impl Fn(&ControlElement, &DomElement) -> bool,
) -> Vec<(&'a ControlElement, &'a DomElement)> {
    let mut visible = Vec::new();
    for control in cache.controls().controls() {
        let Some(element) = cache.element(control.node) else {
            continue;
        };
        if !filter(control, element) {
            continue;
        }
        if element.is_visible_to_at() {
            visible.push((control, element));
        } else {
            add_hidden(result, element, Some(control.cache_id));
        }
    }
    visible
}

/// CONTROL_1: form controls have a label.
///
/// A control named only by its `placeholder` needs a manual check, since
/// the placeholder disappears once the user types.
#[derive(Debug, Clone, Copy, Default)]
pub struct ControlHasLabel;

impl ControlHasLabel {
    /// Rule id.
    pub const ID: &'static str = "CONTROL_1";
}

impl Rule for ControlHasLabel {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn scope(&self) -> RuleScope {
        RuleScope::Element
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Forms
    }

    fn wcag_primary_id(&self) -> &'static str {
        "3.3.2"
    }

    fn wcag_related_ids(&self) -> &'static [&'static str] {
        &["1.3.1", "4.1.2"]
    }

    fn target_resources(&self) -> &'static [&'static str] {
        TARGETS
    }

    fn description(&self) -> &'static str {
        "Form controls have labels"
    }

    fn validate(&self, cache: &DomCache, result: &mut RuleResult) {
        for (control, element) in visible_controls(cache, result, |c, e| c.needs_label(e)) {
            let name = &element.accessible_name;
            let label = element.label();
            let cache_id = Some(control.cache_id);
            if name.is_empty() {
                result.add_element_result(TestResult::Fail, element.id, cache_id, "ELEMENT_FAIL_1", vec![label]);
            } else if name.source == NameSource::Placeholder {
                result.add_element_result(
                    TestResult::ManualCheck,
                    element.id,
                    cache_id,
                    "ELEMENT_MC_1",
                    vec![label, name.name.clone()],
                );
            } else {
                result.add_element_result(
                    TestResult::Pass,
                    element.id,
                    cache_id,
                    "ELEMENT_PASS_1",
                    vec![label, name.name.clone(), name.source.to_string()],
                );
            }
        }
    }
}

/// CONTROL_2: labels of controls in the same group are unique.
///
/// A `tab` and the `tabpanel` it controls may share a name.
#[derive(Debug, Clone, Copy, Default)]
pub struct ControlLabelsUnique;

impl ControlLabelsUnique {
    /// Rule id.
    pub const ID: &'static str = "CONTROL_2";
}

impl Rule for ControlLabelsUnique {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn scope(&self) -> RuleScope {
        RuleScope::Element
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Forms
    }

    fn wcag_primary_id(&self) -> &'static str {
        "2.4.6"
    }

    fn wcag_related_ids(&self) -> &'static [&'static str] {
        &["1.3.1", "3.3.2"]
    }

    fn wcag_level(&self) -> WcagLevel {
        WcagLevel::AA
    }

    fn target_resources(&self) -> &'static [&'static str] {
        TARGETS
    }

    fn description(&self) -> &'static str {
        "Control labels are unique"
    }

    fn validate(&self, cache: &DomCache, result: &mut RuleResult) {
        let controls = cache.controls();
        let targeted = |c: &ControlElement, e: &DomElement| {
            c.kind != ControlKind::Fieldset && !c.is_button(e) && !e.accessible_name.is_empty()
        };
        for (control, element) in visible_controls(cache, result, targeted) {
            let duplicate = controls
                .duplicate_groups()
                .iter()
                .any(|g| g.is_duplicate && g.contains(control.node));
            let message_id = if duplicate { "ELEMENT_FAIL_1" } else { "ELEMENT_PASS_1" };
            let outcome = if duplicate { TestResult::Fail } else { TestResult::Pass };
            result.add_element_result(
                outcome,
                element.id,
                Some(control.cache_id),
                message_id,
                vec![element.label(), element.accessible_name.name.clone()],
            );
        }
    }
}

/// CONTROL_3: radio buttons are grouped by a named `fieldset`, `radiogroup`
/// or `group`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RadioButtonsGrouped;

impl RadioButtonsGrouped {
    /// Rule id.
    pub const ID: &'static str = "CONTROL_3";
}

impl Rule for RadioButtonsGrouped {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn scope(&self) -> RuleScope {
        RuleScope::Element
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Forms
    }

    fn wcag_primary_id(&self) -> &'static str {
        "1.3.1"
    }

    fn wcag_related_ids(&self) -> &'static [&'static str] {
        &["3.3.2"]
    }

    fn target_resources(&self) -> &'static [&'static str] {
        &["input[type=\"radio\"]", "[role=\"radio\"]"]
    }

    fn description(&self) -> &'static str {
        "Radio buttons are grouped"
    }

    fn validate(&self, cache: &DomCache, result: &mut RuleResult) {
        for (control, element) in visible_controls(cache, result, |_, e| e.has_role("radio")) {
            let group = control.grouping_element.and_then(|g| cache.element(g));
            let (outcome, message_id, args) = match group {
                None => (TestResult::Fail, "ELEMENT_FAIL_1", vec![]),
                Some(g) if g.accessible_name.is_empty() => (TestResult::Fail, "ELEMENT_FAIL_2", vec![]),
                Some(g) => (TestResult::Pass, "ELEMENT_PASS_1", vec![g.accessible_name.name.clone()]),
            };
            result.add_element_result(outcome, element.id, Some(control.cache_id), message_id, args);
        }
    }
}

/// CONTROL_4: buttons have an accessible name.
#[derive(Debug, Clone, Copy, Default)]
pub struct ButtonHasName;

impl ButtonHasName {
    /// Rule id.
    pub const ID: &'static str = "CONTROL_4";
}

impl Rule for ButtonHasName {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn scope(&self) -> RuleScope {
        RuleScope::Element
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Forms
    }

    fn wcag_primary_id(&self) -> &'static str {
        "4.1.2"
    }

    fn target_resources(&self) -> &'static [&'static str] {
        &["button", "input[type=\"submit\"]", "input[type=\"reset\"]", "input[type=\"button\"]", "input[type=\"image\"]", "[role=\"button\"]"]
    }

    fn description(&self) -> &'static str {
        "Buttons have accessible names"
    }

    fn validate(&self, cache: &DomCache, result: &mut RuleResult) {
        for (control, element) in visible_controls(cache, result, |c, e| c.is_button(e)) {
            let label = element.label();
            if element.accessible_name.is_empty() {
                result.add_element_result(
                    TestResult::Fail,
                    element.id,
                    Some(control.cache_id),
                    "ELEMENT_FAIL_1",
                    vec![label],
                );
            } else {
                result.add_element_result(
                    TestResult::Pass,
                    element.id,
                    Some(control.cache_id),
                    "ELEMENT_PASS_1",
                    vec![label, element.accessible_name.name.clone()],
                );
            }
        }
    }
}
