//! Rule presets for common configurations.

use crate::{
    AltTextLength, AriaListOwnsItems, ButtonHasName, ContentInLandmark, ContrastEnhanced,
    ContrastMinimum, ControlHasLabel, ControlLabelsUnique, DataCellsHaveHeaders,
    DataTableHasName, DataTableNamesUnique, FrameHasTitle, H1InMain, HeadingHasName,
    HeadingsNested, HeadingsNestedInLandmark, ImageHasAlt, LandmarkNamesUnique, LinkHasName,
    ListChildrenAreItems, PageHasH1, PageHasLanguage, PageHasMain, PageHasTitle,
    RadioButtonsGrouped, SameNameSameHref, SiblingHeadingsUnique, TargetSize,
};
use a11y_eval_core::{Config, EvaluatorBuilder, RuleBox, RuleCatalog, WcagLevel};
use std::sync::OnceLock;

/// Preset configurations for a11y-eval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Preset {
    /// WCAG level A and AA rules.
    #[default]
    Recommended,
    /// Every rule, each one required.
    Strict,
    /// WCAG level A rules only, for gradual adoption.
    Minimal,
}

impl Preset {
    /// Preset names accepted in configuration.
    pub const NAMES: &'static [&'static str] = &["recommended", "strict", "minimal"];

    /// Parses a preset name (case-insensitive).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "recommended" => Some(Self::Recommended),
            "strict" => Some(Self::Strict),
            "minimal" => Some(Self::Minimal),
            _ => None,
        }
    }

    /// The configuration name of this preset.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Recommended => "recommended",
            Self::Strict => "strict",
            Self::Minimal => "minimal",
        }
    }

    /// Returns `true` when rules of `level` belong to this preset.
    #[must_use]
    pub fn includes(self, level: WcagLevel) -> bool {
        match self {
            Self::Recommended => level <= WcagLevel::AA,
            Self::Strict => true,
            Self::Minimal => level == WcagLevel::A,
        }
    }

    /// Returns the rules for this preset with default options.
    #[must_use]
    pub fn rules(self) -> Vec<RuleBox> {
        self.filter(all_rules())
    }

    /// Returns the rules for this preset with options from `config`.
    #[must_use]
    pub fn rules_with_config(self, config: &Config) -> Vec<RuleBox> {
        self.filter(configured_rules(config))
    }

    /// Builds a catalog of this preset's rules configured by `config`.
    #[must_use]
    pub fn catalog(self, config: &Config) -> RuleCatalog {
        into_catalog(self.rules_with_config(config))
    }

    /// Installs this preset's catalog on `builder`. The strict preset also
    /// marks every rule required unless `config` says otherwise.
    #[must_use]
    pub fn apply(self, builder: EvaluatorBuilder, config: &Config) -> EvaluatorBuilder {
        let catalog = self.catalog(config);
        let mut builder = builder;
        if self == Self::Strict {
            for rule in catalog.iter() {
                if config.rule_required(rule.id()).is_none() {
                    builder = builder.required(rule.id(), true);
                }
            }
        }
        tracing::debug!("Applying preset '{}' with {} rule(s)", self.name(), catalog.len());
        builder.catalog(catalog)
    }

    fn filter(self, rules: Vec<RuleBox>) -> Vec<RuleBox> {
        rules
            .into_iter()
            .filter(|r| self.includes(r.wcag_level()))
            .collect()
    }
}

/// Returns the recommended set of rules (levels A and AA).
#[must_use]
pub fn recommended_rules() -> Vec<RuleBox> {
    Preset::Recommended.rules()
}

/// Returns the strict set of rules (every rule).
#[must_use]
pub fn strict_rules() -> Vec<RuleBox> {
    Preset::Strict.rules()
}

/// Returns the minimal set of rules (level A).
#[must_use]
pub fn minimal_rules() -> Vec<RuleBox> {
    Preset::Minimal.rules()
}

/// Returns all available rules with default options, in catalog order.
#[must_use]
pub fn all_rules() -> Vec<RuleBox> {
    vec![
        Box::new(ContrastMinimum::new()),
        Box::new(ContrastEnhanced::new()),
        Box::new(PageHasH1),
        Box::new(H1InMain),
        Box::new(SiblingHeadingsUnique),
        Box::new(HeadingsNestedInLandmark),
        Box::new(HeadingsNested),
        Box::new(HeadingHasName),
        Box::new(PageHasMain),
        Box::new(ContentInLandmark),
        Box::new(LandmarkNamesUnique),
        Box::new(LinkHasName),
        Box::new(SameNameSameHref),
        Box::new(TargetSize::new()),
        Box::new(ImageHasAlt),
        Box::new(AltTextLength::new()),
        Box::new(ControlHasLabel),
        Box::new(ControlLabelsUnique),
        Box::new(RadioButtonsGrouped),
        Box::new(ButtonHasName),
        Box::new(AriaListOwnsItems),
        Box::new(ListChildrenAreItems),
        Box::new(DataCellsHaveHeaders),
        Box::new(DataTableHasName),
        Box::new(DataTableNamesUnique),
        Box::new(PageHasTitle),
        Box::new(PageHasLanguage),
        Box::new(FrameHasTitle),
    ]
}

/// Returns all available rules with options read from `[rules.<ID>]`
/// tables of `config`.
#[must_use]
pub fn configured_rules(config: &Config) -> Vec<RuleBox> {
    all_rules()
        .into_iter()
        .map(|rule| -> RuleBox {
            let Some(options) = config.rule(rule.id()) else {
                return rule;
            };
            match rule.id() {
                ContrastMinimum::ID => Box::new(ContrastMinimum::new().thresholds(
                    options.get_f64("threshold", 4.5),
                    options.get_f64("large_threshold", 3.0),
                )),
                ContrastEnhanced::ID => Box::new(ContrastEnhanced::new().thresholds(
                    options.get_f64("threshold", 7.0),
                    options.get_f64("large_threshold", 4.5),
                )),
                TargetSize::ID => {
                    Box::new(TargetSize::new().min_size(options.get_f64("min_size", 12.0)))
                }
                AltTextLength::ID => {
                    let max = usize::try_from(options.get_int("max_length", 100)).unwrap_or(0);
                    Box::new(AltTextLength::new().max_length(max))
                }
                _ => rule,
            }
        })
        .collect()
}

fn into_catalog(rules: Vec<RuleBox>) -> RuleCatalog {
    let mut catalog = RuleCatalog::new();
    for rule in rules {
        if let Err(e) = catalog.register(rule) {
            tracing::warn!("Skipping built-in rule: {}", e);
        }
    }
    catalog
}

/// The shared catalog of every built-in rule with default options.
pub fn catalog() -> &'static RuleCatalog {
    static CATALOG: OnceLock<RuleCatalog> = OnceLock::new();
    CATALOG.get_or_init(|| into_catalog(all_rules()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(rules: &[RuleBox]) -> Vec<&'static str> {
        rules.iter().map(|r| r.id()).collect()
    }

    #[test]
    fn test_preset_rules() {
        assert_eq!(strict_rules().len(), 28);
        assert!(!ids(&recommended_rules()).contains(&"COLOR_2"));
        assert!(ids(&recommended_rules()).contains(&"COLOR_1"));
        let minimal = minimal_rules();
        assert!(minimal.iter().all(|r| r.wcag_level() == WcagLevel::A));
        assert!(!ids(&minimal).contains(&"LINK_3"));
    }

    #[test]
    fn rule_ids_are_unique() {
        assert_eq!(catalog().len(), all_rules().len());
    }

    #[test]
    fn names_round_trip() {
        for name in Preset::NAMES {
            assert_eq!(Preset::from_name(name).map(Preset::name), Some(*name));
        }
        assert_eq!(Preset::from_name(" Strict "), Some(Preset::Strict));
        assert_eq!(Preset::from_name("lenient"), None);
    }

    #[test]
    fn options_reach_rules() {
        use a11y_eval_core::{Rect, SnapshotNode};

        let config = Config::parse(
            r"
[rules.LINK_3]
min_size = 24

[rules.IMAGE_2]
max_length = 50
",
        )
        .unwrap();
        let rules = configured_rules(&config);
        assert_eq!(rules.len(), 28);

        let doc = SnapshotNode::document(vec![SnapshotNode::element("a")
            .attr("href", "/")
            .rect(Rect::new(0.0, 0.0, 20.0, 20.0))
            .child(SnapshotNode::text("Home"))]);
        let target_size = |rules: &[RuleBox]| {
            let rule = rules.iter().find(|r| r.id() == "LINK_3").unwrap();
            let (_, result) = crate::support::run(rule.as_ref(), &doc);
            result.results()[0].message_id().to_string()
        };
        assert_eq!(target_size(&rules), "ELEMENT_FAIL_1");
        assert_eq!(target_size(&all_rules()), "ELEMENT_PASS_1");
    }

    #[test]
    fn strict_marks_rules_required() {
        let config = Config::parse("[rules.COLOR_2]\nrequired = false\n").unwrap();
        let evaluator = Preset::Strict
            .apply(a11y_eval_core::Evaluator::builder(), &config)
            .build()
            .unwrap();
        let planned: Vec<(&str, bool)> = evaluator.planned_rules().collect();
        assert_eq!(planned.len(), 28);
        assert!(planned.contains(&("LINK_2", true)));
        assert!(planned.contains(&("COLOR_2", false)));
    }
}
