//! Core evaluator for running rules against a page.

use crate::cache::{BuildOptions, DomCache};
use crate::catalog::{CatalogError, RuleCatalog};
use crate::config::{Config, ConfigError};
use crate::host::HostNode;
use crate::messages::{MessageCatalog, MessageError};
use crate::results::{EvaluationResult, RuleResult};
use crate::rule::{Rule, RuleBox, RuleRef};
use crate::ruleset::{loader, LoadError, Ruleset};

use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur while configuring an [`Evaluator`].
#[derive(Debug, Error, miette::Diagnostic)]
pub enum EvaluatorError {
    /// A rule id is registered twice.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Catalog(#[from] CatalogError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    /// The ruleset is invalid.
    #[error("Ruleset error: {0}")]
    #[diagnostic(transparent)]
    Ruleset(#[from] LoadError),

    /// The message catalog could not be loaded.
    #[error("Message catalog error: {0}")]
    #[diagnostic(transparent)]
    Messages(#[from] MessageError),

    /// No built-in catalog exists for the locale.
    #[error("No message catalog for locale `{locale}`")]
    #[diagnostic(
        code(a11y_eval::evaluator::unknown_locale),
        help("use `locale = \"en-us\"` or point `messages` at a catalog file")
    )]
    UnknownLocale {
        /// The requested locale.
        locale: String,
    },

    /// Glob pattern error.
    #[error("Invalid rule pattern: {0}")]
    #[diagnostic(code(a11y_eval::evaluator::pattern))]
    Glob(#[from] glob::PatternError),
}

/// Builder for configuring an [`Evaluator`].
#[derive(Default)]
pub struct EvaluatorBuilder {
    catalog: Option<RuleCatalog>,
    rules: Vec<RuleBox>,
    config: Option<Config>,
    ruleset: Option<Ruleset>,
    messages: Option<Arc<MessageCatalog>>,
    max_depth: Option<usize>,
    required: HashMap<String, bool>,
    only: Vec<String>,
}

impl EvaluatorBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses the rules of `catalog`.
    #[must_use]
    pub fn catalog(mut self, catalog: RuleCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Adds a rule on top of the catalog.
    #[must_use]
    pub fn rule<R: Rule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Adds a boxed rule on top of the catalog.
    #[must_use]
    pub fn rule_box(mut self, rule: RuleBox) -> Self {
        self.rules.push(rule);
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Restricts and orders rules by a ruleset.
    #[must_use]
    pub fn ruleset(mut self, ruleset: Ruleset) -> Self {
        self.ruleset = Some(ruleset);
        self
    }

    /// Sets the message catalog.
    #[must_use]
    pub fn messages(mut self, messages: Arc<MessageCatalog>) -> Self {
        self.messages = Some(messages);
        self
    }

    /// Sets the traversal depth limit.
    #[must_use]
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Overrides whether failures of a rule are violations.
    #[must_use]
    pub fn required(mut self, rule_id: impl Into<String>, required: bool) -> Self {
        self.required.insert(rule_id.into(), required);
        self
    }

    /// Only runs rules whose id matches one of the glob patterns.
    #[must_use]
    pub fn only<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.only.extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Builds the evaluator.
    ///
    /// # Errors
    ///
    /// Returns an error if a rule id is duplicated, the configuration's
    /// ruleset or message catalog is invalid, or an `only` pattern is not a
    /// valid glob.
    pub fn build(self) -> Result<Evaluator, EvaluatorError> {
        let mut catalog = self.catalog.unwrap_or_default();
        for rule in self.rules {
            catalog.register(rule)?;
        }

        let config = self.config.unwrap_or_default();
        config.fail_threshold()?;

        let ruleset = match (self.ruleset, &config.ruleset) {
            (Some(ruleset), _) => Some(ruleset),
            (None, Some(dto)) => Some(loader::load(dto.clone(), &catalog)?),
            (None, None) => None,
        };

        let messages = match (self.messages, &config.messages, &config.locale) {
            (Some(messages), _, _) => messages,
            (None, Some(path), _) => Arc::new(MessageCatalog::from_file(path)?),
            (None, None, Some(locale)) => MessageCatalog::for_locale(locale).ok_or_else(|| {
                EvaluatorError::UnknownLocale {
                    locale: locale.clone(),
                }
            })?,
            (None, None, None) => MessageCatalog::embedded(),
        };

        let only = self
            .only
            .iter()
            .map(|p| glob::Pattern::new(p))
            .collect::<Result<Vec<_>, _>>()?;

        let ordered: Vec<(RuleRef, Option<bool>)> = match &ruleset {
            Some(ruleset) => ruleset
                .rules()
                .iter()
                .filter(|m| m.enabled())
                .filter_map(|m| catalog.get(m.rule_id()).map(|r| (Arc::clone(r), m.required())))
                .collect(),
            None => catalog.iter().map(|r| (Arc::clone(r), None)).collect(),
        };

        let plan: Vec<PlannedRule> = ordered
            .into_iter()
            .filter(|(rule, _)| {
                let id = rule.id();
                config.is_rule_enabled(id) && (only.is_empty() || only.iter().any(|p| p.matches(id)))
            })
            .map(|(rule, mapped)| {
                let id = rule.id();
                let required = self
                    .required
                    .get(id)
                    .copied()
                    .or_else(|| config.rule_required(id))
                    .or(mapped)
                    .unwrap_or_else(|| rule.default_required());
                PlannedRule { rule, required }
            })
            .collect();

        debug!("Evaluator planned {} of {} rule(s)", plan.len(), catalog.len());

        Ok(Evaluator {
            plan,
            messages,
            options: BuildOptions {
                max_depth: self.max_depth.unwrap_or(config.evaluator.max_depth),
            },
            ruleset: ruleset.as_ref().map(Ruleset::identity),
        })
    }
}

struct PlannedRule {
    rule: RuleRef,
    required: bool,
}

/// Runs a fixed set of rules against pages.
///
/// Use [`Evaluator::builder()`] to construct an instance. An evaluator is
/// immutable and can evaluate any number of pages; each evaluation builds
/// its own [`DomCache`].
pub struct Evaluator {
    plan: Vec<PlannedRule>,
    messages: Arc<MessageCatalog>,
    options: BuildOptions,
    ruleset: Option<String>,
}

impl Evaluator {
    /// Creates a new builder for configuring an evaluator.
    #[must_use]
    pub fn builder() -> EvaluatorBuilder {
        EvaluatorBuilder::new()
    }

    /// Returns the number of rules that will run.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.plan.len()
    }

    /// Ids of the rules that will run, in order, with their requirement.
    pub fn planned_rules(&self) -> impl Iterator<Item = (&'static str, bool)> + '_ {
        self.plan.iter().map(|p| (p.rule.id(), p.required))
    }

    /// Evaluates the page rooted at `root`.
    ///
    /// An empty `title` falls back to the document's `<title>`.
    pub fn evaluate<N: HostNode>(&self, root: N, title: &str, url: &str) -> EvaluationResult {
        info!("Evaluating {}", if url.is_empty() { "<page>" } else { url });

        let cache = DomCache::build(root, &self.options);
        debug!("DOM cache: {} node(s)", cache.len());

        let rule_results: Vec<RuleResult> = self
            .plan
            .iter()
            .map(|planned| {
                let mut result =
                    RuleResult::new(planned.rule.as_ref(), planned.required, Arc::clone(&self.messages));
                planned.rule.validate(&cache, &mut result);
                debug!("{}: {}", planned.rule.id(), result.summary());
                result
            })
            .collect();

        let title = if title.is_empty() {
            cache.title().unwrap_or_default().to_string()
        } else {
            title.to_string()
        };

        let evaluation =
            EvaluationResult::new(title, url.to_string(), self.ruleset.clone(), cache, rule_results);
        info!("Evaluation complete: {}", evaluation.summary());
        evaluation
    }
}

impl std::fmt::Debug for Evaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Evaluator")
            .field("rules", &self.planned_rules().collect::<Vec<_>>())
            .field("locale", &self.messages.locale)
            .field("max_depth", &self.options.max_depth)
            .field("ruleset", &self.ruleset)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::{ResultKind, TestResult};
    use crate::rule::{RuleCategory, RuleScope};
    use crate::snapshot::SnapshotNode;

    struct TitlePresent;

    impl Rule for TitlePresent {
        fn id(&self) -> &'static str {
            "TITLE_1"
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
        fn validate(&self, cache: &DomCache, result: &mut RuleResult) {
            match cache.title() {
                Some(t) if !t.is_empty() => {
                    result.add_page_result(TestResult::Pass, "PAGE_PASS_1", vec![t.to_string()]);
                }
                _ => result.add_page_result(TestResult::Fail, "PAGE_FAIL_1", vec![]),
            }
        }
    }

    struct Silent;

    impl Rule for Silent {
        fn id(&self) -> &'static str {
            "LANGUAGE_1"
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
            &["html"]
        }
        fn default_required(&self) -> bool {
            false
        }
        fn validate(&self, _cache: &DomCache, _result: &mut RuleResult) {}
    }

    fn page(title: Option<&str>) -> SnapshotNode {
        let mut head = SnapshotNode::element("head");
        if let Some(t) = title {
            head = head.child(SnapshotNode::element("title").child(SnapshotNode::text(t)));
        }
        SnapshotNode::document(vec![SnapshotNode::element("html")
            .child(head)
            .child(SnapshotNode::element("body"))])
    }

    #[test]
    fn test_builder() {
        let evaluator = Evaluator::builder()
            .rule(TitlePresent)
            .rule(Silent)
            .build()
            .unwrap();
        assert_eq!(evaluator.rule_count(), 2);
        let planned: Vec<_> = evaluator.planned_rules().collect();
        assert_eq!(planned, vec![("TITLE_1", true), ("LANGUAGE_1", false)]);
    }

    #[test]
    fn test_duplicate_rule_is_rejected() {
        let err = Evaluator::builder()
            .rule(TitlePresent)
            .rule(TitlePresent)
            .build()
            .unwrap_err();
        assert!(matches!(err, EvaluatorError::Catalog(_)));
    }

    #[test]
    fn test_evaluate_and_query() {
        let evaluator = Evaluator::builder()
            .rule(TitlePresent)
            .rule(Silent)
            .build()
            .unwrap();

        let doc = page(None);
        let result = evaluator.evaluate(&doc, "", "https://example.test/");
        let title = result.rule_result("TITLE_1").unwrap();
        assert_eq!(title.summary().violations, 1);
        assert_eq!(title.results()[0].message(), "The page MUST have a non-empty title element.");
        assert!(result.rule_result("LANGUAGE_1").unwrap().summary().is_not_applicable());
        assert!(result.has_results_at_least(ResultKind::Violation));
        assert_eq!(result.url(), "https://example.test/");

        let doc = page(Some("Home"));
        let result = evaluator.evaluate(&doc, "", "");
        assert_eq!(result.title(), "Home");
        assert_eq!(result.summary().passed, 1);
        assert!(!result.has_results_at_least(ResultKind::Warning));
    }

    #[test]
    fn test_config_filters_and_overrides() {
        let config = Config::parse(
            r#"
disable = ["LANG*"]

[rules.TITLE_1]
required = false
"#,
        )
        .unwrap();
        let evaluator = Evaluator::builder()
            .rule(TitlePresent)
            .rule(Silent)
            .config(config)
            .build()
            .unwrap();
        let planned: Vec<_> = evaluator.planned_rules().collect();
        assert_eq!(planned, vec![("TITLE_1", false)]);

        let result = evaluator.evaluate(&page(None), "", "");
        assert_eq!(result.summary().warnings, 1);
    }

    #[test]
    fn test_builder_override_beats_config() {
        let config = Config::parse("[rules.TITLE_1]\nrequired = false\n").unwrap();
        let evaluator = Evaluator::builder()
            .rule(TitlePresent)
            .config(config)
            .required("TITLE_1", true)
            .build()
            .unwrap();
        assert_eq!(evaluator.planned_rules().next(), Some(("TITLE_1", true)));
    }

    #[test]
    fn test_inline_ruleset_orders_and_selects() {
        let config = Config::parse(
            r#"
[ruleset]
id = "META"
version = "1"

[[ruleset.rules]]
id = "LANGUAGE_1"
required = true

[[ruleset.rules]]
id = "TITLE_1"
enabled = false
"#,
        )
        .unwrap();
        let evaluator = Evaluator::builder()
            .rule(TitlePresent)
            .rule(Silent)
            .config(config)
            .build()
            .unwrap();
        let planned: Vec<_> = evaluator.planned_rules().collect();
        assert_eq!(planned, vec![("LANGUAGE_1", true)]);
        assert_eq!(evaluator.evaluate(&page(None), "", "").ruleset(), Some("META@1"));
    }

    #[test]
    fn test_unknown_rule_in_ruleset() {
        let config = Config::parse(
            "[ruleset]\nid = \"R\"\nversion = \"1\"\n[[ruleset.rules]]\nid = \"NOPE\"\n",
        )
        .unwrap();
        let err = Evaluator::builder()
            .rule(TitlePresent)
            .config(config)
            .build()
            .unwrap_err();
        assert!(matches!(err, EvaluatorError::Ruleset(LoadError::UnknownRule { .. })));
    }

    #[test]
    fn test_only_patterns_and_locale() {
        let evaluator = Evaluator::builder()
            .rule(TitlePresent)
            .rule(Silent)
            .only(["TITLE_*"])
            .build()
            .unwrap();
        assert_eq!(evaluator.rule_count(), 1);

        let config = Config::parse("locale = \"fr\"").unwrap();
        let err = Evaluator::builder().config(config).build().unwrap_err();
        assert!(matches!(err, EvaluatorError::UnknownLocale { .. }));

        let err = Evaluator::builder().only(["["]).build().unwrap_err();
        assert!(matches!(err, EvaluatorError::Glob(_)));
    }
}
