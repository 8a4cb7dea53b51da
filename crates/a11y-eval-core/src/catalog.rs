//! Registry of rules keyed by id.

use crate::rule::{Rule, RuleBox, RuleRef};
use std::collections::HashMap;
use std::sync::Arc;

/// Errors while registering rules.
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum CatalogError {
    /// Two rules share an id.
    #[error("Rule `{id}` is already registered")]
    #[diagnostic(code(a11y_eval::catalog::duplicate_rule))]
    DuplicateRule {
        /// The conflicting id.
        id: String,
    },
}

/// A flat registry of rules in registration order.
///
/// The catalog is filled once at startup and only read afterwards, so a
/// single instance can be shared between concurrent evaluations.
#[derive(Default, Clone)]
pub struct RuleCatalog {
    rules: Vec<RuleRef>,
    index: HashMap<&'static str, usize>,
}

impl RuleCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a rule.
    ///
    /// # Errors
    ///
    /// Returns an error if a rule with the same id is already registered.
    pub fn register(&mut self, rule: RuleBox) -> Result<(), CatalogError> {
        let id = rule.id();
        if self.index.contains_key(id) {
            return Err(CatalogError::DuplicateRule { id: id.to_string() });
        }
        self.index.insert(id, self.rules.len());
        self.rules.push(Arc::from(rule));
        Ok(())
    }

    /// Registers a rule value.
    ///
    /// # Errors
    ///
    /// Returns an error if a rule with the same id is already registered.
    pub fn register_rule<R: Rule + 'static>(&mut self, rule: R) -> Result<(), CatalogError> {
        self.register(Box::new(rule))
    }

    /// Returns a rule by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&RuleRef> {
        self.index.get(id).and_then(|i| self.rules.get(*i))
    }

    /// Returns `true` when a rule with `id` is registered.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Iterates rules in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &RuleRef> {
        self.rules.iter()
    }

    /// Returns the number of registered rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns `true` when no rule is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl std::fmt::Debug for RuleCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.rules.iter().map(|r| r.id()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::DomCache;
    use crate::results::RuleResult;
    use crate::rule::{RuleCategory, RuleScope};

    struct Named(&'static str);

    impl Rule for Named {
        fn id(&self) -> &'static str {
            self.0
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
            &[]
        }
        fn validate(&self, _cache: &DomCache, _result: &mut RuleResult) {}
    }

    #[test]
    fn registers_in_order_and_rejects_duplicates() {
        let mut catalog = RuleCatalog::new();
        catalog.register_rule(Named("B_1")).unwrap();
        catalog.register_rule(Named("A_1")).unwrap();
        let err = catalog.register_rule(Named("B_1")).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateRule { ref id } if id == "B_1"));

        let ids: Vec<_> = catalog.iter().map(|r| r.id()).collect();
        assert_eq!(ids, vec!["B_1", "A_1"]);
        assert!(catalog.contains("A_1"));
        assert_eq!(catalog.get("A_1").map(|r| r.id()), Some("A_1"));
        assert_eq!(catalog.len(), 2);
    }
}
