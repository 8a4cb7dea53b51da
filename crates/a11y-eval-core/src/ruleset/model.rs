//! Pure domain model for rulesets.
//!
//! This module contains no serde and no I/O dependencies.
//! All invariants are enforced at construction time via validated newtypes.

use std::collections::HashSet;
use std::fmt;

// ────────────────────────────────────────────
// Newtypes with validation
// ────────────────────────────────────────────

/// A validated ruleset id (non-empty, `[A-Za-z0-9_.-]` only).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RulesetId(String);

impl RulesetId {
    /// Creates a new ruleset id.
    ///
    /// # Errors
    ///
    /// Returns error if the id is empty or contains invalid characters.
    pub fn new(id: &str) -> Result<Self, ModelError> {
        if id.is_empty() {
            return Err(ModelError::EmptyRulesetId);
        }
        if !id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        {
            return Err(ModelError::InvalidRulesetId { id: id.to_string() });
        }
        Ok(Self(id.to_string()))
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RulesetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A validated ruleset version (non-empty, no whitespace).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RulesetVersion(String);

impl RulesetVersion {
    /// Creates a new version.
    ///
    /// # Errors
    ///
    /// Returns error if the version is empty or contains whitespace.
    pub fn new(version: &str) -> Result<Self, ModelError> {
        if version.is_empty() {
            return Err(ModelError::EmptyVersion);
        }
        if version.chars().any(char::is_whitespace) {
            return Err(ModelError::InvalidVersion {
                version: version.to_string(),
            });
        }
        Ok(Self(version.to_string()))
    }

    /// Returns the version as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RulesetVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ────────────────────────────────────────────
// Entities
// ────────────────────────────────────────────

/// Mapping of one catalog rule into a ruleset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleMapping {
    rule_id: String,
    required: Option<bool>,
    enabled: bool,
}

impl RuleMapping {
    /// Creates a mapping.
    #[must_use]
    pub fn new(rule_id: String, required: Option<bool>, enabled: bool) -> Self {
        Self {
            rule_id,
            required,
            enabled,
        }
    }

    /// The mapped rule id.
    #[must_use]
    pub fn rule_id(&self) -> &str {
        &self.rule_id
    }

    /// Requirement override.
    #[must_use]
    pub fn required(&self) -> Option<bool> {
        self.required
    }

    /// Whether the rule runs.
    #[must_use]
    pub fn enabled(&self) -> bool {
        self.enabled
    }
}

// ────────────────────────────────────────────
// Aggregate root
// ────────────────────────────────────────────

/// A validated ruleset: an identified, versioned selection of rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ruleset {
    id: RulesetId,
    version: RulesetVersion,
    name: Option<String>,
    rules: Vec<RuleMapping>,
}

impl Ruleset {
    /// Creates a ruleset.
    ///
    /// # Errors
    ///
    /// Returns every rule id that is mapped more than once.
    pub fn new(
        id: RulesetId,
        version: RulesetVersion,
        name: Option<String>,
        rules: Vec<RuleMapping>,
    ) -> Result<Self, Vec<ModelError>> {
        let errors: Vec<ModelError> = {
            let mut seen = HashSet::new();
            let mut reported = HashSet::new();
            rules
                .iter()
                .filter(|m| !seen.insert(m.rule_id.as_str()))
                .filter(|m| reported.insert(m.rule_id.as_str()))
                .map(|m| ModelError::DuplicateRule {
                    rule_id: m.rule_id.clone(),
                })
                .collect()
        };
        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(Self {
            id,
            version,
            name,
            rules,
        })
    }

    /// Ruleset id.
    #[must_use]
    pub fn id(&self) -> &RulesetId {
        &self.id
    }

    /// Ruleset version.
    #[must_use]
    pub fn version(&self) -> &RulesetVersion {
        &self.version
    }

    /// Human-readable name.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Mappings in evaluation order.
    #[must_use]
    pub fn rules(&self) -> &[RuleMapping] {
        &self.rules
    }

    /// Mapping of a rule.
    #[must_use]
    pub fn mapping(&self, rule_id: &str) -> Option<&RuleMapping> {
        self.rules.iter().find(|m| m.rule_id == rule_id)
    }

    /// `id@version`.
    #[must_use]
    pub fn identity(&self) -> String {
        format!("{}@{}", self.id, self.version)
    }
}

// ────────────────────────────────────────────
// Errors
// ────────────────────────────────────────────

/// Domain model validation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// Ruleset id is empty.
    #[error("ruleset id must not be empty")]
    EmptyRulesetId,

    /// Ruleset id contains invalid characters.
    #[error("invalid ruleset id `{id}`: must be [A-Za-z0-9_.-]")]
    InvalidRulesetId {
        /// The invalid id.
        id: String,
    },

    /// Version is empty.
    #[error("ruleset version must not be empty")]
    EmptyVersion,

    /// Version contains whitespace.
    #[error("invalid ruleset version `{version}`: must not contain whitespace")]
    InvalidVersion {
        /// The invalid version.
        version: String,
    },

    /// Rule id is empty.
    #[error("rule id must not be empty")]
    EmptyRuleId,

    /// A rule is mapped more than once.
    #[error("rule `{rule_id}` is mapped more than once")]
    DuplicateRule {
        /// The duplicated rule id.
        rule_id: String,
    },
}

// ────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────
