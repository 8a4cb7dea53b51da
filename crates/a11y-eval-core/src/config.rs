//! Configuration types for a11y-eval.

use crate::results::ResultKind;
use crate::ruleset::config_dto::RulesetDto;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Top-level configuration, usually read from `a11y-eval.toml`.
///
/// ```toml
/// preset = "recommended"
/// fail_on = "violation"
/// disable = ["COLOR_*"]
///
/// [evaluator]
/// max_depth = 128
///
/// [rules.LINK_3]
/// required = true
/// min_size = 24
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Preset to use ("recommended", "strict", "minimal").
    #[serde(default)]
    pub preset: Option<String>,

    /// Locale of the message catalog (default: "en-us").
    #[serde(default)]
    pub locale: Option<String>,

    /// Path to a message catalog JSON file, overriding `locale`.
    #[serde(default)]
    pub messages: Option<PathBuf>,

    /// Least severe result kind that fails a run (default: "violation").
    #[serde(default)]
    pub fail_on: Option<String>,

    /// Glob patterns over rule ids to disable (e.g., `"COLOR_*"`).
    #[serde(default)]
    pub disable: Vec<String>,

    /// Evaluator configuration.
    #[serde(default)]
    pub evaluator: EvaluatorConfig,

    /// Per-rule configurations keyed by rule id.
    #[serde(default)]
    pub rules: HashMap<String, RuleConfig>,

    /// Inline declarative ruleset.
    #[serde(default, skip_serializing)]
    pub ruleset: Option<RulesetDto>,
}

impl Config {
    /// Creates a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid, a `disable` pattern is not a
    /// valid glob, or `fail_on` names no result kind.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.disabled_patterns()?;
        self.fail_threshold()?;
        Ok(())
    }

    fn disabled_patterns(&self) -> Result<Vec<glob::Pattern>, ConfigError> {
        self.disable
            .iter()
            .map(|p| {
                glob::Pattern::new(p).map_err(|e| ConfigError::InvalidPattern {
                    pattern: p.clone(),
                    reason: e.to_string(),
                })
            })
            .collect()
    }

    /// Checks if a rule is enabled.
    ///
    /// A rule is disabled by `[rules.ID] enabled = false` or by matching a
    /// `disable` pattern; an explicit `enabled = true` wins over patterns.
    #[must_use]
    pub fn is_rule_enabled(&self, rule_id: &str) -> bool {
        if let Some(enabled) = self.rules.get(rule_id).and_then(|c| c.enabled) {
            return enabled;
        }
        !self
            .disabled_patterns()
            .unwrap_or_default()
            .iter()
            .any(|p| p.matches(rule_id))
    }

    /// Gets the "required" override for a rule.
    #[must_use]
    pub fn rule_required(&self, rule_id: &str) -> Option<bool> {
        self.rules.get(rule_id).and_then(|c| c.required)
    }

    /// Gets the configuration of a rule.
    #[must_use]
    pub fn rule(&self, rule_id: &str) -> Option<&RuleConfig> {
        self.rules.get(rule_id)
    }

    /// Least severe result kind that fails a run.
    ///
    /// # Errors
    ///
    /// Returns an error if `fail_on` names no result kind.
    pub fn fail_threshold(&self) -> Result<ResultKind, ConfigError> {
        match &self.fail_on {
            None => Ok(ResultKind::Violation),
            Some(value) => ResultKind::parse(value).ok_or_else(|| ConfigError::InvalidFailOn {
                value: value.clone(),
            }),
        }
    }
}

/// Evaluator-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluatorConfig {
    /// Maximum element nesting depth traversed.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Include passed and hidden results in reports.
    #[serde(default)]
    pub include_passed: bool,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            include_passed: false,
        }
    }
}

fn default_max_depth() -> usize {
    crate::cache::DEFAULT_MAX_DEPTH
}

/// Per-rule configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Whether this rule is enabled.
    #[serde(default)]
    pub enabled: Option<bool>,

    /// Whether failures are violations (`true`) or warnings (`false`).
    #[serde(default)]
    pub required: Option<bool>,

    /// Rule-specific options as key-value pairs.
    #[serde(flatten)]
    pub options: HashMap<String, toml::Value>,
}

impl RuleConfig {
    /// Gets an option value as a specific type.
    #[must_use]
    pub fn get_option<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.options
            .get(key)
            .and_then(|v| v.clone().try_into().ok())
    }

    /// Gets a numeric option with a default value; integers are accepted.
    #[must_use]
    pub fn get_f64(&self, key: &str, default: f64) -> f64 {
        self.options
            .get(key)
            .and_then(|v| match v {
                toml::Value::Float(f) => Some(*f),
                #[allow(clippy::cast_precision_loss)]
                toml::Value::Integer(i) => Some(*i as f64),
                _ => None,
            })
            .unwrap_or(default)
    }

    /// Gets an integer option with a default value.
    #[must_use]
    pub fn get_int(&self, key: &str, default: i64) -> i64 {
        self.options
            .get(key)
            .and_then(toml::Value::as_integer)
            .unwrap_or(default)
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("Failed to read config file {path}: {source}")]
    #[diagnostic(code(a11y_eval::config::io))]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Parse error in config file.
    #[error("Failed to parse config: {message}")]
    #[diagnostic(code(a11y_eval::config::parse))]
    Parse {
        /// Parse error message.
        message: String,
    },

    /// A `disable` entry is not a valid glob.
    #[error("invalid rule pattern `{pattern}`: {reason}")]
    #[diagnostic(
        code(a11y_eval::config::invalid_pattern),
        help("patterns match rule ids, e.g. \"COLOR_*\" or \"HEADING_[45]\"")
    )]
    InvalidPattern {
        /// The invalid pattern.
        pattern: String,
        /// Why it's invalid.
        reason: String,
    },

    /// `fail_on` names no result kind.
    #[error("unknown fail_on value `{value}`")]
    #[diagnostic(
        code(a11y_eval::config::invalid_fail_on),
        help("expected one of: violation, warning, manual_check")
    )]
    InvalidFailOn {
        /// The invalid value.
        value: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.evaluator.max_depth, 256);
        assert!(config.rules.is_empty());
        assert_eq!(config.fail_threshold().unwrap(), ResultKind::Violation);
        assert!(config.is_rule_enabled("COLOR_1"));
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
preset = "strict"
fail_on = "warning"
disable = ["COLOR_*"]

[evaluator]
max_depth = 64

[rules.COLOR_2]
enabled = true

[rules.LINK_3]
required = true
min_size = 24
"#;

        let config = Config::parse(toml).expect("Failed to parse");
        assert_eq!(config.preset.as_deref(), Some("strict"));
        assert_eq!(config.evaluator.max_depth, 64);
        assert_eq!(config.fail_threshold().unwrap(), ResultKind::Warning);
        assert!(!config.is_rule_enabled("COLOR_1"));
        assert!(config.is_rule_enabled("COLOR_2"));
        assert!(config.is_rule_enabled("LINK_3"));
        assert_eq!(config.rule_required("LINK_3"), Some(true));

        let rule_config = config.rule("LINK_3").unwrap();
        assert!((rule_config.get_f64("min_size", 12.0) - 24.0).abs() < f64::EPSILON);
        assert_eq!(rule_config.get_int("missing", 7), 7);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(matches!(
            Config::parse("disable = [\"[\"]"),
            Err(ConfigError::InvalidPattern { .. })
        ));
        assert!(matches!(
            Config::parse("fail_on = \"sometimes\""),
            Err(ConfigError::InvalidFailOn { .. })
        ));
        assert!(matches!(
            Config::parse("preset = "),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_inline_ruleset_is_parsed() {
        let config = Config::parse(
            r#"
[ruleset]
id = "WCAG21_AA"
version = "1.0"

[[ruleset.rules]]
id = "TITLE_1"
"#,
        )
        .unwrap();
        let ruleset = config.ruleset.unwrap();
        assert_eq!(ruleset.id.as_deref(), Some("WCAG21_AA"));
        assert_eq!(ruleset.rules.len(), 1);
    }
}
