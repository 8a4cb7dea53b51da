//! Localized message catalogs and template rendering.
//!
//! A catalog is a JSON document keyed by rule id. Node messages may use
//! `%1`..`%n` for positional arguments and `%s` for the severity word
//! (`MUST`/`SHOULD`/`MAY`). Rule summary messages may use `%N_F` (failures),
//! `%N_V`, `%N_W`, `%N_MC`, `%N_P`, `%N_H` and `%N_T` (total).
//!
//! ```json
//! {
//!   "locale": "en-us",
//!   "rules": {
//!     "TITLE_1": {
//!       "summary": "Page must have a title",
//!       "node_result_messages": { "PAGE_FAIL_1": "Add a title element" }
//!     }
//!   }
//! }
//! ```

use crate::results::ResultsSummary;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

const EMBEDDED_EN: &str = include_str!("../messages/en.json");

/// Errors while loading a message catalog.
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum MessageError {
    /// The catalog file could not be read.
    #[error("Failed to read message catalog {path}: {source}")]
    #[diagnostic(code(a11y_eval::messages::io))]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// The catalog is not valid JSON of the expected shape.
    #[error("Failed to parse message catalog: {message}")]
    #[diagnostic(
        code(a11y_eval::messages::parse),
        help("catalogs map `rules.<RULE_ID>` to objects with `node_result_messages`")
    )]
    Parse {
        /// Parse error message.
        message: String,
    },
}

/// Severity words substituted for `%s`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeverityWords {
    /// Word for required rules.
    pub must: String,
    /// Word for recommended rules.
    pub should: String,
    /// Word for manual checks.
    pub may: String,
}

impl Default for SeverityWords {
    fn default() -> Self {
        Self {
            must: "MUST".to_string(),
            should: "SHOULD".to_string(),
            may: "MAY".to_string(),
        }
    }
}

/// Messages of one rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleMessages {
    /// One-line summary.
    pub summary: Option<String>,
    /// Why the rule matters.
    pub purpose: Vec<String>,
    /// How to satisfy the rule.
    pub techniques: Vec<String>,
    /// Rule-level result messages keyed by outcome.
    pub rule_result_messages: HashMap<String, String>,
    /// Node-level result messages keyed by message id.
    pub node_result_messages: HashMap<String, String>,
}

/// A locale's messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageCatalog {
    /// Locale tag (e.g., "en-us").
    pub locale: String,
    /// Words for `%s`.
    pub severity: SeverityWords,
    /// Fallback messages shared by all rules.
    pub common: RuleMessages,
    /// Messages per rule id.
    pub rules: HashMap<String, RuleMessages>,
}

impl MessageCatalog {
    /// Returns the built-in English catalog.
    #[must_use]
    pub fn embedded() -> Arc<Self> {
        static EMBEDDED: OnceLock<Arc<MessageCatalog>> = OnceLock::new();
        Arc::clone(EMBEDDED.get_or_init(|| {
            Arc::new(Self::from_json(EMBEDDED_EN).unwrap_or_else(|e| {
                tracing::warn!("Built-in message catalog is invalid: {}", e);
                Self::default()
            }))
        }))
    }

    /// Returns the built-in catalog for `locale`, if one exists.
    #[must_use]
    pub fn for_locale(locale: &str) -> Option<Arc<Self>> {
        let locale = locale.trim().to_ascii_lowercase();
        matches!(locale.as_str(), "en" | "en-us").then(Self::embedded)
    }

    /// Parses a catalog from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is invalid.
    pub fn from_json(json: &str) -> Result<Self, MessageError> {
        serde_json::from_str(json).map_err(|e| MessageError::Parse {
            message: e.to_string(),
        })
    }

    /// Loads a catalog from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, MessageError> {
        let content = std::fs::read_to_string(path).map_err(|e| MessageError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_json(&content)
    }

    /// Returns the messages of a rule.
    #[must_use]
    pub fn rule(&self, rule_id: &str) -> Option<&RuleMessages> {
        self.rules.get(rule_id)
    }

    /// Returns a node result template, falling back to the common messages.
    #[must_use]
    pub fn node_message(&self, rule_id: &str, message_id: &str) -> Option<&str> {
        self.rule(rule_id)
            .and_then(|r| r.node_result_messages.get(message_id))
            .or_else(|| self.common.node_result_messages.get(message_id))
            .map(String::as_str)
    }

    /// Returns a rule result template, falling back to the common messages.
    #[must_use]
    pub fn rule_message(&self, rule_id: &str, key: &str) -> Option<&str> {
        self.rule(rule_id)
            .and_then(|r| r.rule_result_messages.get(key))
            .or_else(|| self.common.rule_result_messages.get(key))
            .map(String::as_str)
    }

    /// Returns the summary line of a rule.
    #[must_use]
    pub fn summary(&self, rule_id: &str) -> Option<&str> {
        self.rule(rule_id).and_then(|r| r.summary.as_deref())
    }
}

/// Placeholder rendered when a template is missing.
#[must_use]
pub fn missing_message(message_id: &str) -> String {
    format!("missing message: {message_id}")
}

/// Replaces `%` tokens in `template` using `lookup`.
///
/// Recognized tokens are `%s`, `%<digits>` and `%N_<LETTERS>`. Unknown or
/// unresolved tokens are left in place.
fn substitute(template: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(pos) = rest.find('%') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];
        let token_len = if after.starts_with('s') {
            1
        } else if after.starts_with(|c: char| c.is_ascii_digit()) {
            after
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(after.len())
        } else if let Some(name) = after.strip_prefix("N_") {
            let letters = name
                .find(|c: char| !c.is_ascii_uppercase())
                .unwrap_or(name.len());
            if letters == 0 {
                0
            } else {
                2 + letters
            }
        } else {
            0
        };

        let token = &after[..token_len];
        match (token_len > 0).then(|| lookup(token)).flatten() {
            Some(value) => out.push_str(&value),
            None => {
                out.push('%');
                out.push_str(token);
            }
        }
        rest = &after[token_len..];
    }
    out.push_str(rest);
    out
}

/// Renders a node message: `%1`..`%n` become `args`, `%s` becomes `severity`.
#[must_use]
pub fn render(template: &str, args: &[String], severity: &str) -> String {
    substitute(template, |token| {
        if token == "s" {
            return Some(severity.to_string());
        }
        let index = token.parse::<usize>().ok()?;
        args.get(index.checked_sub(1)?).cloned()
    })
}

/// Renders a rule summary message with `%N_*` counts.
#[must_use]
pub fn render_summary(template: &str, summary: &ResultsSummary) -> String {
    substitute(template, |token| {
        let n = match token {
            "N_F" => summary.violations + summary.warnings,
            "N_V" => summary.violations,
            "N_W" => summary.warnings,
            "N_MC" => summary.manual_checks,
            "N_P" => summary.passed,
            "N_H" => summary.hidden,
            "N_T" => summary.total(),
            _ => return None,
        };
        Some(n.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_string()).collect()
    }

    #[test]
    fn renders_positional_arguments_and_severity() {
        let out = render("Element %1 %s have %2 (see %1).", &args(&["img", "alt"]), "MUST");
        assert_eq!(out, "Element img MUST have alt (see img).");
    }

    #[test]
    fn multi_digit_and_missing_arguments_are_left_in_place() {
        let many: Vec<String> = (1..=10).map(|i| format!("a{i}")).collect();
        assert_eq!(render("%10-%1", &many, "MAY"), "a10-a1");
        assert_eq!(render("%3 and 100%", &args(&["x"]), "MAY"), "%3 and 100%");
        assert_eq!(render("%0", &args(&["x"]), "MAY"), "%0");
    }

    #[test]
    fn rendering_is_idempotent() {
        let template = "Change %1 to %2: %s";
        let a = args(&["x", "y"]);
        let once = render(template, &a, "SHOULD");
        assert_eq!(once, render(template, &a, "SHOULD"));
        assert_eq!(render(&once, &a, "SHOULD"), "Change x to y: SHOULD");
    }

    #[test]
    fn renders_summary_counts() {
        let summary = ResultsSummary {
            violations: 2,
            warnings: 1,
            manual_checks: 4,
            passed: 5,
            hidden: 6,
        };
        insta::assert_snapshot!(
            render_summary("%N_F failed, %N_P passed, %N_MC to check, %N_H hidden of %N_T (%N_X)", &summary),
            @"3 failed, 5 passed, 4 to check, 6 hidden of 18 (%N_X)"
        );
    }

    #[test]
    fn embedded_catalog_has_every_section() {
        let catalog = MessageCatalog::embedded();
        assert_eq!(catalog.locale, "en-us");
        assert_eq!(catalog.severity.must, "MUST");
        assert!(catalog.rule_message("HEADING_1", "NOT_APPLICABLE").is_some());
        assert!(catalog.node_message("HEADING_1", "PAGE_FAIL_1").is_some());
        assert!(catalog.summary("COLOR_1").is_some());
        assert!(MessageCatalog::for_locale("EN-US").is_some());
        assert!(MessageCatalog::for_locale("fr").is_none());
    }

    #[test]
    fn parse_error_is_reported() {
        let err = MessageCatalog::from_json("{").unwrap_err();
        assert!(matches!(err, MessageError::Parse { .. }));
    }
}
