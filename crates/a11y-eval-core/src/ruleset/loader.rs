//! DTO → Domain model conversion with validation.

use super::config_dto::{RuleMappingDto, RulesetDto};
use super::model::{ModelError, RuleMapping, Ruleset, RulesetId, RulesetVersion};
use crate::catalog::RuleCatalog;

/// Errors during DTO → Domain conversion.
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum LoadError {
    /// A required field is absent.
    #[error("{context}: missing required field `{field}`")]
    #[diagnostic(code(a11y_eval::ruleset::missing_field))]
    MissingField {
        /// Where the field was expected (e.g., "rules[2]").
        context: String,
        /// The field name.
        field: &'static str,
    },

    /// A field-level validation error.
    #[error("{context}: {source}")]
    #[diagnostic(code(a11y_eval::ruleset::invalid))]
    Validation {
        /// Where the error occurred (e.g., "ruleset.id").
        context: String,
        /// The underlying model error.
        source: ModelError,
    },

    /// A mapping names a rule the catalog does not have.
    #[error("{context}: unknown rule `{rule_id}`")]
    #[diagnostic(
        code(a11y_eval::ruleset::unknown_rule),
        help("run `a11y-eval list-rules` to see the available rule ids")
    )]
    UnknownRule {
        /// Where the reference was found.
        context: String,
        /// The unknown id.
        rule_id: String,
    },

    /// Cross-reference errors from aggregate root construction.
    #[error("ruleset validation errors:\n{}", format_errors(.0))]
    #[diagnostic(code(a11y_eval::ruleset::cross_ref))]
    CrossRef(Vec<ModelError>),
}

fn format_errors(errors: &[ModelError]) -> String {
    errors
        .iter()
        .map(|e| format!("  - {e}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Converts a `RulesetDto` to a validated `Ruleset`, checking every mapped
/// rule id against `catalog`.
///
/// # Errors
///
/// Returns the first field error, or all duplicate mappings at once.
pub fn load(dto: RulesetDto, catalog: &RuleCatalog) -> Result<Ruleset, LoadError> {
    let raw_id = dto.id.ok_or_else(|| LoadError::MissingField {
        context: "ruleset".to_string(),
        field: "id",
    })?;
    let id = RulesetId::new(raw_id.trim()).map_err(|e| LoadError::Validation {
        context: "ruleset.id".to_string(),
        source: e,
    })?;

    let raw_version = dto.version.ok_or_else(|| LoadError::MissingField {
        context: format!("ruleset '{id}'"),
        field: "version",
    })?;
    let version = RulesetVersion::new(raw_version.trim()).map_err(|e| LoadError::Validation {
        context: format!("ruleset '{id}'.version"),
        source: e,
    })?;

    let rules = dto
        .rules
        .into_iter()
        .enumerate()
        .map(|(i, m)| convert_mapping(m, i, catalog))
        .collect::<Result<Vec<_>, _>>()?;

    tracing::debug!("Loaded ruleset {}@{} with {} rule(s)", id, version, rules.len());
    Ruleset::new(id, version, dto.name, rules).map_err(LoadError::CrossRef)
}

fn convert_mapping(
    dto: RuleMappingDto,
    index: usize,
    catalog: &RuleCatalog,
) -> Result<RuleMapping, LoadError> {
    let ctx = format!("rules[{index}]");
    let rule_id = dto
        .id
        .map(|id| id.trim().to_string())
        .ok_or_else(|| LoadError::MissingField {
            context: ctx.clone(),
            field: "id",
        })?;
    if rule_id.is_empty() {
        return Err(LoadError::Validation {
            context: format!("{ctx}.id"),
            source: ModelError::EmptyRuleId,
        });
    }
    if !catalog.contains(&rule_id) {
        return Err(LoadError::UnknownRule {
            context: ctx,
            rule_id,
        });
    }
    Ok(RuleMapping::new(
        rule_id,
        dto.required,
        dto.enabled.unwrap_or(true),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::DomCache;
    use crate::results::RuleResult;
    use crate::rule::{Rule, RuleCategory, RuleScope};

    struct Stub(&'static str);

    impl Rule for Stub {
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

    fn catalog() -> RuleCatalog {
        let mut catalog = RuleCatalog::new();
        catalog.register_rule(Stub("TITLE_1")).unwrap();
        catalog.register_rule(Stub("LANGUAGE_1")).unwrap();
        catalog
    }

    fn parse_and_load(toml_str: &str) -> Result<Ruleset, LoadError> {
        let dto: RulesetDto = toml::from_str(toml_str).unwrap();
        load(dto, &catalog())
    }

    // -- Happy path --

    #[test]
    fn load_full_ruleset() {
        let ruleset = parse_and_load(
            r#"
id = "PAGE"
version = "1.0"
name = "Page metadata"

[[rules]]
id = "TITLE_1"

[[rules]]
id = "LANGUAGE_1"
required = false
enabled = false
"#,
        )
        .unwrap();
        assert_eq!(ruleset.identity(), "PAGE@1.0");
        assert_eq!(ruleset.rules().len(), 2);
        assert!(ruleset.rules()[0].enabled());
        assert!(!ruleset.rules()[1].enabled());
    }

    // -- Error cases --

    #[test]
    fn load_rejects_missing_id_and_version() {
        assert!(matches!(
            parse_and_load("version = \"1\""),
            Err(LoadError::MissingField { field: "id", .. })
        ));
        assert!(matches!(
            parse_and_load("id = \"R\""),
            Err(LoadError::MissingField { field: "version", .. })
        ));
    }

    #[test]
    fn load_rejects_invalid_id() {
        let result = parse_and_load("id = \"bad id\"\nversion = \"1\"");
        assert!(matches!(
            result,
            Err(LoadError::Validation {
                source: ModelError::InvalidRulesetId { .. },
                ..
            })
        ));
    }

    #[test]
    fn load_rejects_unknown_rule() {
        let result = parse_and_load(
            r#"
id = "R"
version = "1"

[[rules]]
id = "NOPE_1"
"#,
        );
        match result {
            Err(LoadError::UnknownRule { context, rule_id }) => {
                assert_eq!(context, "rules[0]");
                assert_eq!(rule_id, "NOPE_1");
            }
            other => panic!("expected UnknownRule, got {other:?}"),
        }
    }

    #[test]
    fn load_rejects_mapping_without_id() {
        let result = parse_and_load(
            r#"
id = "R"
version = "1"

[[rules]]
required = true
"#,
        );
        assert!(matches!(result, Err(LoadError::MissingField { field: "id", .. })));
    }

    #[test]
    fn load_rejects_duplicates() {
        let result = parse_and_load(
            r#"
id = "R"
version = "1"

[[rules]]
id = "TITLE_1"

[[rules]]
id = "TITLE_1"
"#,
        );
        let Err(LoadError::CrossRef(errors)) = result else {
            panic!("expected CrossRef");
        };
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("TITLE_1"));
    }
}
