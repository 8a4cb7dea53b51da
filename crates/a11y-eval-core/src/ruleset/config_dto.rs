//! TOML deserialization types (DTO layer).
//!
//! These types exist solely for serde deserialization.
//! They are converted to domain model types via the loader.

use serde::Deserialize;

/// Raw TOML representation of a ruleset.
///
/// Required fields are optional here so that their absence is reported by
/// the loader with context rather than as a bare TOML error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RulesetDto {
    /// Ruleset id (e.g., "WCAG21_AA").
    #[serde(default)]
    pub id: Option<String>,
    /// Ruleset version (e.g., "1.0").
    #[serde(default)]
    pub version: Option<String>,
    /// Human-readable name.
    #[serde(default)]
    pub name: Option<String>,
    /// Rule mappings in evaluation order.
    #[serde(default)]
    pub rules: Vec<RuleMappingDto>,
}

/// TOML representation of one rule mapping.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RuleMappingDto {
    /// Rule id (e.g., "COLOR_1").
    #[serde(default)]
    pub id: Option<String>,
    /// Whether failures are violations (default: the rule's own default).
    #[serde(default)]
    pub required: Option<bool>,
    /// Whether the rule runs (default: true).
    #[serde(default)]
    pub enabled: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_empty() {
        let dto: RulesetDto = toml::from_str("").unwrap();
        assert!(dto.id.is_none());
        assert!(dto.rules.is_empty());
    }

    #[test]
    fn deserialize_full_ruleset() {
        let toml_str = r#"
id = "WCAG21_AA"
version = "2.1"
name = "WCAG 2.1 Level AA"

[[rules]]
id = "COLOR_1"
required = true

[[rules]]
id = "COLOR_2"
enabled = false
"#;
        let dto: RulesetDto = toml::from_str(toml_str).unwrap();
        assert_eq!(dto.version.as_deref(), Some("2.1"));
        assert_eq!(dto.rules.len(), 2);
        assert_eq!(dto.rules[0].required, Some(true));
        assert_eq!(dto.rules[1].enabled, Some(false));
    }
}
