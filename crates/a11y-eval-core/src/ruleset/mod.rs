//! Declarative rulesets driven by TOML configuration.
//!
//! A ruleset selects rules from the catalog, in order, and may override
//! whether each one is required.
//!
//! # Architecture
//!
//! ```text
//! TOML text
//!   ↓ serde (DTO layer)
//! config_dto types
//!   ↓ validate + convert (against the rule catalog)
//! Ruleset (pure domain model)
//! ```

pub mod config_dto;
pub mod loader;
pub mod model;

pub use loader::LoadError;
pub use model::{ModelError, RuleMapping, Ruleset, RulesetId, RulesetVersion};

use crate::catalog::RuleCatalog;

/// Errors from parsing TOML and loading a ruleset.
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum LoadRulesetError {
    /// The ruleset file could not be read.
    #[error("Failed to read ruleset {path}: {source}")]
    #[diagnostic(code(a11y_eval::ruleset::io))]
    Io {
        /// Path that failed to read.
        path: std::path::PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// TOML deserialization failed.
    #[error("TOML parse error: {0}")]
    #[diagnostic(code(a11y_eval::ruleset::toml))]
    Toml(#[from] toml::de::Error),

    /// Domain model validation failed.
    #[error("{0}")]
    #[diagnostic(transparent)]
    Load(#[from] LoadError),
}

/// Parses TOML content into a ruleset validated against `catalog`.
///
/// # Errors
///
/// Returns an error if TOML parsing or model validation fails.
pub fn load_ruleset_from_toml(
    content: &str,
    catalog: &RuleCatalog,
) -> Result<Ruleset, LoadRulesetError> {
    let dto: config_dto::RulesetDto = toml::from_str(content)?;
    Ok(loader::load(dto, catalog)?)
}

/// Reads and loads a ruleset file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, or on the errors of
/// [`load_ruleset_from_toml`].
pub fn load_ruleset_from_file(
    path: &std::path::Path,
    catalog: &RuleCatalog,
) -> Result<Ruleset, LoadRulesetError> {
    let content = std::fs::read_to_string(path).map_err(|e| LoadRulesetError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    load_ruleset_from_toml(&content, catalog)
}
