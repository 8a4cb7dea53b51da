//! Finds the `a11y-eval.toml` that applies to a snapshot path.
//!
//! Snapshots usually sit a few directories below the site root, so the
//! project config is the nearest `a11y-eval.toml` (or `.a11y-eval.toml`)
//! in the start directory or any ancestor. `--config` overrides the
//! search; `~/.a11y-eval/config.toml` is used when no ancestor has one.

use a11y_eval_core::Config;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Project config file names, preferred first within one directory.
const PROJECT_CONFIG_NAMES: &[&str] = &["a11y-eval.toml", ".a11y-eval.toml"];

/// Environment variable overriding the global config directory.
const CONFIG_DIR_ENV: &str = "A11Y_EVAL_CONFIG_DIR";

/// Where the configuration comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Given with `--config`.
    Explicit(PathBuf),
    /// Nearest project config above the evaluated path.
    Project(PathBuf),
    /// User-wide config.
    Global(PathBuf),
    /// Built-in defaults.
    Default,
}

impl ConfigSource {
    /// Config file path, `None` for defaults.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Explicit(p) | Self::Project(p) | Self::Global(p) => Some(p),
            Self::Default => None,
        }
    }

    /// Loads the configuration this source points at.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is invalid.
    pub fn load(&self) -> Result<Config> {
        let Some(path) = self.path() else {
            return Ok(Config::default());
        };
        if let Self::Global(_) = self {
            tracing::info!("Using global config: {}", path.display());
        }
        Config::from_file(path).with_context(|| format!("Failed to load config: {}", path.display()))
    }
}

/// Resolves the configuration for evaluations started at `start`.
#[must_use]
pub fn resolve(start: &Path, explicit: Option<&Path>) -> ConfigSource {
    let global = std::env::var_os(CONFIG_DIR_ENV)
        .map(PathBuf::from)
        .or_else(|| home::home_dir().map(|h| h.join(".a11y-eval")));
    resolve_with(start, explicit, global.as_deref())
}

fn resolve_with(start: &Path, explicit: Option<&Path>, global_dir: Option<&Path>) -> ConfigSource {
    if let Some(path) = explicit {
        return ConfigSource::Explicit(path.to_path_buf());
    }
    if let Some(path) = nearest_project_config(start) {
        tracing::debug!("Found project config: {}", path.display());
        return ConfigSource::Project(path);
    }
    global_dir
        .map(|dir| dir.join("config.toml"))
        .filter(|path| path.is_file())
        .map_or(ConfigSource::Default, ConfigSource::Global)
}

/// First project config found walking from `start` up to the filesystem root.
fn nearest_project_config(start: &Path) -> Option<PathBuf> {
    let start = start.canonicalize().unwrap_or_else(|_| start.to_path_buf());
    start.ancestors().find_map(|dir| {
        PROJECT_CONFIG_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|candidate| candidate.is_file())
    })
}
