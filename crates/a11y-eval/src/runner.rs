//! Snapshot checks for `cargo test` integration.

use a11y_eval_core::{Config, EvaluationResult, Evaluator, ResultKind, SnapshotNode};
use a11y_eval_rules::Preset;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

/// Config file names to search for, in priority order.
const CONFIG_CANDIDATES: &[&str] = &["a11y-eval.toml", ".a11y-eval.toml"];

/// Evaluates a snapshot JSON file as part of `cargo test`.
///
/// Relative paths resolve against the workspace root. `preset` and
/// `fail_on` override the values of the project's `a11y-eval.toml`.
///
/// # Panics
///
/// Panics with a formatted report if results at or above `fail_on` are
/// found, or if the snapshot, the configuration or the evaluator cannot be
/// loaded.
pub fn check_snapshot(snapshot: &str, preset: Option<&str>, fail_on: Option<&str>) {
    let root = find_project_root();
    let config = parse_config(&read_config_content(&root));

    let effective_preset = resolve_preset(preset, &config);
    let effective_fail_on = resolve_fail_on(fail_on, &config);

    let path = resolve_path(&root, snapshot);
    let json = std::fs::read_to_string(&path).unwrap_or_else(|e| {
        panic!("a11y-eval: failed to read snapshot {}: {e}", path.display());
    });
    let page = SnapshotNode::from_json(&json).unwrap_or_else(|e| {
        panic!("a11y-eval: invalid snapshot {}: {e}", path.display());
    });

    let evaluator = effective_preset
        .apply(Evaluator::builder(), &config)
        .config(config)
        .build()
        .unwrap_or_else(|e| panic!("a11y-eval: failed to build evaluator: {e}"));

    let result = evaluator.evaluate(&page, "", &path.display().to_string());
    if result.has_results_at_least(effective_fail_on) {
        panic!("{}", format_test_report(&result, effective_fail_on));
    }
}

/// Lists every result at or above `threshold`, grouped by rule.
fn format_test_report(result: &EvaluationResult, threshold: ResultKind) -> String {
    let mut out = format!(
        "a11y-eval: {} ({})\n",
        if result.url().is_empty() { "<page>" } else { result.url() },
        result.summary()
    );
    for rule in result.rule_results() {
        let failing: Vec<_> = rule
            .results()
            .iter()
            .filter(|e| e.kind().is_at_least(threshold))
            .collect();
        if failing.is_empty() {
            continue;
        }
        let _ = writeln!(out, "\n  {} [{}]", rule.rule_id(), rule.wcag_primary_id());
        for element in failing {
            let label = element
                .node()
                .and_then(|n| result.dom_element(n))
                .map_or_else(|| "page".to_string(), |e| e.label());
            let _ = writeln!(out, "    {}: {} {}", element.kind(), label, element.message());
        }
    }
    out
}

fn resolve_path(root: &Path, path: &str) -> PathBuf {
    if Path::new(path).is_absolute() {
        PathBuf::from(path)
    } else {
        root.join(path)
    }
}

/// Reads the raw TOML content of the first config file found in `root`.
///
/// Returns an empty string if no config file is found.
fn read_config_content(root: &Path) -> String {
    for candidate in CONFIG_CANDIDATES {
        let path = root.join(candidate);
        if path.exists() {
            return std::fs::read_to_string(&path).unwrap_or_else(|e| {
                panic!(
                    "a11y-eval: failed to read config from {}: {e}",
                    path.display()
                );
            });
        }
    }
    String::new()
}

fn parse_config(content: &str) -> Config {
    if content.is_empty() {
        return Config::default();
    }
    Config::parse(content).unwrap_or_else(|e| {
        panic!("a11y-eval: failed to parse config: {e}");
    })
}

/// Checks whether a `Cargo.toml` file defines a `[workspace]` section.
fn has_workspace_section(cargo_toml: &Path) -> bool {
    let Ok(content) = std::fs::read_to_string(cargo_toml) else {
        return false;
    };
    let Ok(table) = content.parse::<toml::Table>() else {
        return false;
    };
    table.contains_key("workspace")
}

/// Finds the workspace root above `CARGO_MANIFEST_DIR`.
fn find_project_root() -> PathBuf {
    if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
        let manifest_path = PathBuf::from(&manifest_dir);
        let mut candidate = manifest_path.as_path();
        loop {
            let cargo_toml = candidate.join("Cargo.toml");
            if cargo_toml.exists() && has_workspace_section(&cargo_toml) {
                return candidate.to_path_buf();
            }
            match candidate.parent() {
                Some(parent) => candidate = parent,
                None => break,
            }
        }
        return manifest_path;
    }

    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

/// Resolves the effective preset: argument > config > recommended.
fn resolve_preset(arg: Option<&str>, config: &Config) -> Preset {
    let name = arg.or(config.preset.as_deref()).unwrap_or("recommended");
    Preset::from_name(name).unwrap_or_else(|| {
        panic!(
            "a11y-eval: unknown preset `{name}`. Valid presets: {}",
            Preset::NAMES.join(", ")
        )
    })
}

/// Resolves the effective `fail_on` kind: argument > config > violation.
fn resolve_fail_on(arg: Option<&str>, config: &Config) -> ResultKind {
    let name = arg.or(config.fail_on.as_deref()).unwrap_or("violation");
    ResultKind::parse(name).unwrap_or_else(|| {
        panic!("a11y-eval: unknown result kind `{name}`. Valid values: violation, warning, manual_check")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_preset_defaults_to_recommended() {
        assert_eq!(resolve_preset(None, &Config::default()), Preset::Recommended);
    }

    #[test]
    fn resolve_preset_arg_takes_precedence() {
        let mut config = Config::default();
        config.preset = Some("minimal".to_string());
        assert_eq!(resolve_preset(Some("strict"), &config), Preset::Strict);
        assert_eq!(resolve_preset(None, &config), Preset::Minimal);
    }

    #[test]
    #[should_panic(expected = "unknown preset")]
    fn resolve_preset_invalid_panics() {
        resolve_preset(Some("lenient"), &Config::default());
    }

    #[test]
    fn resolve_fail_on_order() {
        let mut config = Config::default();
        assert_eq!(resolve_fail_on(None, &config), ResultKind::Violation);
        config.fail_on = Some("manual_check".to_string());
        assert_eq!(resolve_fail_on(None, &config), ResultKind::ManualCheck);
        assert_eq!(resolve_fail_on(Some("warning"), &config), ResultKind::Warning);
    }

    #[test]
    #[should_panic(expected = "unknown result kind")]
    fn resolve_fail_on_invalid_panics() {
        resolve_fail_on(Some("critical"), &Config::default());
    }

    #[test]
    fn project_root_is_the_workspace() {
        let root = find_project_root();
        assert!(has_workspace_section(&root.join("Cargo.toml")));
    }

    #[test]
    fn report_lists_failing_results() {
        let page = SnapshotNode::document(vec![SnapshotNode::element("html")
            .child(SnapshotNode::element("body").child(SnapshotNode::element("img")))]);
        let result = crate::evaluate(&page, "", "fixture.json").unwrap();
        let report = format_test_report(&result, ResultKind::Violation);
        assert!(report.starts_with("a11y-eval: fixture.json ("));
        assert!(report.contains("IMAGE_1 [1.1.1]"));
        assert!(report.contains("LANGUAGE_1 [3.1.1]"));
        assert!(!report.contains("LINK_1"));
    }
}
