//! Init command implementation.

use anyhow::{bail, Context, Result};
use std::path::Path;

const CONFIG_NAME: &str = "a11y-eval.toml";

const DEFAULT_CONFIG: &str = r#"# a11y-eval configuration

# Rule preset: "recommended" (WCAG A and AA), "strict" (all rules, all
# required) or "minimal" (WCAG A only)
preset = "recommended"

# Least severe result kind that fails a run:
# "violation", "warning" or "manual_check"
fail_on = "violation"

# Message catalog locale, or a path to a catalog JSON file
# locale = "en-us"
# messages = "messages/fr.json"

# Rule id patterns to skip
disable = []

[evaluator]
# Elements nested deeper than this are evaluated as leaves
max_depth = 256
# Include passed and hidden results in reports
include_passed = false

# Rule configurations
# Each rule can be enabled/disabled and made required (violation) or
# recommended (warning)

[rules.COLOR_1]
enabled = true
# threshold = 4.5
# large_threshold = 3.0

[rules.LINK_3]
required = false
# min_size = 24

# [rules.IMAGE_2]
# max_length = 150

# Declarative ruleset selecting and ordering rules
# [ruleset]
# id = "site-audit"
# version = "1.0"
#
# [[ruleset.rules]]
# id = "IMAGE_1"
# required = true
"#;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    write_config(Path::new("."), force)?;

    println!("Created {CONFIG_NAME}");
    println!("\nNext steps:");
    println!("  1. Edit {CONFIG_NAME} to configure rules");
    println!("  2. Run: a11y-eval evaluate <snapshot.json | directory>");

    Ok(())
}

fn write_config(dir: &Path, force: bool) -> Result<()> {
    let config_path = dir.join(CONFIG_NAME);

    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(&config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", config_path.display()))
}
