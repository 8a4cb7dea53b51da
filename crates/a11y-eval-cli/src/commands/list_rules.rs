//! List rules command implementation.

use a11y_eval_core::Config;
use a11y_eval_rules::{all_rules, Preset};
use anyhow::Result;
use std::fmt::Write as _;

use crate::config_resolver::ConfigSource;

/// Runs the list-rules command.
pub fn run(source: &ConfigSource) -> Result<()> {
    let config = source.load()?;
    print!("{}", format_rules(&config));
    Ok(())
}

fn format_rules(config: &Config) -> String {
    let mut out = String::from("Available rules:\n\n");
    let _ = writeln!(
        out,
        "{:<12} {:<10} {:<7} {:<6} {:<9} Description",
        "Id", "Category", "WCAG", "Level", "Required"
    );
    let _ = writeln!(out, "{}", "-".repeat(80));

    for rule in all_rules() {
        let required = config
            .rule_required(rule.id())
            .unwrap_or_else(|| rule.default_required());
        let status = if config.is_rule_enabled(rule.id()) {
            if required {
                "yes"
            } else {
                "no"
            }
        } else {
            "disabled"
        };
        let _ = writeln!(
            out,
            "{:<12} {:<10} {:<7} {:<6} {:<9} {}",
            rule.id(),
            rule.category().to_string(),
            rule.wcag_primary_id(),
            rule.wcag_level().to_string(),
            status,
            rule.description()
        );
    }

    out.push_str("\nPresets:\n");
    out.push_str("  recommended  - WCAG level A and AA rules (default)\n");
    out.push_str("  strict       - All rules, each one required\n");
    out.push_str("  minimal      - WCAG level A rules only (for gradual adoption)\n");
    let _ = writeln!(
        out,
        "\nActive preset: {}",
        config.preset.as_deref().unwrap_or(Preset::default().name())
    );

    out.push_str("\nUse --rules to filter specific rules, e.g.:\n");
    out.push_str("  a11y-eval evaluate --rules COLOR_1,LINK_1 pages/\n");
    out.push_str("  a11y-eval evaluate --rules 'HEADING_*' pages/\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_every_rule_with_config_overrides() {
        let config = Config::parse(
            "disable = [\"COLOR_*\"]\n[rules.LINK_2]\nrequired = true\n",
        )
        .unwrap();
        let output = format_rules(&config);

        assert!(all_rules().iter().all(|r| output.contains(r.id())));
        let line = |id: &str| {
            output
                .lines()
                .find(|l| l.starts_with(id))
                .unwrap()
                .split_whitespace()
                .collect::<Vec<_>>()
        };
        assert_eq!(line("COLOR_1")[4], "disabled");
        assert_eq!(line("LINK_2")[4], "yes");
        assert_eq!(line("HEADING_4")[4], "no");
        assert_eq!(line("TITLE_1")[1..5], ["page", "2.4.2", "A", "yes"]);
        assert!(output.contains("Active preset: recommended"));
    }
}
