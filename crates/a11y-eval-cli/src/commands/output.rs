//! Shared output formatting for evaluation results.

use anyhow::Result;
use a11y_eval_core::{ElementResult, EvaluationReport, EvaluationResult, ResultKind, ResultsSummary};
use std::fmt::Write as _;

use super::evaluate::Page;
use crate::OutputFormat;

/// Print evaluation results in the specified format.
pub fn print(pages: &[Page], format: OutputFormat, include_passed: bool) -> Result<()> {
    match format {
        OutputFormat::Text => print!("{}", format_text(pages, include_passed)),
        OutputFormat::Json => return print_json(pages, include_passed),
        OutputFormat::Compact => print!("{}", format_compact(pages, include_passed)),
    }
    Ok(())
}

fn shown(element: &ElementResult, include_passed: bool) -> bool {
    include_passed || element.kind().is_at_least(ResultKind::ManualCheck)
}

fn label(result: &EvaluationResult, element: &ElementResult) -> String {
    element
        .node()
        .and_then(|n| result.dom_element(n))
        .map_or_else(|| "page".to_string(), |e| e.label())
}

fn page_name(page: &Page) -> String {
    if page.result.url().is_empty() {
        page.path.display().to_string()
    } else {
        page.result.url().to_string()
    }
}

fn format_text(pages: &[Page], include_passed: bool) -> String {
    let mut out = String::new();
    let mut total = ResultsSummary::default();

    for page in pages {
        let result = &page.result;
        let _ = writeln!(out, "\x1b[1m{}\x1b[0m {}", page_name(page), result.title());

        for rule in result.rule_results() {
            for element in rule.results().iter().filter(|e| shown(e, include_passed)) {
                let indicator = match element.kind() {
                    ResultKind::Violation => "\x1b[31mviolation\x1b[0m",
                    ResultKind::Warning => "\x1b[33mwarning\x1b[0m",
                    ResultKind::ManualCheck => "\x1b[34mmanual check\x1b[0m",
                    ResultKind::Pass => "\x1b[32mpass\x1b[0m",
                    ResultKind::Hidden => "\x1b[90mhidden\x1b[0m",
                };
                let _ = writeln!(
                    out,
                    "  {} [{} {}] at {}",
                    rule.rule_id(),
                    rule.wcag_primary_id(),
                    rule.wcag_level(),
                    label(result, element)
                );
                let _ = writeln!(out, "    {}: {}", indicator, element.message());
            }
        }

        let summary = result.summary();
        let _ = writeln!(out, "  {summary}\n");
        total.merge(&summary);
    }

    let summary_color = if total.violations > 0 {
        "\x1b[31m"
    } else if total.warnings > 0 {
        "\x1b[33m"
    } else {
        "\x1b[32m"
    };
    let _ = writeln!(
        out,
        "{}Found {} violation(s), {} warning(s), {} manual check(s) in {} page(s)\x1b[0m",
        summary_color,
        total.violations,
        total.warnings,
        total.manual_checks,
        pages.len()
    );
    out
}

fn print_json(pages: &[Page], include_passed: bool) -> Result<()> {
    let reports: Vec<EvaluationReport> = pages
        .iter()
        .map(|p| p.result.report(include_passed))
        .collect();
    let json = serde_json::to_string_pretty(&reports)?;
    println!("{json}");
    Ok(())
}

fn format_compact(pages: &[Page], include_passed: bool) -> String {
    let mut out = String::new();
    for page in pages {
        let name = page_name(page);
        for rule in page.result.rule_results() {
            for element in rule.results().iter().filter(|e| shown(e, include_passed)) {
                let _ = writeln!(
                    out,
                    "{}: {} [{}] {}: {}",
                    name,
                    element.kind(),
                    rule.rule_id(),
                    label(&page.result, element),
                    element.message(),
                );
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use a11y_eval_core::{Evaluator, SnapshotNode};
    use std::path::PathBuf;

    fn page() -> Page {
        let snapshot = SnapshotNode::document(vec![SnapshotNode::element("html")
            .attr("lang", "en")
            .child(SnapshotNode::element("body").children(vec![
                SnapshotNode::element("img").attr("id", "logo"),
                SnapshotNode::element("img").attr("alt", ""),
            ]))]);
        let evaluator = Evaluator::builder()
            .catalog(a11y_eval_rules::catalog().clone())
            .only(["IMAGE_1", "TITLE_1"])
            .build()
            .unwrap();
        Page {
            path: PathBuf::from("pages/home.json"),
            result: evaluator.evaluate(&snapshot, "", "https://example.com/"),
        }
    }

    #[test]
    fn compact_lists_failures_only() {
        let output = format_compact(&[page()], false);
        insta::assert_snapshot!(output, @r"
        https://example.com/: violation [IMAGE_1] img#logo: The img element MUST have alternative text or be marked decorative.
        https://example.com/: violation [TITLE_1] page: The page MUST have a non-empty title element.
        ");
    }

    #[test]
    fn compact_with_passes() {
        let output = format_compact(&[page()], true);
        assert_eq!(output.lines().count(), 3);
        assert!(output.contains("pass [IMAGE_1] img"));
    }

    #[test]
    fn text_summarizes_pages() {
        let output = format_text(&[page(), page()], false);
        assert!(output.contains("IMAGE_1 [1.1.1 A] at img#logo"));
        assert!(output.ends_with("Found 4 violation(s), 0 warning(s), 0 manual check(s) in 2 page(s)\x1b[0m\n"));
    }
}
