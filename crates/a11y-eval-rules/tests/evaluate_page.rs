//! End-to-end tests running the built-in catalog through the evaluator.

use a11y_eval_core::{
    ComputedStyle, Config, EvaluationResult, Evaluator, ResultKind, ResultsSummary, SnapshotNode,
};
use a11y_eval_rules::{catalog, Preset};

fn evaluate(page: &SnapshotNode) -> EvaluationResult {
    let evaluator = Evaluator::builder()
        .catalog(catalog().clone())
        .build()
        .unwrap();
    evaluator.evaluate(page, "", "https://example.com/")
}

fn text(tag: &str, content: &str) -> SnapshotNode {
    SnapshotNode::element(tag).child(SnapshotNode::text(content))
}

fn html(body: Vec<SnapshotNode>) -> SnapshotNode {
    SnapshotNode::document(vec![SnapshotNode::element("html")
        .attr("lang", "en")
        .children(vec![
            SnapshotNode::element("head").child(text("title", "Fixture")),
            SnapshotNode::element("body").children(body),
        ])])
}

fn tr(cells: Vec<SnapshotNode>) -> SnapshotNode {
    SnapshotNode::element("tr").children(cells)
}

#[test]
fn hidden_h1_is_counted_as_violation_and_hidden() {
    let page = html(vec![
        text("h1", "Welcome").style(ComputedStyle::default().display("none"))
    ]);
    let result = evaluate(&page);
    let heading = result.rule_result("HEADING_1").unwrap();
    assert_eq!(
        heading.summary(),
        ResultsSummary {
            violations: 1,
            warnings: 0,
            manual_checks: 0,
            passed: 0,
            hidden: 1,
        }
    );
    assert_eq!(result.title(), "Fixture");
}

#[test]
fn identical_links_pass_same_name_rule() {
    let page = html(vec![
        text("a", "Click here").attr("href", "/x"),
        text("a", "Click here").attr("href", "/x"),
    ]);
    let result = evaluate(&page);
    let links = result.rule_result("LINK_2").unwrap();
    assert_eq!(links.summary().passed, 2);
    assert_eq!(links.summary().total(), 2);
}

#[test]
fn black_on_white_contrast_is_21() {
    let page = html(vec![text("p", "Body copy")]);
    let result = evaluate(&page);
    let contrast = result.rule_result("COLOR_1").unwrap();
    assert_eq!(contrast.results().len(), 1);
    assert_eq!(contrast.results()[0].kind(), ResultKind::Pass);
    assert_eq!(contrast.results()[0].args(), ["21.0"]);
}

#[test]
fn rowspan_header_is_named_once_in_table_results() {
    let page = html(vec![SnapshotNode::element("table").children(vec![
        tr(vec![
            text("th", "Region").attr("rowspan", "2").attr("id", "region"),
            text("th", "Q1").attr("id", "q1"),
        ]),
        tr(vec![text("td", "10").attr("headers", "region q1 region")]),
    ])]);
    let result = evaluate(&page);
    let cells = result.rule_result("TABLE_1").unwrap();
    assert_eq!(cells.results().len(), 1);
    assert_eq!(cells.results()[0].kind(), ResultKind::Pass);
    assert_eq!(cells.results()[0].args(), ["Region, Q1"]);
}

#[test]
fn merged_cell_is_scored_once() {
    let page = html(vec![SnapshotNode::element("table").children(vec![
        tr(vec![text("th", "A"), text("th", "B")]),
        tr(vec![text("td", "wide").attr("colspan", "2").attr("rowspan", "2")]),
        tr(vec![]),
    ])]);
    let result = evaluate(&page);
    let cells = result.rule_result("TABLE_1").unwrap();
    assert_eq!(cells.results().len(), 1);
}

#[test]
fn messages_render_the_same_every_time() {
    let page = html(vec![
        text("h1", "Welcome"),
        text("h3", "Skipped"),
        text("a", "More").attr("href", "/a"),
        text("a", "More").attr("href", "/b"),
        SnapshotNode::element("img").attr("src", "x.png"),
    ]);
    let first = evaluate(&page);
    let second = evaluate(&page);

    let messages = |r: &EvaluationResult| -> Vec<String> {
        r.rule_results()
            .iter()
            .flat_map(|rule| rule.results().iter().map(|e| e.message().to_string()))
            .collect()
    };
    let rendered = messages(&first);
    assert!(!rendered.is_empty());
    assert_eq!(rendered, messages(&second));
    assert!(rendered.iter().all(|m| !m.contains("%1") && !m.contains("{0}")));

    for rule in first.rule_results() {
        for element in rule.results() {
            assert_eq!(element.message(), element.message());
        }
    }
}

#[test]
fn disabled_rules_do_not_run() {
    let config = Config::parse("disable = [\"COLOR_*\", \"LINK_3\"]\n").unwrap();
    let evaluator = Preset::Strict
        .apply(Evaluator::builder(), &config)
        .config(config)
        .build()
        .unwrap();
    let planned: Vec<&str> = evaluator.planned_rules().map(|(id, _)| id).collect();
    assert_eq!(planned.len(), 25);
    assert!(!planned.contains(&"COLOR_1"));
    assert!(!planned.contains(&"LINK_3"));
    assert!(evaluator.planned_rules().all(|(_, required)| required));
}

#[test]
fn report_hides_passes_unless_asked() {
    let page = html(vec![text("main", "Content").child(text("h1", "Title"))]);
    let result = evaluate(&page);
    let brief = result.report(false);
    assert!(brief
        .rules
        .iter()
        .flat_map(|r| &r.results)
        .all(|e| e.kind.is_at_least(ResultKind::ManualCheck)));
    let full = result.report(true);
    assert!(full.rules.iter().map(|r| r.results.len()).sum::<usize>() > 0);
    assert_eq!(full.summary, result.summary());
}
