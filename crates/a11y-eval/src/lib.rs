//! # a11y-eval
//!
//! Rule-based accessibility evaluation of web pages.
//!
//! This is the main facade crate that re-exports the core engine and the
//! built-in rules.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use a11y_eval::SnapshotNode;
//!
//! let page = SnapshotNode::from_json(&std::fs::read_to_string("page.json")?)?;
//! let result = a11y_eval::evaluate(&page, "", "https://example.com/")?;
//!
//! for rule in result.rule_results() {
//!     println!("{}: {}", rule.rule_id(), rule.summary());
//! }
//! ```
//!
//! ## `cargo test` Integration
//!
//! ```rust,ignore
//! // tests/accessibility.rs
//! #[test]
//! fn home_page_is_accessible() {
//!     a11y_eval::check_snapshot("tests/pages/home.json", None, None);
//! }
//! ```
//!
//! The check reads `a11y-eval.toml` from the workspace root and panics with
//! a report when results at or above `fail_on` are found.

#![forbid(unsafe_code)]

// Re-export core types and traits
pub use a11y_eval_core::*;

/// Built-in rules and presets.
pub mod rules {
    pub use a11y_eval_rules::*;
}

mod runner;

pub use runner::check_snapshot;

/// Evaluates the page rooted at `root` with every built-in rule and default
/// options.
///
/// An empty `title` falls back to the document's `<title>`.
///
/// # Errors
///
/// Returns an error if the evaluator cannot be built.
pub fn evaluate<N: HostNode>(
    root: N,
    title: &str,
    url: &str,
) -> Result<EvaluationResult, EvaluatorError> {
    let evaluator = Evaluator::builder()
        .catalog(a11y_eval_rules::catalog().clone())
        .build()?;
    Ok(evaluator.evaluate(root, title, url))
}
