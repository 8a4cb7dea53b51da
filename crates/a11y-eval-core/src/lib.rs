//! # a11y-eval-core
//!
//! Core framework for rule-based accessibility evaluation of web pages.
//!
//! A host hands over its DOM through the [`HostNode`] trait. The evaluator
//! freezes it into a [`DomCache`] (visibility, resolved colours and fonts,
//! roles and accessible names attached during one traversal), derives
//! specialized sub-caches on demand, and runs every planned [`Rule`]
//! against it. Each rule classifies its targets as violation, warning,
//! manual check, pass or hidden.
//!
//! This crate provides:
//!
//! - [`HostNode`] and the serializable [`SnapshotNode`] DOM
//! - [`DomCache`] and its sub-caches (links, lists, tables, controls,
//!   headings/landmarks, colour contrast, images)
//! - [`Rule`] trait and [`RuleCatalog`] registry
//! - [`Evaluator`] for running rules, and [`EvaluationResult`] for querying
//!   what they found
//! - [`MessageCatalog`] for rendering localized result messages
//! - [`Config`] and declarative [`Ruleset`]s
//!
//! ## Example
//!
//! ```ignore
//! use a11y_eval_core::{Evaluator, SnapshotNode};
//!
//! let evaluator = Evaluator::builder()
//!     .catalog(my_catalog)
//!     .build()?;
//!
//! let page = SnapshotNode::from_json(&json)?;
//! let result = evaluator.evaluate(&page, "Home", "https://example.com/");
//! println!("{}", result.summary());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cache;
mod catalog;
pub mod color;
mod config;
mod evaluator;
mod host;
pub mod messages;
pub mod results;
mod rule;
pub mod ruleset;
mod snapshot;
pub mod visibility;

pub use cache::{BuildOptions, DomCache, DomElement, DomNode, DomText, NodeId};
pub use catalog::{CatalogError, RuleCatalog};
pub use color::{contrast_ratio, ResolvedStyle, Rgba};
pub use config::{Config, ConfigError, EvaluatorConfig, RuleConfig};
pub use evaluator::{Evaluator, EvaluatorBuilder, EvaluatorError};
pub use host::{ComputedStyle, FrameContent, HostNode, NodeKind, Rect};
pub use messages::{MessageCatalog, MessageError};
pub use results::{
    ElementResult, EvaluationReport, EvaluationResult, ResultKind, ResultTarget, ResultsSummary,
    RuleResult, TestResult,
};
pub use rule::{Rule, RuleBox, RuleCategory, RuleRef, RuleScope, WcagLevel};
pub use ruleset::{load_ruleset_from_file, load_ruleset_from_toml, Ruleset};
pub use snapshot::{FrameSnapshot, SnapshotNode};
pub use visibility::Visibility;
