//! # a11y-eval-rules
//!
//! Built-in WCAG 2.2 rules for a11y-eval.
//!
//! Every rule reads the shared [`DomCache`] and its sub-caches; none of them
//! walks the DOM on its own.
//!
//! ## Available Rules
//!
//! | Id | Name | Description |
//! |----|------|-------------|
//! | COLOR_1 | [`ContrastMinimum`] | Text contrast of at least 4.5:1 (3:1 for large text) |
//! | COLOR_2 | [`ContrastEnhanced`] | Text contrast of at least 7:1 (4.5:1 for large text) |
//! | HEADING_1 | [`PageHasH1`] | The page has a visible `h1` |
//! | HEADING_2 | [`H1InMain`] | The main landmark contains an `h1` |
//! | HEADING_3 | [`SiblingHeadingsUnique`] | Sibling headings have distinct names |
//! | HEADING_4 | [`HeadingsNestedInLandmark`] | Heading levels do not skip within a landmark |
//! | HEADING_5 | [`HeadingsNested`] | Heading levels do not skip across the page |
//! | HEADING_6 | [`HeadingHasName`] | Headings have accessible names |
//! | LANDMARK_1 | [`PageHasMain`] | The page has one main landmark |
//! | LANDMARK_2 | [`ContentInLandmark`] | Content sits inside landmarks |
//! | LANDMARK_3 | [`LandmarkNamesUnique`] | Repeated landmark roles carry unique names |
//! | LINK_1 | [`LinkHasName`] | Links have accessible names |
//! | LINK_2 | [`SameNameSameHref`] | Links sharing a name point to the same resource |
//! | LINK_3 | [`TargetSize`] | Link targets meet the minimum size |
//! | IMAGE_1 | [`ImageHasAlt`] | Images have a text alternative or are decorative |
//! | IMAGE_2 | [`AltTextLength`] | Alternative text is concise |
//! | CONTROL_1 | [`ControlHasLabel`] | Form controls have labels |
//! | CONTROL_2 | [`ControlLabelsUnique`] | Control labels are unique |
//! | CONTROL_3 | [`RadioButtonsGrouped`] | Radio buttons are grouped |
//! | CONTROL_4 | [`ButtonHasName`] | Buttons have accessible names |
//! | LIST_1 | [`AriaListOwnsItems`] | ARIA lists own list items |
//! | LIST_2 | [`ListChildrenAreItems`] | `ul`/`ol` contain only `li` |
//! | TABLE_1 | [`DataCellsHaveHeaders`] | Data cells have header cells |
//! | TABLE_2 | [`DataTableHasName`] | Data tables have names |
//! | TABLE_3 | [`DataTableNamesUnique`] | Data table names are unique |
//! | TITLE_1 | [`PageHasTitle`] | The page has a title |
//! | LANGUAGE_1 | [`PageHasLanguage`] | The page declares a valid language |
//! | FRAME_1 | [`FrameHasTitle`] | Frames have titles |
//!
//! ## Usage
//!
//! ```ignore
//! use a11y_eval_core::{Config, Evaluator};
//! use a11y_eval_rules::Preset;
//!
//! let config = Config::from_file("a11y-eval.toml".as_ref())?;
//! let evaluator = Preset::Recommended
//!     .apply(Evaluator::builder(), &config)
//!     .config(config)
//!     .build()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod color;
mod controls;
mod frames;
mod headings;
mod images;
mod landmarks;
mod links;
mod lists;
mod page;
mod presets;
mod support;
mod tables;

pub use color::{ContrastEnhanced, ContrastMinimum};
pub use controls::{ButtonHasName, ControlHasLabel, ControlLabelsUnique, RadioButtonsGrouped};
pub use frames::FrameHasTitle;
pub use headings::{
    H1InMain, HeadingHasName, HeadingsNested, HeadingsNestedInLandmark, PageHasH1,
    SiblingHeadingsUnique,
};
pub use images::{AltTextLength, ImageHasAlt};
pub use landmarks::{ContentInLandmark, LandmarkNamesUnique, PageHasMain};
pub use links::{LinkHasName, SameNameSameHref, TargetSize};
pub use lists::{AriaListOwnsItems, ListChildrenAreItems};
pub use page::{PageHasLanguage, PageHasTitle};
pub use presets::{
    all_rules, catalog, configured_rules, minimal_rules, recommended_rules, strict_rules, Preset,
};
pub use tables::{DataCellsHaveHeaders, DataTableHasName, DataTableNamesUnique};

/// Re-export core types for convenience.
pub use a11y_eval_core::{DomCache, Rule, RuleCatalog, RuleResult, TestResult, WcagLevel};
