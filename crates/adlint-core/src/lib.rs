//! # adlint-core
//!
//! Core engine for linting adblock filter lists.
//!
//! The engine is grammar-agnostic: a [`LineParser`] turns each line into a
//! [`Node`] tree, rules declare CSS-like [`Selector`]s over those trees,
//! and the [`Linter`] dispatches matching callbacks through a kind-bucketed
//! visitor index. It includes:
//!
//! - [`RuleDefinition`] and [`RuleRegistry`] for declaring and loading rules
//! - [`Selector`] parsing, matching, and type narrowing
//! - [`DirectiveState`] for inline `! adlint-*` enable/disable comments
//! - [`apply_fixes`] for conflict-aware automatic fixing
//!
//! ## Example
//!
//! ```ignore
//! use adlint_core::{Linter, LinterConfig};
//!
//! let linter = Linter::builder()
//!     .parser(my_parser)
//!     .registry(my_registry)
//!     .config(LinterConfig::default())
//!     .build()?;
//!
//! let result = linter.lint(&filter_list_text);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod context;
mod directives;
mod engine;
mod fixer;
mod lines;
mod node;
mod parser;
mod rule;
mod types;
mod visitor;

/// Selector parsing, matching, and type narrowing.
pub mod selector;

pub use config::{ConfigError, LinterConfig, RuleSetting};
pub use context::{Report, Resolution, RuleContext};
pub use directives::{DirectiveCommand, DirectiveState, RuleSelection};
pub use engine::{
    Linter, LinterBuilder, LinterError, CONFIG_COMMENT_KIND, DIRECTIVE_COMMAND_ATTR,
    DIRECTIVE_PARAMS_ATTR,
};
pub use fixer::apply_fixes;
pub use lines::LineIndex;
pub use node::{Node, Span};
pub use parser::{LineParser, ParseError, SubParser, SubParserRegistry};
pub use rule::{
    resolve_rules, ActiveRule, HookFn, OptionsValidator, RuleDefinition, RuleDefinitionBuilder,
    RuleRegistry, StaticRegistry, VisitorFn,
};
pub use selector::{
    narrow, selector_matches, CandidateTypes, PathEntry, Selector, SelectorError,
};
pub use types::{
    FixCommand, FixerResult, LintResult, Position, Problem, ProblemCategory, ProblemDiagnostic,
    Severity, Suggestion,
};
pub use visitor::{VisitorEntry, VisitorIndex, VisitorIndexError};
