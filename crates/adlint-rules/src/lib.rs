//! # adlint-rules
//!
//! Built-in lint rules for adblock filter lists, plus the presets that
//! bundle them.
//!
//! Each rule module exposes a `definition()` returning the rule as an
//! [`adlint_core::RuleDefinition`]; [`builtin_registry`] collects them all
//! and [`recommended_config`] enables the recommended set.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod duplicated_hint_platforms;
mod duplicated_hints;
mod duplicated_modifiers;
mod inconsistent_hint_platforms;
mod min_rule_length;
mod presets;
mod unknown_hints;

pub use presets::{builtin_registry, minimal_config, recommended_config};
