//! `unknown-hints`: flags hint names the preprocessor does not know.

use adlint_core::{ProblemCategory, Report, RuleDefinition, Severity};

/// Hints understood by the filter list preprocessor.
const KNOWN_HINTS: &[&str] = &["NOT_OPTIMIZED", "PLATFORM", "NOT_PLATFORM"];

pub(crate) fn definition() -> RuleDefinition {
    RuleDefinition::builder("unknown-hints", ProblemCategory::Problem)
        .description("Flags hint names the preprocessor does not recognize")
        .default_severity(Severity::Warn)
        .message("unknown-hint", "unknown hint `{hint}`")
        .visitor("Hint", |ctx| {
            let Some(hint) = ctx.node() else { return };
            let Some(name) = hint.attr("name") else { return };
            if !KNOWN_HINTS.contains(&name) {
                ctx.report(
                    Report::from_catalog(hint.span, "unknown-hint")
                        .data(serde_json::json!({ "hint": name })),
                );
            }
        })
        .build()
}
