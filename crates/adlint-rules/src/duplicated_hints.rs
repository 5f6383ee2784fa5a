//! `duplicated-hints`: flags the same hint appearing twice in one
//! `!+` command.
//!
//! No automatic fix: merging two `PLATFORM(...)` hints needs a union of
//! their parameter lists, which is a rewrite rather than a deletion.

use adlint_core::{ProblemCategory, Report, RuleDefinition};
use std::collections::HashSet;

pub(crate) fn definition() -> RuleDefinition {
    RuleDefinition::builder("duplicated-hints", ProblemCategory::Problem)
        .description("Disallows repeating the same hint within one hint command")
        .message("duplicate-hint", "hint `{hint}` is repeated in this command")
        .visitor("HintCommandRule", |ctx| {
            let Some(command) = ctx.node() else { return };
            let mut seen: HashSet<&str> = HashSet::new();
            for hint in &command.children {
                let Some(name) = hint.attr("name") else { continue };
                if !seen.insert(name) {
                    ctx.report(
                        Report::from_catalog(hint.span, "duplicate-hint")
                            .data(serde_json::json!({ "hint": name })),
                    );
                }
            }
        })
        .build()
}
