//! `duplicated-hint-platforms`: flags repeated platforms within one
//! `PLATFORM()` / `NOT_PLATFORM()` hint and removes the repeats.

use adlint_core::{FixCommand, ProblemCategory, Report, RuleDefinition, Span};
use std::collections::HashSet;

pub(crate) fn definition() -> RuleDefinition {
    RuleDefinition::builder("duplicated-hint-platforms", ProblemCategory::Problem)
        .description("Disallows listing the same platform twice in one hint")
        .message(
            "duplicate-platform",
            "platform `{platform}` is listed more than once",
        )
        .visitor("Hint[name=PLATFORM], Hint[name=NOT_PLATFORM]", |ctx| {
            let Some(hint) = ctx.node() else { return };
            let mut seen: HashSet<&str> = HashSet::new();
            let mut prev_end = 0;
            for param in &hint.children {
                let Some(value) = param.attr("value") else { continue };
                if seen.insert(value) {
                    prev_end = param.span.end;
                    continue;
                }
                // Remove the separator along with the repeated value, so
                // `(windows, windows)` collapses to `(windows)`.
                let removal = Span::new(prev_end, param.span.end);
                ctx.report(
                    Report::from_catalog(param.span, "duplicate-platform")
                        .data(serde_json::json!({ "platform": value }))
                        .fix(FixCommand::remove(removal.start, removal.end)),
                );
                // Keep removals for consecutive repeats adjacent rather
                // than overlapping, so they all apply in one fixer pass.
                prev_end = param.span.end;
            }
        })
        .build()
}
