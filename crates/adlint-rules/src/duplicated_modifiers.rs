//! `duplicated-modifiers`: flags repeated modifiers in a network rule.

use adlint_core::{ProblemCategory, Report, RuleDefinition};
use std::collections::HashSet;

pub(crate) fn definition() -> RuleDefinition {
    RuleDefinition::builder("duplicated-modifiers", ProblemCategory::Problem)
        .description("Disallows listing the same modifier twice in a network rule")
        .message(
            "duplicate-modifier",
            "modifier `{modifier}` is listed more than once",
        )
        .visitor("NetworkRule > ModifierList", |ctx| {
            let Some(list) = ctx.node() else { return };
            let mut seen: HashSet<&str> = HashSet::new();
            for modifier in &list.children {
                let Some(name) = modifier.attr("name") else { continue };
                if !seen.insert(name) {
                    ctx.report(
                        Report::from_catalog(modifier.span, "duplicate-modifier")
                            .data(serde_json::json!({ "modifier": name })),
                    );
                }
            }
        })
        .build()
}
