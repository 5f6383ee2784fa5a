//! `inconsistent-hint-platforms`: flags a platform listed in both
//! `PLATFORM()` and `NOT_PLATFORM()` of the same hint command.
//!
//! The two listings contradict each other and there is no single safe
//! resolution, so the rule offers suggestions instead of a fix.

use adlint_core::{FixCommand, Node, ProblemCategory, Report, RuleDefinition, Suggestion};
use std::collections::HashMap;

/// Byte range that deletes parameter `idx` of `hint` together with its
/// separator.
fn param_removal(hint: &Node, idx: usize) -> FixCommand {
    let param = &hint.children[idx];
    if idx > 0 {
        FixCommand::remove(hint.children[idx - 1].span.end, param.span.end)
    } else if let Some(next) = hint.children.get(1) {
        FixCommand::remove(param.span.start, next.span.start)
    } else {
        FixCommand::remove(param.span.start, param.span.end)
    }
}

pub(crate) fn definition() -> RuleDefinition {
    RuleDefinition::builder("inconsistent-hint-platforms", ProblemCategory::Problem)
        .description("Disallows listing a platform as both included and excluded")
        .message(
            "contradiction",
            "platform `{platform}` is listed in both PLATFORM and NOT_PLATFORM",
        )
        .visitor("HintCommandRule", |ctx| {
            let Some(command) = ctx.node() else { return };

            // value -> (hint, param index) for each side.
            let mut included: HashMap<&str, (&Node, usize)> = HashMap::new();
            let mut excluded: HashMap<&str, (&Node, usize)> = HashMap::new();
            for hint in &command.children {
                let side = match hint.attr("name") {
                    Some("PLATFORM") => &mut included,
                    Some("NOT_PLATFORM") => &mut excluded,
                    _ => continue,
                };
                for (idx, param) in hint.children.iter().enumerate() {
                    if let Some(value) = param.attr("value") {
                        side.entry(value).or_insert((hint, idx));
                    }
                }
            }

            let mut conflicts: Vec<&str> = included
                .keys()
                .filter(|v| excluded.contains_key(*v))
                .copied()
                .collect();
            conflicts.sort_unstable();

            for value in conflicts {
                let (inc_hint, inc_idx) = included[value];
                let (exc_hint, exc_idx) = excluded[value];
                // Point at whichever listing comes later in the line.
                let inc_span = inc_hint.children[inc_idx].span;
                let exc_span = exc_hint.children[exc_idx].span;
                let at = if exc_span.start > inc_span.start {
                    exc_span
                } else {
                    inc_span
                };
                ctx.report(
                    Report::from_catalog(at, "contradiction")
                        .data(serde_json::json!({ "platform": value }))
                        .suggest(vec![
                            Suggestion::new(
                                format!("remove `{value}` from PLATFORM"),
                                param_removal(inc_hint, inc_idx),
                            ),
                            Suggestion::new(
                                format!("remove `{value}` from NOT_PLATFORM"),
                                param_removal(exc_hint, exc_idx),
                            ),
                        ]),
                );
            }
        })
        .build()
}
