//! Conflict-aware fix application.
//!
//! Fixes are applied in a single left-to-right pass over the document.
//! When two fixes overlap, the one starting earlier wins (ties broken by
//! report order, which the stable sort preserves) and the loser's problem
//! is reported back as unresolved. One pass only: callers wanting
//! fixpoint behavior re-lint the fixed text and apply again.

use crate::types::{FixerResult, LintResult, Problem};

/// Applies every applicable fix from `result` to `text`.
///
/// Problems without a fix, problems whose fix overlaps an already applied
/// one, and problems whose fix range falls outside the document are all
/// returned as unresolved, in their original report order.
#[must_use]
pub fn apply_fixes(text: &str, result: &LintResult) -> FixerResult {
    // Indices of fixable problems, stably sorted by fix start.
    let mut order: Vec<usize> = (0..result.problems.len())
        .filter(|&i| result.problems[i].fix.is_some())
        .collect();
    order.sort_by_key(|&i| {
        result.problems[i]
            .fix
            .as_ref()
            .map_or(usize::MAX, |f| f.start)
    });

    let mut fixed = String::with_capacity(text.len());
    let mut cursor = 0usize;
    let mut applied = vec![false; result.problems.len()];

    for &i in &order {
        let problem = &result.problems[i];
        let Some(fix) = &problem.fix else { continue };

        if fix.start > fix.end || fix.end > text.len() {
            tracing::warn!(
                rule = problem.rule.as_deref().unwrap_or("<none>"),
                start = fix.start,
                end = fix.end,
                "fix range out of bounds, skipping"
            );
            continue;
        }
        // Overlap with an already applied fix: skip, first writer wins.
        if fix.start < cursor {
            tracing::debug!(
                rule = problem.rule.as_deref().unwrap_or("<none>"),
                start = fix.start,
                "fix overlaps an earlier fix, skipping"
            );
            continue;
        }

        fixed.push_str(&text[cursor..fix.start]);
        fixed.push_str(&fix.text);
        cursor = fix.end;
        applied[i] = true;
    }
    fixed.push_str(&text[cursor..]);

    let unresolved: Vec<Problem> = result
        .problems
        .iter()
        .enumerate()
        .filter(|&(i, _)| !applied[i])
        .map(|(_, p)| p.clone())
        .collect();

    FixerResult { fixed, unresolved }
}
