//! The visitor index: kind-bucketed selector dispatch.
//!
//! Built once per linter from the active rule set. Each declared selector
//! is parsed and narrowed; selectors that narrow to a finite kind set go
//! into per-kind buckets, the rest into a fallback list consulted for
//! every node. Bucketing is a pre-filter only: the full selector match is
//! always the final arbiter, so an over-approximate bucket costs time but
//! never correctness.

use crate::rule::{ActiveRule, VisitorFn};
use crate::selector::{narrow, CandidateTypes, Selector, SelectorError};
use std::collections::HashMap;

/// A selector parse failure found while building the index.
#[derive(Debug, thiserror::Error)]
#[error("rule `{rule}`: invalid selector `{selector}`: {source}")]
pub struct VisitorIndexError {
    /// The rule declaring the bad selector.
    pub rule: String,
    /// The selector text as declared.
    pub selector: String,
    /// The underlying parse error.
    #[source]
    pub source: SelectorError,
}

/// One registered visitor: the owning rule, its parsed selector, and the
/// callback to invoke on a match.
pub struct VisitorEntry {
    /// Index into the active rule list.
    pub rule: usize,
    /// Parsed selector, evaluated in full before the callback runs.
    pub selector: Selector,
    /// The callback.
    pub callback: VisitorFn,
}

/// Index from node kind to the visitor entries that could match it.
pub struct VisitorIndex {
    entries: Vec<VisitorEntry>,
    by_kind: HashMap<String, Vec<usize>>,
    fallback: Vec<usize>,
}

impl std::fmt::Debug for VisitorIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VisitorIndex")
            .field("entries", &self.entries.len())
            .field("by_kind", &self.by_kind.keys().collect::<Vec<_>>())
            .field("fallback", &self.fallback)
            .finish()
    }
}

impl VisitorIndex {
    /// Builds the index for an active rule set.
    ///
    /// # Errors
    ///
    /// Fails fast on the first selector that does not parse; a rule with
    /// a bad selector would otherwise silently never fire.
    pub fn build(rules: &[ActiveRule]) -> Result<Self, VisitorIndexError> {
        let mut entries = Vec::new();
        let mut by_kind: HashMap<String, Vec<usize>> = HashMap::new();
        let mut fallback = Vec::new();

        for (rule_idx, rule) in rules.iter().enumerate() {
            for (selector_text, callback) in rule.definition.visitors() {
                let selector =
                    Selector::parse(selector_text).map_err(|source| VisitorIndexError {
                        rule: rule.definition.name().to_string(),
                        selector: selector_text.clone(),
                        source,
                    })?;
                let entry_idx = entries.len();
                match narrow(&selector) {
                    CandidateTypes::Types(kinds) => {
                        for kind in kinds {
                            by_kind.entry(kind).or_default().push(entry_idx);
                        }
                    }
                    CandidateTypes::Unconstrained => fallback.push(entry_idx),
                }
                entries.push(VisitorEntry {
                    rule: rule_idx,
                    selector,
                    callback: callback.clone(),
                });
            }
        }

        tracing::debug!(
            visitors = entries.len(),
            bucketed_kinds = by_kind.len(),
            fallback = fallback.len(),
            "visitor index built"
        );
        Ok(Self {
            entries,
            by_kind,
            fallback,
        })
    }

    /// Entries whose selector could match a node of `kind`: the kind's
    /// bucket followed by the fallback list, in registration order within
    /// each.
    pub fn candidates(&self, kind: &str) -> impl Iterator<Item = &VisitorEntry> + '_ {
        self.by_kind
            .get(kind)
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .chain(self.fallback.iter())
            .map(|&i| &self.entries[i])
    }

    /// Every registered entry, for exhaustive evaluation.
    #[must_use]
    pub fn entries(&self) -> &[VisitorEntry] {
        &self.entries
    }

    /// Number of registered visitors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no visitors are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
