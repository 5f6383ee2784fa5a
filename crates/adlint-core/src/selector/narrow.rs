//! Selector type narrowing.
//!
//! Narrowing answers one question statically: which concrete node kinds
//! could this selector's outermost subject ever match? The visitor index
//! uses the answer to dispatch a callback only for those kinds instead of
//! evaluating every selector against every node. Narrowing is allowed to
//! give up ([`CandidateTypes::Unconstrained`]); it is never allowed to
//! lose a match.

use super::{AttrOp, Selector};
use std::collections::BTreeSet;

/// The concrete node kinds a selector's subject could match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateTypes {
    /// A finite, non-empty set of node kinds.
    Types(BTreeSet<String>),
    /// Narrowing gave up; the selector must be evaluated against every node.
    Unconstrained,
}

impl CandidateTypes {
    /// Returns true if narrowing gave up.
    #[must_use]
    pub fn is_unconstrained(&self) -> bool {
        matches!(self, Self::Unconstrained)
    }
}

/// Narrows a selector to the node kinds its subject could match.
///
/// Pure and total: the only "failure" is returning
/// [`CandidateTypes::Unconstrained`]. An empty result set is treated as
/// "give up narrowing", never as "matches nothing".
#[must_use]
pub fn narrow(selector: &Selector) -> CandidateTypes {
    let mut types = BTreeSet::new();
    let mut unconstrained = false;
    collect(selector, true, false, &mut types, &mut unconstrained);
    if unconstrained || types.is_empty() {
        CandidateTypes::Unconstrained
    } else {
        CandidateTypes::Types(types)
    }
}

/// Walks the selector tracking subject position.
///
/// `subject` is true while the current sub-expression can describe the
/// selector's subject. `suppressed` is true inside `:not(...)` / `:has(...)`
/// arguments, where even an explicit subject marker must not contribute
/// (those arguments filter; they never select).
fn collect(
    selector: &Selector,
    subject: bool,
    suppressed: bool,
    types: &mut BTreeSet<String>,
    unconstrained: &mut bool,
) {
    match selector {
        Selector::Type(kind) => {
            if subject {
                types.insert(kind.clone());
            }
        }
        Selector::Wildcard | Selector::PseudoClass(_) => {
            if subject {
                *unconstrained = true;
            }
        }
        Selector::Attribute { name, op } => {
            if subject && name == "type" {
                match op {
                    AttrOp::Equals(kind) => {
                        types.insert(kind.clone());
                    }
                    // A bare `[type]` or a regex value cannot be enumerated
                    // statically.
                    AttrOp::Exists | AttrOp::Regex(_) => *unconstrained = true,
                }
            }
            // Non-`type` attributes constrain values, not kinds; they
            // contribute nothing either way.
        }
        Selector::Compound(parts) | Selector::Union(parts) => {
            for part in parts {
                collect(part, subject, suppressed, types, unconstrained);
            }
        }
        Selector::Not(inner) | Selector::Has(inner) => {
            collect(inner, false, true, types, unconstrained);
        }
        Selector::Subject(inner) => {
            collect(inner, !suppressed, suppressed, types, unconstrained);
        }
        Selector::Combinator { left, right, .. } => {
            let left_marked = matches!(**left, Selector::Subject(_));
            let right_marked = matches!(**right, Selector::Subject(_));
            let (left_subject, right_subject) = if left_marked || right_marked {
                (left_marked, right_marked)
            } else {
                // Neither side marked: the right-hand side is the implicit
                // subject. Fixed convention, covered by tests; do not
                // re-derive.
                (false, true)
            };
            // Both sides are walked either way so nested explicit subjects
            // on the non-subject side still surface via `Subject`.
            collect(left, subject && left_subject, suppressed, types, unconstrained);
            collect(right, subject && right_subject, suppressed, types, unconstrained);
        }
    }
}
