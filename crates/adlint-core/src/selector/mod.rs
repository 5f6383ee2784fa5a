//! Structural node queries used by lint rules to declare which nodes they
//! want to visit.
//!
//! A selector is a small query language over [`Node`](crate::node::Node)
//! shape: type atoms, attribute tests, compounds, unions, negation and
//! containment, and parent/sibling combinators with an explicit `!` subject
//! marker. Selectors are parsed once when a rule is registered and are
//! immutable afterwards.

mod matches;
mod narrow;
mod parse;

pub use matches::{selector_matches, PathEntry};
pub use narrow::{narrow, CandidateTypes};

/// How an attribute test compares its value.
#[derive(Debug, Clone)]
pub enum AttrOp {
    /// `[name]` — the attribute merely has to exist.
    Exists,
    /// `[name=value]` — exact string equality.
    Equals(String),
    /// `[name=/re/]` — regular-expression match.
    Regex(regex::Regex),
}

impl PartialEq for AttrOp {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Exists, Self::Exists) => true,
            (Self::Equals(a), Self::Equals(b)) => a == b,
            (Self::Regex(a), Self::Regex(b)) => a.as_str() == b.as_str(),
            _ => false,
        }
    }
}

/// The relationship a binary combinator requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombinatorKind {
    /// `A > B` — B is a direct child of A.
    Child,
    /// `A B` — B is a descendant of A.
    Descendant,
    /// `A ~ B` — B has a preceding sibling A.
    Sibling,
    /// `A + B` — B immediately follows sibling A.
    Adjacent,
}

/// A parsed selector expression.
///
/// This is a closed union: the narrower and matcher are recursive matches
/// over it, so adding a variant requires extending both.
#[derive(Debug, Clone, PartialEq)]
pub enum Selector {
    /// A bare type atom, e.g. `NetworkRule`.
    Type(String),
    /// `*` — matches any node.
    Wildcard,
    /// An attribute test, e.g. `[name="PLATFORM"]`. The pseudo-attribute
    /// `type` reads the node's kind.
    Attribute {
        /// Attribute name.
        name: String,
        /// Comparison operator.
        op: AttrOp,
    },
    /// A pseudo-class, e.g. `:first-child`.
    PseudoClass(String),
    /// Juxtaposed simple selectors that must all match, e.g. `Hint[name=X]`.
    Compound(Vec<Selector>),
    /// `:matches(a, b)` or a top-level comma list: any branch may match.
    Union(Vec<Selector>),
    /// `:not(x)` — filters, never selects.
    Not(Box<Selector>),
    /// `:has(x)` — requires a matching descendant; filters, never selects.
    Has(Box<Selector>),
    /// `!x` — explicit subject marker on one branch of a combinator.
    Subject(Box<Selector>),
    /// A binary combinator.
    Combinator {
        /// The relationship between the two sides.
        kind: CombinatorKind,
        /// Left-hand side (ancestor / preceding sibling).
        left: Box<Selector>,
        /// Right-hand side (the implicit subject).
        right: Box<Selector>,
    },
}

impl Selector {
    /// Parses a selector from its textual form.
    ///
    /// # Errors
    ///
    /// Returns a [`SelectorError`] on malformed input.
    pub fn parse(text: &str) -> Result<Self, SelectorError> {
        parse::parse(text)
    }
}

/// Errors from selector parsing.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SelectorError {
    /// The selector text was empty.
    #[error("selector must not be empty")]
    Empty,

    /// An unexpected character was found.
    #[error("unexpected character `{found}` at byte {at}")]
    UnexpectedChar {
        /// The offending character.
        found: char,
        /// Byte position in the selector text.
        at: usize,
    },

    /// Input ended in the middle of a construct.
    #[error("unexpected end of selector")]
    UnexpectedEnd,

    /// A regex attribute value failed to compile.
    #[error("invalid regex `{pattern}`: {reason}")]
    InvalidRegex {
        /// The regex source text.
        pattern: String,
        /// Why it failed to compile.
        reason: String,
    },

    /// A pseudo-class with arguments that the engine does not support.
    #[error("unsupported pseudo-class `:{name}(...)`")]
    UnsupportedPseudo {
        /// Name of the pseudo-class.
        name: String,
    },
}
