//! # adlint-syntax
//!
//! The adblock filter list grammar for adlint.
//!
//! [`FilterListParser`] implements the engine's line parser seam: every
//! line becomes one of a small set of top-level node kinds (empty lines,
//! comments, inline config comments, hint commands, cosmetic rules,
//! network rules), each with typed children carrying document-absolute
//! byte spans. [`sub_parsers`] supplies the embedded grammars (domain
//! lists) the engine grafts in before dispatch.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod cosmetic;
mod domains;
mod hint;
mod network;
mod parser;

/// Node kind discriminants produced by this grammar.
pub mod kinds {
    /// A blank or whitespace-only line.
    pub const EMPTY_RULE: &str = "EmptyRule";
    /// A plain `!` comment line.
    pub const COMMENT_RULE: &str = "CommentRule";
    /// An inline configuration comment (`! adlint-...`). The engine
    /// consumes these; see [`adlint_core::CONFIG_COMMENT_KIND`].
    pub const CONFIG_COMMENT_RULE: &str = adlint_core::CONFIG_COMMENT_KIND;
    /// A `!+ HINT(...)` preprocessor hint line.
    pub const HINT_COMMAND_RULE: &str = "HintCommandRule";
    /// One hint within a hint command.
    pub const HINT: &str = "Hint";
    /// One parameter of a hint.
    pub const HINT_PARAMETER: &str = "HintParameter";
    /// A cosmetic (element hiding / CSS injection / scriptlet) rule.
    pub const COSMETIC_RULE: &str = "CosmeticRule";
    /// The domain list preceding a cosmetic separator. Expanded into
    /// [`DOMAIN`] children by the domain list sub-parser.
    pub const DOMAIN_LIST: &str = "DomainList";
    /// One domain within a domain list.
    pub const DOMAIN: &str = "Domain";
    /// The body following a cosmetic separator.
    pub const BODY: &str = "Body";
    /// A network (blocking / unblocking) rule.
    pub const NETWORK_RULE: &str = "NetworkRule";
    /// The address pattern of a network rule.
    pub const PATTERN: &str = "Pattern";
    /// The `$`-prefixed modifier list of a network rule.
    pub const MODIFIER_LIST: &str = "ModifierList";
    /// One modifier within a modifier list.
    pub const MODIFIER: &str = "Modifier";
}

pub use domains::{sub_parsers, DomainListParser};
pub use parser::FilterListParser;
