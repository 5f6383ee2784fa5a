//! Domain list sub-grammar.

use crate::kinds;
use adlint_core::{Node, ParseError, Span, SubParser, SubParserRegistry};
use std::sync::Arc;

/// Parses the comma-separated domain list of a cosmetic rule into
/// `Domain` nodes with `value` and `negated` attributes.
#[derive(Debug, Default, Clone, Copy)]
pub struct DomainListParser;

impl SubParser for DomainListParser {
    fn parse(&self, text: &str, offset: usize) -> Result<Vec<Node>, ParseError> {
        let mut nodes = Vec::new();
        let mut at = 0;
        for part in text.split(',') {
            let trimmed = part.trim();
            if trimmed.is_empty() {
                return Err(ParseError::new(
                    "empty domain in domain list",
                    Span::new(offset + at, offset + at + part.len()),
                ));
            }
            let lead = part.len() - part.trim_start().len();
            let start = offset + at + lead;
            let span = Span::new(start, start + trimmed.len());
            let (value, negated) = match trimmed.strip_prefix('~') {
                Some(rest) => (rest, true),
                None => (trimmed, false),
            };
            nodes.push(
                Node::new(kinds::DOMAIN, span)
                    .with_attr("value", value)
                    .with_attr("negated", if negated { "true" } else { "false" }),
            );
            at += part.len() + 1;
        }
        Ok(nodes)
    }
}

/// The sub-parser registry for this grammar: domain lists under cosmetic
/// rules.
#[must_use]
pub fn sub_parsers() -> SubParserRegistry {
    let mut registry = SubParserRegistry::new();
    registry.register(
        format!("{} > {}", kinds::COSMETIC_RULE, kinds::DOMAIN_LIST),
        Arc::new(DomainListParser),
    );
    registry
}
