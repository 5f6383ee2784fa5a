//! The top-level line parser: dispatch to the per-kind grammars.

use crate::cosmetic::{find_separator, parse_cosmetic_rule};
use crate::hint::parse_hint_command;
use crate::kinds;
use crate::network::parse_network_rule;
use adlint_core::{
    LineParser, Node, ParseError, Span, DIRECTIVE_COMMAND_ATTR, DIRECTIVE_PARAMS_ATTR,
};

/// Parses adblock filter list lines.
///
/// Dispatch order: empty line, `!+` hint command, `!` comment (with inline
/// `adlint-*` config comments split out), cosmetic rule if a separator is
/// present, network rule otherwise.
#[derive(Debug, Default, Clone, Copy)]
pub struct FilterListParser;

impl FilterListParser {
    /// Creates a parser.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl LineParser for FilterListParser {
    fn parse_line(
        &self,
        line: &str,
        _line_no: usize,
        line_start: usize,
    ) -> Result<Node, ParseError> {
        let span = Span::new(line_start, line_start + line.len());

        if line.trim().is_empty() {
            return Ok(Node::new(kinds::EMPTY_RULE, span));
        }
        if line.starts_with("!+") {
            return parse_hint_command(line, line_start);
        }
        if line.starts_with('!') {
            return Ok(parse_comment(line, span));
        }
        if let Some((at, separator)) = find_separator(line) {
            return parse_cosmetic_rule(line, line_start, at, separator);
        }
        parse_network_rule(line, line_start)
    }
}

/// Classifies a `!` comment, splitting out inline config comments.
fn parse_comment(line: &str, span: Span) -> Node {
    let content = line[1..].trim();
    if let Some(rest) = content.strip_prefix("adlint-") {
        let (suffix, params) = match rest.split_once(char::is_whitespace) {
            Some((s, p)) => (s, p.trim()),
            None => (rest, ""),
        };
        return Node::new(kinds::CONFIG_COMMENT_RULE, span)
            .with_attr(DIRECTIVE_COMMAND_ATTR, format!("adlint-{suffix}"))
            .with_attr(DIRECTIVE_PARAMS_ATTR, params);
    }
    Node::new(kinds::COMMENT_RULE, span).with_attr("text", content)
}
