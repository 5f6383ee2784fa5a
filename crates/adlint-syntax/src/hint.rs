//! `!+ HINT(params)` preprocessor hint lines.

use crate::kinds;
use adlint_core::{Node, ParseError, Span};

/// Parses a hint command line (`!+ PLATFORM(windows) NOT_OPTIMIZED`).
///
/// The returned tree is `HintCommandRule > Hint > HintParameter*`, with a
/// `name` attribute on each hint and a `value` attribute on each
/// parameter. Spans point at the exact bytes of each element.
pub(crate) fn parse_hint_command(
    line: &str,
    line_start: usize,
) -> Result<Node, ParseError> {
    let line_span = Span::new(line_start, line_start + line.len());
    let mut root = Node::new(kinds::HINT_COMMAND_RULE, line_span);

    // Byte cursor past the `!+` marker.
    let mut at = 2;
    let bytes = line.as_bytes();
    while at < bytes.len() {
        if bytes[at].is_ascii_whitespace() {
            at += 1;
            continue;
        }
        let name_start = at;
        while at < bytes.len() && (bytes[at].is_ascii_alphanumeric() || bytes[at] == b'_') {
            at += 1;
        }
        if at == name_start {
            let found = line[at..].chars().next().unwrap_or('?');
            return Err(ParseError::new(
                format!("unexpected character `{found}` in hint"),
                Span::new(line_start + at, line_start + at + found.len_utf8()),
            ));
        }
        let name = &line[name_start..at];

        let mut hint_end = at;
        let mut params: Vec<Node> = Vec::new();
        if at < bytes.len() && bytes[at] == b'(' {
            let open = at;
            let Some(close_rel) = line[open..].find(')') else {
                return Err(ParseError::new(
                    format!("unclosed parenthesis in hint `{name}`"),
                    Span::new(line_start + name_start, line_start + line.len()),
                ));
            };
            let close = open + close_rel;
            params = parse_params(&line[open + 1..close], line_start + open + 1);
            at = close + 1;
            hint_end = at;
        }

        let mut hint = Node::new(
            kinds::HINT,
            Span::new(line_start + name_start, line_start + hint_end),
        )
        .with_attr("name", name);
        for param in params {
            hint = hint.with_child(param);
        }
        root = root.with_child(hint);
    }

    if root.children.is_empty() {
        return Err(ParseError::new("empty hint command", line_span));
    }
    Ok(root)
}

/// Splits a comma-separated parameter list into `HintParameter` nodes.
fn parse_params(text: &str, offset: usize) -> Vec<Node> {
    let mut nodes = Vec::new();
    let mut at = 0;
    for part in text.split(',') {
        let trimmed = part.trim();
        if !trimmed.is_empty() {
            let lead = part.len() - part.trim_start().len();
            let start = offset + at + lead;
            nodes.push(
                Node::new(
                    kinds::HINT_PARAMETER,
                    Span::new(start, start + trimmed.len()),
                )
                .with_attr("value", trimmed),
            );
        }
        at += part.len() + 1;
    }
    nodes
}
