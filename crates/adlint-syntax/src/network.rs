//! Network (blocking) rule lines.

use crate::kinds;
use adlint_core::{Node, ParseError, Span};

/// Parses a network rule line into `NetworkRule > Pattern, ModifierList?`.
///
/// `@@` exceptions are recorded as an `exception` attribute on the root.
/// The modifier separator is the last unescaped `$` that is followed by a
/// plausible modifier list; a `$` inside the pattern (regex anchors,
/// replace values) stays part of the pattern.
pub(crate) fn parse_network_rule(line: &str, line_start: usize) -> Result<Node, ParseError> {
    let line_span = Span::new(line_start, line_start + line.len());
    let exception = line.starts_with("@@");
    let pattern_offset = if exception { 2 } else { 0 };
    let body = &line[pattern_offset..];

    let mut root = Node::new(kinds::NETWORK_RULE, line_span)
        .with_attr("exception", if exception { "true" } else { "false" });

    let split = modifier_separator(body);
    let pattern_text = split.map_or(body, |i| &body[..i]);
    let pattern_span = Span::new(
        line_start + pattern_offset,
        line_start + pattern_offset + pattern_text.len(),
    );
    root = root.with_child(
        Node::new(kinds::PATTERN, pattern_span).with_attr("value", pattern_text),
    );

    if let Some(i) = split {
        let list_start = line_start + pattern_offset + i + 1;
        let list_text = &body[i + 1..];
        let mut list = Node::new(
            kinds::MODIFIER_LIST,
            Span::new(list_start, list_start + list_text.len()),
        );
        for modifier in parse_modifiers(list_text, list_start)? {
            list = list.with_child(modifier);
        }
        root = root.with_child(list);
    }

    Ok(root)
}

/// Index of the `$` starting the modifier list, if any.
fn modifier_separator(body: &str) -> Option<usize> {
    // Regex patterns (`/.../`) keep their anchors; never split inside them.
    if body.starts_with('/') && body.ends_with('/') && body.len() > 1 {
        return None;
    }
    let bytes = body.as_bytes();
    let mut candidate = None;
    for (i, &b) in bytes.iter().enumerate() {
        if b != b'$' || (i > 0 && bytes[i - 1] == b'\\') {
            continue;
        }
        // A trailing `$` is a pattern anchor, not a separator.
        if i + 1 < bytes.len() {
            candidate = Some(i);
        }
    }
    candidate
}

/// Splits a modifier list on unescaped commas.
fn parse_modifiers(text: &str, offset: usize) -> Result<Vec<Node>, ParseError> {
    let mut nodes = Vec::new();
    let mut seg_start = 0;
    let bytes = text.as_bytes();
    let mut i = 0;
    loop {
        let at_end = i == bytes.len();
        if at_end || (bytes[i] == b',' && (i == 0 || bytes[i - 1] != b'\\')) {
            let segment = &text[seg_start..i];
            nodes.push(parse_modifier(segment, offset + seg_start)?);
            seg_start = i + 1;
        }
        if at_end {
            break;
        }
        i += 1;
    }
    Ok(nodes)
}

fn parse_modifier(segment: &str, offset: usize) -> Result<Node, ParseError> {
    let trimmed = segment.trim();
    if trimmed.is_empty() {
        return Err(ParseError::new(
            "empty modifier",
            Span::new(offset, offset + segment.len()),
        ));
    }
    let lead = segment.len() - segment.trim_start().len();
    let start = offset + lead;
    let span = Span::new(start, start + trimmed.len());
    let (name, value) = match trimmed.split_once('=') {
        Some((n, v)) => (n, Some(v)),
        None => (trimmed, None),
    };
    let mut node = Node::new(kinds::MODIFIER, span).with_attr("name", name);
    if let Some(value) = value {
        node = node.with_attr("value", value);
    }
    Ok(node)
}
