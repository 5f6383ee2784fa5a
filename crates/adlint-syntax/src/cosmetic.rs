//! Cosmetic (element hiding / CSS / scriptlet) rule lines.

use crate::kinds;
use adlint_core::{Node, ParseError, Span};

/// Cosmetic separators, longest first so `#@?#` wins over `##` at the
/// same position.
const SEPARATORS: &[&str] = &[
    "#@?#", "#@$#", "#@%#", "#?#", "#$#", "#%#", "#@#", "##",
];

/// Finds the first cosmetic separator in a line.
pub(crate) fn find_separator(line: &str) -> Option<(usize, &'static str)> {
    let bytes = line.as_bytes();
    for i in 0..bytes.len() {
        if bytes[i] != b'#' {
            continue;
        }
        for sep in SEPARATORS {
            if line[i..].starts_with(sep) {
                return Some((i, sep));
            }
        }
    }
    None
}

/// Parses a cosmetic rule into `CosmeticRule > DomainList?, Body`.
///
/// The domain list is left childless here; the engine's sub-parser
/// registry expands it into `Domain` nodes before dispatch.
pub(crate) fn parse_cosmetic_rule(
    line: &str,
    line_start: usize,
    sep_at: usize,
    separator: &'static str,
) -> Result<Node, ParseError> {
    let line_span = Span::new(line_start, line_start + line.len());
    let body_start = sep_at + separator.len();
    let body_text = &line[body_start..];
    if body_text.trim().is_empty() {
        return Err(ParseError::new(
            format!("cosmetic rule has an empty body after `{separator}`"),
            line_span,
        ));
    }

    let exception = separator.starts_with("#@");
    let mut root = Node::new(kinds::COSMETIC_RULE, line_span)
        .with_attr("separator", separator)
        .with_attr("exception", if exception { "true" } else { "false" });

    if sep_at > 0 {
        root = root.with_child(Node::new(
            kinds::DOMAIN_LIST,
            Span::new(line_start, line_start + sep_at),
        ));
    }
    root = root.with_child(
        Node::new(
            kinds::BODY,
            Span::new(line_start + body_start, line_start + line.len()),
        )
        .with_attr("value", body_text),
    );
    Ok(root)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Result<Node, ParseError> {
        let (at, sep) = find_separator(line).ok_or_else(|| {
            ParseError::new("no separator", Span::new(0, line.len()))
        })?;
        parse_cosmetic_rule(line, 0, at, sep)
    }

    #[test]
    fn generic_hiding_rule() {
        let root = parse("##.ad-banner").unwrap();
        assert_eq!(root.attr("separator"), Some("##"));
        assert_eq!(root.attr("exception"), Some("false"));
        assert_eq!(root.children.len(), 1);
        assert_eq!(root.children[0].kind, kinds::BODY);
        assert_eq!(root.children[0].attr("value"), Some(".ad-banner"));
    }

    #[test]
    fn domain_scoped_rule() {
        let root = parse("example.com,example.org##.ad").unwrap();
        assert_eq!(root.children.len(), 2);
        let domains = &root.children[0];
        assert_eq!(domains.kind, kinds::DOMAIN_LIST);
        assert_eq!(domains.span, Span::new(0, 23));
        assert!(domains.children.is_empty());
        assert_eq!(root.children[1].span, Span::new(25, 28));
    }

    #[test]
    fn exception_separator() {
        let root = parse("example.com#@#.ad").unwrap();
        assert_eq!(root.attr("separator"), Some("#@#"));
        assert_eq!(root.attr("exception"), Some("true"));
    }

    #[test]
    fn extended_css_separator_wins_over_plain() {
        let (at, sep) = find_separator("example.com#?#.ad:has(.x)").unwrap();
        assert_eq!((at, sep), (11, "#?#"));
    }

    #[test]
    fn empty_body_is_an_error() {
        assert!(parse("example.com##").is_err());
        assert!(parse("example.com##   ").is_err());
    }

    #[test]
    fn no_separator_in_network_line() {
        assert!(find_separator("||example.com^$script").is_none());
    }
}
