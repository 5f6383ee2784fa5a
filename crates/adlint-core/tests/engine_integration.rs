//! Integration test: engine end-to-end with a toy grammar.
//!
//! Verifies that indexed dispatch is observably identical to evaluating
//! every selector against every node, and that a built linter is safely
//! shared across threads.

use adlint_core::{
    LineParser, Linter, LinterConfig, Node, ParseError, ProblemCategory, Report, RuleDefinition,
    RuleSetting, Severity, Span, StaticRegistry,
};
use std::sync::Arc;

/// Grammar: `key=value value value` lines become an `Entry` node with one
/// `Value` child per token.
struct KeyValueParser;

impl LineParser for KeyValueParser {
    fn parse_line(
        &self,
        line: &str,
        _line_no: usize,
        line_start: usize,
    ) -> Result<Node, ParseError> {
        let span = Span::new(line_start, line_start + line.len());
        let Some((key, rest)) = line.split_once('=') else {
            return Err(ParseError::new("missing `=`", span));
        };
        let mut root = Node::new("Entry", span).with_attr("key", key);
        let mut at = key.len() + 1;
        for token in rest.split(' ') {
            if !token.is_empty() {
                let start = line_start + at;
                root = root.with_child(
                    Node::new("Value", Span::new(start, start + token.len()))
                        .with_attr("text", token),
                );
            }
            at += token.len() + 1;
        }
        Ok(root)
    }
}

fn counting_rule(name: &str, selector: &str) -> RuleDefinition {
    let selector = selector.to_string();
    RuleDefinition::builder(name, ProblemCategory::Problem)
        .visitor(selector, |ctx| {
            if let Some(node) = ctx.node() {
                let span = node.span;
                ctx.report(Report::new(span, "visited"));
            }
        })
        .build()
}

fn build(selectors: &[(&str, &str)]) -> Linter {
    let mut registry = StaticRegistry::new();
    let mut config = LinterConfig::default();
    for (name, selector) in selectors {
        registry.register(counting_rule(name, selector));
        config.set_rule(*name, RuleSetting::new(Severity::Warn));
    }
    Linter::builder()
        .parser(Arc::new(KeyValueParser))
        .registry(Arc::new(registry))
        .config(config)
        .build()
        .unwrap()
}

#[test]
fn narrowed_and_unconstrained_selectors_agree_on_hits() {
    // `Value` is bucketable; `[text]` is not and must go through the
    // fallback path. Both target the same nodes, so their hit counts for
    // any document must be equal.
    let linter = build(&[("typed", "Value"), ("untyped", "[text]")]);
    let text = "a=x y z\nb=1 2\nc=";
    let result = linter.lint(text);

    let typed = result
        .problems
        .iter()
        .filter(|p| p.rule.as_deref() == Some("typed"))
        .count();
    let untyped = result
        .problems
        .iter()
        .filter(|p| p.rule.as_deref() == Some("untyped"))
        .count();
    assert_eq!(typed, 5);
    assert_eq!(typed, untyped);
}

#[test]
fn combinator_selectors_dispatch_through_the_index() {
    let linter = build(&[("scoped", "Entry[key=a] > Value")]);
    let result = linter.lint("a=x y\nb=x y");
    // Only the two values under `a=` match.
    assert_eq!(result.problems.len(), 2);
    assert!(result.problems.iter().all(|p| p.start.line == 1));
}

#[test]
fn shared_linter_across_threads() {
    let linter = Arc::new(build(&[("typed", "Value")]));
    let documents = ["a=1 2 3", "b=4", "c=5 6"];

    let handles: Vec<_> = documents
        .iter()
        .map(|doc| {
            let linter = Arc::clone(&linter);
            let doc = (*doc).to_string();
            std::thread::spawn(move || linter.lint(&doc).problems.len())
        })
        .collect();

    let counts: Vec<usize> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(counts, vec![3, 1, 2]);
}

#[test]
fn problems_arrive_in_document_order() {
    let linter = build(&[("typed", "Value")]);
    let result = linter.lint("a=x y\nb=z");
    let offsets: Vec<(usize, usize)> = result
        .problems
        .iter()
        .map(|p| (p.start.line, p.start.column))
        .collect();
    assert_eq!(offsets, vec![(1, 2), (1, 4), (2, 2)]);
}
