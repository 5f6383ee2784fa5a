//! The lint engine: line loop, directive handling, tree walk and dispatch.

use crate::config::{ConfigError, LinterConfig};
use crate::context::RuleContext;
use crate::directives::{DirectiveCommand, DirectiveState};
use crate::fixer::apply_fixes;
use crate::lines::LineIndex;
use crate::node::Node;
use crate::parser::{LineParser, SubParserRegistry};
use crate::rule::{resolve_rules, ActiveRule, RuleRegistry, StaticRegistry};
use crate::selector::{selector_matches, PathEntry};
use crate::types::{
    FixerResult, LintResult, Position, Problem, ProblemCategory, Severity,
};
use crate::visitor::{VisitorIndex, VisitorIndexError};
use std::sync::Arc;

/// Node kind a line parser uses for inline configuration comments.
///
/// Lines of this kind are consumed by the directive state machine (when
/// inline configuration is allowed) instead of being dispatched to rules.
pub const CONFIG_COMMENT_KIND: &str = "ConfigCommentRule";

/// Attribute on a config comment node holding the directive command word.
pub const DIRECTIVE_COMMAND_ATTR: &str = "command";

/// Attribute on a config comment node holding the raw parameter text.
pub const DIRECTIVE_PARAMS_ATTR: &str = "params";

/// Errors raised while constructing a [`Linter`].
#[derive(Debug, thiserror::Error)]
pub enum LinterError {
    /// No line parser was supplied to the builder.
    #[error("a line parser is required to build a linter")]
    MissingParser,

    /// Configuration resolution failed.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A rule declared a selector that does not parse.
    #[error(transparent)]
    Selector(#[from] VisitorIndexError),
}

/// Builder for [`Linter`].
#[derive(Default)]
pub struct LinterBuilder {
    parser: Option<Arc<dyn LineParser>>,
    registry: Option<Arc<dyn RuleRegistry>>,
    config: LinterConfig,
    sub_parsers: SubParserRegistry,
}

impl LinterBuilder {
    /// Sets the line parser. Required.
    #[must_use]
    pub fn parser(mut self, parser: Arc<dyn LineParser>) -> Self {
        self.parser = Some(parser);
        self
    }

    /// Sets the rule registry. Defaults to an empty registry.
    #[must_use]
    pub fn registry(mut self, registry: Arc<dyn RuleRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Sets the configuration. Defaults to [`LinterConfig::default`].
    #[must_use]
    pub fn config(mut self, config: LinterConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the sub-parser registry for embedded grammars.
    #[must_use]
    pub fn sub_parsers(mut self, sub_parsers: SubParserRegistry) -> Self {
        self.sub_parsers = sub_parsers;
        self
    }

    /// Resolves rules, builds the visitor index, and returns the linter.
    ///
    /// All loading and selector parsing happens here, once; `lint` calls
    /// never touch the registry again.
    ///
    /// # Errors
    ///
    /// Returns [`LinterError::MissingParser`] without a parser,
    /// [`LinterError::Config`] if a rule rejects its options, and
    /// [`LinterError::Selector`] on an unparsable selector.
    pub fn build(self) -> Result<Linter, LinterError> {
        let parser = self.parser.ok_or(LinterError::MissingParser)?;
        let registry = self
            .registry
            .unwrap_or_else(|| Arc::new(StaticRegistry::new()));
        let rules = resolve_rules(&self.config, registry.as_ref())?;
        let index = VisitorIndex::build(&rules)?;
        tracing::debug!(rules = rules.len(), "linter built");
        Ok(Linter {
            parser,
            config: self.config,
            sub_parsers: self.sub_parsers,
            rules,
            index,
        })
    }
}

/// A configured, ready-to-run linter.
///
/// Immutable once built; all per-document state lives on the stack of
/// [`Linter::lint`], so one linter may serve many documents, including
/// concurrently from multiple threads.
pub struct Linter {
    parser: Arc<dyn LineParser>,
    config: LinterConfig,
    sub_parsers: SubParserRegistry,
    rules: Vec<ActiveRule>,
    index: VisitorIndex,
}

impl Linter {
    /// Starts building a linter.
    #[must_use]
    pub fn builder() -> LinterBuilder {
        LinterBuilder::default()
    }

    /// Number of active rules.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// The resolved configuration.
    #[must_use]
    pub fn config(&self) -> &LinterConfig {
        &self.config
    }

    /// Lints one document.
    #[must_use]
    pub fn lint(&self, text: &str) -> LintResult {
        let lines = LineIndex::new(text);
        let mut result = LintResult::new();
        let mut directives = DirectiveState::new();

        self.run_hooks(&lines, &mut result, |rule| rule.definition.on_start());

        let mut offset = 0;
        for (idx, line) in text.split('\n').enumerate() {
            let line_no = idx + 1;
            self.process_line(
                line,
                line_no,
                offset,
                text,
                &lines,
                &mut directives,
                &mut result,
            );
            directives.end_of_line();
            offset += line.len() + 1;
        }

        self.run_hooks(&lines, &mut result, |rule| rule.definition.on_end());
        result
    }

    /// Lints one document and applies every applicable fix.
    #[must_use]
    pub fn lint_with_fixes(&self, text: &str) -> FixerResult {
        let result = self.lint(text);
        apply_fixes(text, &result)
    }

    fn run_hooks<'r>(
        &'r self,
        lines: &LineIndex,
        result: &mut LintResult,
        select: impl Fn(&'r ActiveRule) -> Option<&'r crate::rule::HookFn>,
    ) {
        for rule in &self.rules {
            if let Some(hook) = select(rule) {
                let mut ctx = RuleContext::new(rule, &self.config, None, lines, result);
                hook(&mut ctx);
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn process_line(
        &self,
        line: &str,
        line_no: usize,
        line_start: usize,
        document: &str,
        lines: &LineIndex,
        directives: &mut DirectiveState,
        result: &mut LintResult,
    ) {
        let mut root = match self.parser.parse_line(line, line_no, line_start) {
            Ok(root) => root,
            Err(e) => {
                if directives.all_suppressed() {
                    tracing::trace!(line = line_no, "parse failure suppressed by directive");
                    return;
                }
                result.push(Problem {
                    category: ProblemCategory::Syntax,
                    rule: None,
                    severity: Severity::Fatal,
                    message: e.message,
                    message_id: None,
                    data: None,
                    start: Position::new(line_no, 0),
                    end: Position::new(line_no, line.len()),
                    fix: None,
                    suggestions: Vec::new(),
                });
                return;
            }
        };

        if root.kind == CONFIG_COMMENT_KIND && self.config.allow_inline_config {
            let command = root.attr(DIRECTIVE_COMMAND_ATTR).unwrap_or("");
            let params = root.attr(DIRECTIVE_PARAMS_ATTR).unwrap_or("");
            match DirectiveCommand::parse(command, params) {
                Some(directive) => directives.apply(directive),
                None => {
                    tracing::debug!(line = line_no, command, "unrecognized inline directive")
                }
            }
            // Directive lines are state transitions, not lintable content.
            return;
        }

        self.sub_parsers.expand(&mut root, document);

        let mut path = vec![PathEntry::new(&root, 0)];
        self.walk(&mut path, directives, lines, result);
    }

    /// Pre-order walk dispatching visitors at every node.
    fn walk<'a>(
        &self,
        path: &mut Vec<PathEntry<'a>>,
        directives: &DirectiveState,
        lines: &LineIndex,
        result: &mut LintResult,
    ) {
        let node = match path.last() {
            Some(entry) => entry.node,
            None => return,
        };

        for entry in self.index.candidates(&node.kind) {
            let rule = &self.rules[entry.rule];
            if directives.is_suppressed(rule.definition.name()) {
                continue;
            }
            if !selector_matches(&entry.selector, path) {
                continue;
            }
            let mut ctx = RuleContext::new(rule, &self.config, Some(node), lines, result);
            (entry.callback)(&mut ctx);
        }

        for (i, child) in node.children.iter().enumerate() {
            path.push(PathEntry::new(child, i));
            self.walk(path, directives, lines, result);
            path.pop();
        }
    }
}

impl std::fmt::Debug for Linter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Linter")
            .field("rules", &self.rules.len())
            .field("visitors", &self.index.len())
            .field("sub_parsers", &self.sub_parsers)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Report;
    use crate::node::Span;
    use crate::parser::ParseError;
    use crate::rule::RuleDefinition;

    /// A toy grammar: `!` comments, `! adlint-*` config comments, `fail`
    /// lines that do not parse, everything else a `Rule` node with a
    /// `Text` child.
    struct ToyParser;

    impl LineParser for ToyParser {
        fn parse_line(
            &self,
            line: &str,
            _line_no: usize,
            line_start: usize,
        ) -> Result<Node, ParseError> {
            let span = Span::new(line_start, line_start + line.len());
            if line == "fail" {
                return Err(ParseError::new("unparsable line", span));
            }
            if let Some(rest) = line.strip_prefix("! ") {
                let (command, params) = rest.split_once(' ').unwrap_or((rest, ""));
                if command.starts_with("adlint-") {
                    return Ok(Node::new(CONFIG_COMMENT_KIND, span)
                        .with_attr(DIRECTIVE_COMMAND_ATTR, command)
                        .with_attr(DIRECTIVE_PARAMS_ATTR, params));
                }
                return Ok(Node::new("CommentRule", span));
            }
            Ok(Node::new("Rule", span).with_child(
                Node::new("Text", span).with_attr("value", line),
            ))
        }
    }

    fn flag_everything_rule(name: &str) -> RuleDefinition {
        RuleDefinition::builder(name, ProblemCategory::Problem)
            .visitor("Rule", |ctx| {
                if let Some(node) = ctx.node() {
                    let span = node.span;
                    ctx.report(Report::new(span, "flagged"));
                }
            })
            .build()
    }

    fn build_linter(rules: Vec<RuleDefinition>, config: LinterConfig) -> Linter {
        let mut registry = StaticRegistry::new();
        for rule in rules {
            registry.register(rule);
        }
        Linter::builder()
            .parser(Arc::new(ToyParser))
            .registry(Arc::new(registry))
            .config(config)
            .build()
            .unwrap()
    }

    fn config_with(names: &[&str]) -> LinterConfig {
        let mut config = LinterConfig::default();
        for name in names {
            config.set_rule(*name, crate::config::RuleSetting::new(Severity::Error));
        }
        config
    }

    #[test]
    fn flags_matching_lines() {
        let linter = build_linter(
            vec![flag_everything_rule("flag")],
            config_with(&["flag"]),
        );
        let result = linter.lint("abc\n! a comment\ndef");
        assert_eq!(result.problems.len(), 2);
        assert_eq!(result.problems[0].start.line, 1);
        assert_eq!(result.problems[1].start.line, 3);
    }

    #[test]
    fn parse_failure_becomes_fatal_problem() {
        let linter = build_linter(vec![], LinterConfig::default());
        let result = linter.lint("ok\nfail\nok");
        assert_eq!(result.fatal_count, 1);
        let p = &result.problems[0];
        assert!(p.rule.is_none());
        assert_eq!(p.severity, Severity::Fatal);
        assert_eq!(p.start, Position::new(2, 0));
        assert_eq!(p.end, Position::new(2, 4));
    }

    #[test]
    fn disable_directive_suppresses() {
        let linter = build_linter(
            vec![flag_everything_rule("flag")],
            config_with(&["flag"]),
        );
        let result = linter.lint("abc\n! adlint-disable\ndef\n! adlint-enable\nghi");
        // Only lines 1 and 5 are flagged.
        assert_eq!(result.problems.len(), 2);
        assert_eq!(result.problems[0].start.line, 1);
        assert_eq!(result.problems[1].start.line, 5);
    }

    #[test]
    fn disable_next_line_scopes_to_one_line() {
        let linter = build_linter(
            vec![flag_everything_rule("flag")],
            config_with(&["flag"]),
        );
        let result = linter.lint("! adlint-disable-next-line flag\nabc\ndef");
        assert_eq!(result.problems.len(), 1);
        assert_eq!(result.problems[0].start.line, 3);
    }

    #[test]
    fn directives_ignored_when_inline_config_disallowed() {
        let mut config = config_with(&["flag"]);
        config.allow_inline_config = false;
        let linter = build_linter(vec![flag_everything_rule("flag")], config);
        let result = linter.lint("! adlint-disable\nabc");
        assert_eq!(result.problems.len(), 1);
    }

    #[test]
    fn suppressed_parse_failure_is_silent() {
        let linter = build_linter(vec![], LinterConfig::default());
        let result = linter.lint("! adlint-disable\nfail");
        assert!(result.problems.is_empty());
    }

    #[test]
    fn hooks_run_once_per_document() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        static STARTS: AtomicUsize = AtomicUsize::new(0);
        static ENDS: AtomicUsize = AtomicUsize::new(0);

        let rule = RuleDefinition::builder("hooked", ProblemCategory::Problem)
            .on_start(|_ctx| {
                STARTS.fetch_add(1, Ordering::SeqCst);
            })
            .on_end(|_ctx| {
                ENDS.fetch_add(1, Ordering::SeqCst);
            })
            .build();
        let linter = build_linter(vec![rule], config_with(&["hooked"]));
        let _ = linter.lint("a\nb\nc");
        assert_eq!(STARTS.load(Ordering::SeqCst), 1);
        assert_eq!(ENDS.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn missing_parser_is_an_error() {
        let err = Linter::builder().build();
        assert!(matches!(err, Err(LinterError::MissingParser)));
    }

    #[test]
    fn lint_with_fixes_applies() {
        let rule = RuleDefinition::builder("shorten", ProblemCategory::Style)
            .visitor("Rule", |ctx| {
                if let Some(node) = ctx.node() {
                    if node.span.len() > 3 {
                        let span = node.span;
                        ctx.report(
                            Report::new(span, "too long").fix(
                                crate::types::FixCommand::remove(span.start + 3, span.end),
                            ),
                        );
                    }
                }
            })
            .build();
        let linter = build_linter(vec![rule], config_with(&["shorten"]));
        let out = linter.lint_with_fixes("abcdef\nxy");
        assert_eq!(out.fixed, "abc\nxy");
        assert!(out.unresolved.is_empty());
    }
}
