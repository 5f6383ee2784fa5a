//! Per-invocation rule context.
//!
//! The engine builds a fresh [`RuleContext`] for every (rule, node)
//! dispatch. The context carries everything a callback may consult and is
//! the only channel through which rules emit problems; rules never touch
//! the result sink directly.

use crate::config::LinterConfig;
use crate::lines::LineIndex;
use crate::node::{Node, Span};
use crate::rule::ActiveRule;
use crate::types::{FixCommand, Problem, Suggestion};

/// How a report proposes to resolve the problem, if at all.
#[derive(Debug, Clone)]
pub enum Resolution {
    /// A single unambiguous fix, safe for automatic application.
    Fix(FixCommand),
    /// Alternative resolutions for manual selection.
    Suggest(Vec<Suggestion>),
}

/// A problem report as a rule hands it over, before the engine attaches
/// rule identity, severity and positions.
#[derive(Debug, Clone)]
pub struct Report {
    span: Span,
    message: Option<String>,
    message_id: Option<String>,
    data: Option<serde_json::Value>,
    resolution: Option<Resolution>,
}

impl Report {
    /// A report with a literal message.
    #[must_use]
    pub fn new(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: Some(message.into()),
            message_id: None,
            data: None,
            resolution: None,
        }
    }

    /// A report whose message comes from the rule's message catalog,
    /// with `{key}` placeholders filled from [`Report::data`].
    #[must_use]
    pub fn from_catalog(span: Span, message_id: impl Into<String>) -> Self {
        Self {
            span,
            message: None,
            message_id: Some(message_id.into()),
            data: None,
            resolution: None,
        }
    }

    /// Attaches structured data for message templating and machine output.
    #[must_use]
    pub fn data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Attaches an automatic fix.
    #[must_use]
    pub fn fix(mut self, fix: FixCommand) -> Self {
        self.resolution = Some(Resolution::Fix(fix));
        self
    }

    /// Attaches suggestions for manual selection.
    #[must_use]
    pub fn suggest(mut self, suggestions: Vec<Suggestion>) -> Self {
        self.resolution = Some(Resolution::Suggest(suggestions));
        self
    }
}

/// Context passed to a rule callback for one dispatch.
pub struct RuleContext<'a> {
    rule: &'a ActiveRule,
    config: &'a LinterConfig,
    node: Option<&'a Node>,
    lines: &'a LineIndex,
    sink: &'a mut crate::types::LintResult,
}

impl<'a> RuleContext<'a> {
    pub(crate) fn new(
        rule: &'a ActiveRule,
        config: &'a LinterConfig,
        node: Option<&'a Node>,
        lines: &'a LineIndex,
        sink: &'a mut crate::types::LintResult,
    ) -> Self {
        Self {
            rule,
            config,
            node,
            lines,
            sink,
        }
    }

    /// The node that triggered this dispatch. `None` inside document
    /// start/end hooks.
    #[must_use]
    pub fn node(&self) -> Option<&'a Node> {
        self.node
    }

    /// The rule's effective options for this run.
    #[must_use]
    pub fn options(&self) -> &toml::Value {
        &self.rule.options
    }

    /// The run's configuration.
    #[must_use]
    pub fn config(&self) -> &LinterConfig {
        self.config
    }

    /// Name of the rule being dispatched.
    #[must_use]
    pub fn rule_name(&self) -> &str {
        self.rule.definition.name()
    }

    /// Emits a problem at the rule's effective severity.
    ///
    /// A no-op fix (empty replacement of an empty range) violates the
    /// reporting contract; it is dropped with a warning and the problem
    /// is kept without it.
    pub fn report(&mut self, report: Report) {
        let message = self.resolve_message(&report);
        let (fix, suggestions) = match report.resolution {
            Some(Resolution::Fix(fix)) => {
                if fix.is_noop() {
                    tracing::warn!(
                        rule = self.rule.definition.name(),
                        "dropping no-op fix from report"
                    );
                    (None, Vec::new())
                } else {
                    (Some(fix), Vec::new())
                }
            }
            Some(Resolution::Suggest(suggestions)) => (None, suggestions),
            None => (None, Vec::new()),
        };
        self.sink.push(Problem {
            category: self.rule.definition.category(),
            rule: Some(self.rule.definition.name().to_string()),
            severity: self.rule.severity,
            message,
            message_id: report.message_id,
            data: report.data,
            start: self.lines.position(report.span.start),
            end: self.lines.position(report.span.end),
            fix,
            suggestions,
        });
    }

    fn resolve_message(&self, report: &Report) -> String {
        if let Some(message) = &report.message {
            return message.clone();
        }
        let Some(id) = &report.message_id else {
            return String::new();
        };
        match self.rule.definition.messages().get(id) {
            Some(template) => fill_template(template, report.data.as_ref()),
            None => {
                tracing::warn!(
                    rule = self.rule.definition.name(),
                    message_id = id.as_str(),
                    "unknown message id, using it verbatim"
                );
                id.clone()
            }
        }
    }
}

/// Replaces `{key}` placeholders with values from `data`.
fn fill_template(template: &str, data: Option<&serde_json::Value>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) => {
                let key = &after[..close];
                let value = data.and_then(|d| d.get(key));
                match value {
                    Some(serde_json::Value::String(s)) => out.push_str(s),
                    Some(v) => out.push_str(&v.to_string()),
                    None => {
                        out.push('{');
                        out.push_str(key);
                        out.push('}');
                    }
                }
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}
