//! Core types for lint diagnostics and results.

use miette::{Diagnostic, SourceSpan};
use serde::{Deserialize, Serialize};

/// Severity level for lint problems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Rule is disabled; never dispatched.
    Off,
    /// Warning that should be addressed but does not fail the run.
    Warn,
    /// Error that must be fixed.
    Error,
    /// Structural failure; the line could not be analyzed at all.
    Fatal,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Off => write!(f, "off"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
            Self::Fatal => write!(f, "fatal"),
        }
    }
}

/// Category of a problem or of the rule that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProblemCategory {
    /// The line could not be parsed into a syntax tree.
    Syntax,
    /// The construct is likely a mistake.
    Problem,
    /// The construct works but a better form exists.
    BestPractice,
    /// Formatting / stylistic concern.
    Style,
    /// The construct is deprecated in the target dialect.
    Deprecation,
}

impl std::fmt::Display for ProblemCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Syntax => write!(f, "syntax"),
            Self::Problem => write!(f, "problem"),
            Self::BestPractice => write!(f, "best-practice"),
            Self::Style => write!(f, "style"),
            Self::Deprecation => write!(f, "deprecation"),
        }
    }
}

/// A position inside the document.
///
/// Lines are 1-indexed; columns are 0-indexed byte offsets within the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Line number (1-indexed).
    pub line: usize,
    /// Column (0-indexed, bytes).
    pub column: usize,
}

impl Position {
    /// Creates a new position.
    #[must_use]
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// An unambiguous text replacement over a half-open byte range `[start, end)`
/// of the whole document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixCommand {
    /// Start byte offset into the document (inclusive).
    pub start: usize,
    /// End byte offset into the document (exclusive).
    pub end: usize,
    /// Replacement text.
    pub text: String,
}

impl FixCommand {
    /// Creates a fix replacing `[start, end)` with `text`.
    #[must_use]
    pub fn replace(start: usize, end: usize, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            text: text.into(),
        }
    }

    /// Creates a fix deleting `[start, end)`.
    #[must_use]
    pub fn remove(start: usize, end: usize) -> Self {
        Self {
            start,
            end,
            text: String::new(),
        }
    }

    /// Returns true if this fix neither removes nor inserts anything.
    ///
    /// Such a fix is a contract violation on the reporting rule's side and
    /// is rejected at report time.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.start == self.end && self.text.is_empty()
    }
}

/// A proposed resolution offered for manual selection, used when more than
/// one fix is plausible or the fix is non-trivial to auto-apply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Human-readable description of the alternative.
    pub message: String,
    /// The replacement this alternative would perform.
    pub fix: FixCommand,
}

impl Suggestion {
    /// Creates a new suggestion.
    #[must_use]
    pub fn new(message: impl Into<String>, fix: FixCommand) -> Self {
        Self {
            message: message.into(),
            fix,
        }
    }
}

/// One diagnostic produced by a lint run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Problem {
    /// Category of the problem.
    pub category: ProblemCategory,
    /// Name of the rule that reported this problem.
    ///
    /// `None` for structural parse failures, which no rule owns.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule: Option<String>,
    /// Severity of this problem.
    pub severity: Severity,
    /// Human-readable message.
    pub message: String,
    /// Stable message identifier from the rule's message catalog.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    /// Structured data used to fill the message template.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    /// Start of the problem range.
    pub start: Position,
    /// End of the problem range (exclusive).
    pub end: Position,
    /// Automatic fix, safe to apply without user interaction.
    ///
    /// Mutually exclusive with `suggestions`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fix: Option<FixCommand>,
    /// Alternative resolutions for manual selection.
    ///
    /// Mutually exclusive with `fix`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<Suggestion>,
}

impl std::fmt::Display for Problem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}: {}",
            self.start.line, self.start.column, self.severity
        )?;
        if let Some(rule) = &self.rule {
            write!(f, " [{rule}]")?;
        }
        write!(f, " {}", self.message)
    }
}

/// Converts a [`Problem`] into a miette diagnostic for rich terminal output.
///
/// Byte offsets are recovered from the problem's line/column positions
/// against the original document text.
#[derive(Debug, thiserror::Error, Diagnostic)]
#[error("{message}")]
pub struct ProblemDiagnostic {
    message: String,
    #[help]
    help: Option<String>,
    #[label("{label}")]
    span: SourceSpan,
    label: String,
}

impl ProblemDiagnostic {
    /// Builds a diagnostic from a problem and the document it was found in.
    #[must_use]
    pub fn from_problem(problem: &Problem, source: &str) -> Self {
        let start = offset_of(source, problem.start);
        let end = offset_of(source, problem.end).max(start);
        Self {
            message: problem.message.clone(),
            help: problem.suggestions.first().map(|s| s.message.clone()),
            span: SourceSpan::from((start, end - start)),
            label: problem
                .rule
                .clone()
                .unwrap_or_else(|| problem.category.to_string()),
        }
    }
}

/// Resolves a line/column position to a byte offset in `source`.
fn offset_of(source: &str, pos: Position) -> usize {
    let mut offset = 0;
    for (i, line) in source.split('\n').enumerate() {
        if i + 1 == pos.line {
            return offset + pos.column.min(line.len());
        }
        offset += line.len() + 1;
    }
    source.len()
}

/// Result of linting one document.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct LintResult {
    /// All problems, in source order of discovery.
    pub problems: Vec<Problem>,
    /// Number of warn-severity problems.
    pub warning_count: usize,
    /// Number of error-severity problems.
    pub error_count: usize,
    /// Number of fatal-severity problems.
    pub fatal_count: usize,
}

impl LintResult {
    /// Creates a new empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a problem, updating the severity counters.
    pub fn push(&mut self, problem: Problem) {
        match problem.severity {
            Severity::Warn => self.warning_count += 1,
            Severity::Error => self.error_count += 1,
            Severity::Fatal => self.fatal_count += 1,
            Severity::Off => {}
        }
        self.problems.push(problem);
    }

    /// Returns true if any error- or fatal-severity problem was found.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.error_count > 0 || self.fatal_count > 0
    }

    /// Returns problems at exactly the given severity.
    #[must_use]
    pub fn by_severity(&self, severity: Severity) -> Vec<&Problem> {
        self.problems
            .iter()
            .filter(|p| p.severity == severity)
            .collect()
    }
}

/// Result of applying fixes to a lint result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixerResult {
    /// The corrected document text.
    pub fixed: String,
    /// Problems the fixer could not resolve: either no fix was offered,
    /// or the fix conflicted with another applied fix.
    pub unresolved: Vec<Problem>,
}
