//! Inline configuration directives.
//!
//! Comments like `! adlint-disable-next-line duplicated-hints` toggle rule
//! enablement for the rest of the document or for the next line only:
//!
//! ```text
//! ! adlint-disable
//! ! adlint-enable
//! ! adlint-disable-next-line rule-a, rule-b
//! ! adlint-enable-next-line
//! ```

use std::collections::HashSet;

/// Which rules a next-line directive names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleSelection {
    /// No names given: the directive applies to every rule.
    All,
    /// The directive applies to the named rules only.
    Named(Vec<String>),
}

/// A parsed inline directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectiveCommand {
    /// Disable all rules from here on.
    Disable,
    /// Re-enable all rules from here on.
    Enable,
    /// Disable rules for the next processed line only.
    DisableNextLine(RuleSelection),
    /// Enable rules for the next processed line only.
    EnableNextLine(RuleSelection),
}

impl DirectiveCommand {
    /// Parses a directive from its command word and parameter text.
    ///
    /// `command` is e.g. `adlint-disable-next-line`; `params` is the raw
    /// remainder of the comment (comma- or whitespace-separated rule
    /// names). Returns `None` for unrecognized commands.
    #[must_use]
    pub fn parse(command: &str, params: &str) -> Option<Self> {
        let selection = || {
            let names: Vec<String> = params
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
            if names.is_empty() {
                RuleSelection::All
            } else {
                RuleSelection::Named(names)
            }
        };
        match command {
            "adlint-disable" => Some(Self::Disable),
            "adlint-enable" => Some(Self::Enable),
            "adlint-disable-next-line" => Some(Self::DisableNextLine(selection())),
            "adlint-enable-next-line" => Some(Self::EnableNextLine(selection())),
            _ => None,
        }
    }
}

/// One "next line only" override set.
#[derive(Debug, Clone, Default)]
struct NextLineSet {
    all: bool,
    rules: HashSet<String>,
}

impl NextLineSet {
    fn add(&mut self, selection: RuleSelection) {
        match selection {
            RuleSelection::All => self.all = true,
            RuleSelection::Named(names) => self.rules.extend(names),
        }
    }

    fn applies_to(&self, rule: &str) -> bool {
        self.all || self.rules.contains(rule)
    }

    fn clear(&mut self) {
        self.all = false;
        self.rules.clear();
    }
}

/// Per-document directive state.
///
/// Owned exclusively by one lint pass; mutated only by
/// [`DirectiveState::apply`] and [`DirectiveState::end_of_line`], so
/// concurrent passes over different documents never interfere.
#[derive(Debug, Clone, Default)]
pub struct DirectiveState {
    disabled_all: bool,
    next_disable: NextLineSet,
    next_enable: NextLineSet,
}

impl DirectiveState {
    /// Creates the initial state: nothing disabled, no overrides.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies a directive comment.
    pub fn apply(&mut self, command: DirectiveCommand) {
        match command {
            DirectiveCommand::Disable => self.disabled_all = true,
            DirectiveCommand::Enable => self.disabled_all = false,
            DirectiveCommand::DisableNextLine(sel) => self.next_disable.add(sel),
            DirectiveCommand::EnableNextLine(sel) => self.next_enable.add(sel),
        }
    }

    /// Returns true if the named rule is currently suppressed.
    #[must_use]
    pub fn is_suppressed(&self, rule: &str) -> bool {
        (self.disabled_all || self.next_disable.applies_to(rule))
            && !self.next_enable.applies_to(rule)
    }

    /// Returns true if every rule (and rule-less diagnostics) would be
    /// suppressed right now.
    #[must_use]
    pub fn all_suppressed(&self) -> bool {
        (self.disabled_all || self.next_disable.all) && !self.next_enable.all
    }

    /// Clears next-line overrides. Called after every processed line,
    /// whether it was a directive, a normal rule, or a parse failure.
    pub fn end_of_line(&mut self) {
        self.next_disable.clear();
        self.next_enable.clear();
    }
}
