//! Parser seams: the per-line grammar parser and embedded sub-grammars.
//!
//! The engine does not implement any concrete filter-list grammar itself.
//! A [`LineParser`] implementation turns one logical line into a [`Node`]
//! tree; [`SubParser`] entries expand embedded sub-grammars (domain lists,
//! CSS selector bodies) into child nodes before rule dispatch.

use crate::node::{Node, Span};
use std::collections::HashMap;
use std::sync::Arc;

/// A structural failure while parsing one line.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct ParseError {
    /// Human-readable description of the failure.
    pub message: String,
    /// Byte range of the offending input, document-absolute.
    pub span: Span,
}

impl ParseError {
    /// Creates a new parse error.
    #[must_use]
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }
}

/// Parses one logical line of a filter list into a syntax tree.
///
/// Implementations must annotate every node with byte offsets relative to
/// the whole document: `line_start` is the offset of the first byte of
/// `line` within the document.
pub trait LineParser: Send + Sync {
    /// Parses `line` (without trailing newline) into a tree.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] on malformed input. The error degrades to a
    /// single fatal problem for that line; it never aborts the run.
    fn parse_line(&self, line: &str, line_no: usize, line_start: usize)
        -> Result<Node, ParseError>;
}

/// A parser for an embedded sub-grammar.
///
/// Receives the raw text of a placeholder node and the document-absolute
/// offset of its first byte, so produced nodes map straight back to
/// document positions.
pub trait SubParser: Send + Sync {
    /// Parses `text` into child nodes with document-absolute spans.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] if the embedded text is malformed.
    fn parse(&self, text: &str, offset: usize) -> Result<Vec<Node>, ParseError>;
}

/// Registry of embedded sub-grammar parsers, keyed by a selector path of
/// the form `"ParentKind > ChildKind"`.
///
/// When the engine encounters a childless node whose path matches an entry,
/// it grafts the parsed sub-nodes in as children before the tree walk, so
/// rule selectors can reach inside embedded grammars.
#[derive(Default, Clone)]
pub struct SubParserRegistry {
    entries: HashMap<String, Arc<dyn SubParser>>,
}

impl SubParserRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a sub-parser for `"ParentKind > ChildKind"` paths.
    pub fn register(&mut self, path: impl Into<String>, parser: Arc<dyn SubParser>) {
        self.entries.insert(path.into(), parser);
    }

    /// Returns true if no sub-parsers are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks up a sub-parser for a parent/child kind pair.
    #[must_use]
    pub fn get(&self, parent_kind: &str, child_kind: &str) -> Option<&Arc<dyn SubParser>> {
        // Paths are short and few; formatting per lookup is fine.
        self.entries.get(&format!("{parent_kind} > {child_kind}"))
    }

    /// Expands registered placeholder nodes in `root`'s subtree.
    ///
    /// Sub-parser failures leave the placeholder untouched; embedded
    /// grammars degrade, they do not abort the line.
    pub fn expand(&self, root: &mut Node, document: &str) {
        if self.is_empty() {
            return;
        }
        let parent_kind = root.kind.clone();
        for child in &mut root.children {
            if child.children.is_empty() {
                if let Some(parser) = self.get(&parent_kind, &child.kind) {
                    let span = child.span;
                    let text = document.get(span.start..span.end).unwrap_or("");
                    match parser.parse(text, span.start) {
                        Ok(nodes) => child.children = nodes,
                        Err(e) => {
                            tracing::debug!(
                                "sub-parser for {} > {} failed: {}",
                                parent_kind,
                                child.kind,
                                e
                            );
                        }
                    }
                }
            }
            self.expand(child, document);
        }
    }
}

impl std::fmt::Debug for SubParserRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubParserRegistry")
            .field("paths", &self.entries.keys().collect::<Vec<_>>())
            .finish()
    }
}
