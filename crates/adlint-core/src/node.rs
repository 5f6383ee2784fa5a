//! Syntax tree nodes produced by line parsers.

use serde::{Deserialize, Serialize};

/// A half-open byte range `[start, end)` into the whole document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    /// Start offset (inclusive).
    pub start: usize,
    /// End offset (exclusive).
    pub end: usize,
}

impl Span {
    /// Creates a new span.
    #[must_use]
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Length of the span in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns true if the span is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

/// One element of a rule's syntax tree.
///
/// Nodes carry a string discriminant (`kind`), a document-absolute byte
/// span, named scalar attributes, and child nodes. Trees are rebuilt per
/// line and discarded after dispatch, so nodes own their children outright.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Node type discriminant (e.g. `NetworkRule`, `Hint`).
    pub kind: String,
    /// Byte range of this node in the document.
    pub span: Span,
    /// Named scalar attributes, in insertion order.
    pub attrs: Vec<(String, String)>,
    /// Child nodes, in source order.
    pub children: Vec<Node>,
}

impl Node {
    /// Creates a leaf node with no attributes.
    #[must_use]
    pub fn new(kind: impl Into<String>, span: Span) -> Self {
        Self {
            kind: kind.into(),
            span,
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Adds an attribute.
    #[must_use]
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((name.into(), value.into()));
        self
    }

    /// Adds a child node.
    #[must_use]
    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    /// Looks up an attribute value by name.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Returns the number of nodes in this subtree, itself included.
    #[must_use]
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(Node::subtree_len).sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attr_lookup() {
        let node = Node::new("Hint", Span::new(3, 20))
            .with_attr("name", "PLATFORM")
            .with_attr("params", "windows");
        assert_eq!(node.attr("name"), Some("PLATFORM"));
        assert_eq!(node.attr("params"), Some("windows"));
        assert_eq!(node.attr("missing"), None);
    }

    #[test]
    fn subtree_len_counts_all() {
        let node = Node::new("HintCommandRule", Span::new(0, 20))
            .with_child(Node::new("Hint", Span::new(3, 10)))
            .with_child(
                Node::new("Hint", Span::new(11, 20))
                    .with_child(Node::new("HintParameter", Span::new(12, 19))),
            );
        assert_eq!(node.subtree_len(), 4);
    }

    #[test]
    fn span_len() {
        assert_eq!(Span::new(3, 10).len(), 7);
        assert!(Span::new(5, 5).is_empty());
        assert!(!Span::new(5, 6).is_empty());
    }
}
