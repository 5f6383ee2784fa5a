//! Full selector evaluation against a node and its ancestor chain.

use super::{AttrOp, CombinatorKind, Selector};
use crate::node::Node;

/// One step of the path from the tree root down to the candidate node.
#[derive(Debug, Clone, Copy)]
pub struct PathEntry<'a> {
    /// The node at this step.
    pub node: &'a Node,
    /// Index of this node within its parent's children (0 for the root).
    pub index: usize,
}

impl<'a> PathEntry<'a> {
    /// Creates a path entry.
    #[must_use]
    pub fn new(node: &'a Node, index: usize) -> Self {
        Self { node, index }
    }
}

/// Evaluates `selector` against the last node of `path` (the candidate
/// subject), with the rest of the path providing ancestor and sibling
/// context for combinators.
///
/// The path must be non-empty; an empty path never matches.
#[must_use]
pub fn selector_matches(selector: &Selector, path: &[PathEntry<'_>]) -> bool {
    let Some(last) = path.last() else {
        return false;
    };
    let node = last.node;

    match selector {
        Selector::Type(kind) => node.kind == *kind,
        Selector::Wildcard => true,
        Selector::Attribute { name, op } => attr_matches(node, name, op),
        Selector::PseudoClass(name) => pseudo_matches(name, path),
        Selector::Compound(parts) => parts.iter().all(|p| selector_matches(p, path)),
        Selector::Union(branches) => branches.iter().any(|b| selector_matches(b, path)),
        Selector::Not(inner) => !selector_matches(inner, path),
        Selector::Has(inner) => {
            any_in_subtree(path, |extended| selector_matches(inner, extended))
        }
        // A lone marker is transparent; its meaning lives in combinators.
        Selector::Subject(inner) => selector_matches(inner, path),
        Selector::Combinator { kind, left, right } => {
            combinator_matches(*kind, left, right, path)
        }
    }
}

fn attr_matches(node: &Node, name: &str, op: &AttrOp) -> bool {
    // `type` is a pseudo-attribute reading the node kind.
    let value = if name == "type" {
        Some(node.kind.as_str())
    } else {
        node.attr(name)
    };
    match (op, value) {
        (AttrOp::Exists, v) => v.is_some(),
        (AttrOp::Equals(wanted), Some(v)) => v == wanted,
        (AttrOp::Regex(re), Some(v)) => re.is_match(v),
        (_, None) => false,
    }
}

fn pseudo_matches(name: &str, path: &[PathEntry<'_>]) -> bool {
    let len = path.len();
    match name {
        "first-child" => len < 2 || path[len - 1].index == 0,
        "last-child" => {
            if len < 2 {
                return true;
            }
            let parent = path[len - 2].node;
            path[len - 1].index + 1 == parent.children.len()
        }
        // Unknown pseudo-classes never match; the narrower already treats
        // them as unconstrained, so no dispatch is lost.
        _ => false,
    }
}

fn combinator_matches(
    kind: CombinatorKind,
    left: &Selector,
    right: &Selector,
    path: &[PathEntry<'_>],
) -> bool {
    // An explicit subject marker on the left side flips the evaluation
    // direction: the candidate is the left node and the right side is
    // searched for among its children/descendants/following siblings.
    // Otherwise the right side is the subject by convention.
    if let Selector::Subject(left_inner) = left {
        if !selector_matches(left_inner, path) {
            return false;
        }
        return match kind {
            CombinatorKind::Child => any_child(path, |p| selector_matches(right, p)),
            CombinatorKind::Descendant => any_in_subtree(path, |p| selector_matches(right, p)),
            CombinatorKind::Adjacent => {
                following_sibling(path, 1).is_some_and(|p| selector_matches(right, &p))
            }
            CombinatorKind::Sibling => any_following_sibling(path, |p| selector_matches(right, p)),
        };
    }

    if !selector_matches(right, path) {
        return false;
    }
    let len = path.len();
    match kind {
        CombinatorKind::Child => len >= 2 && selector_matches(left, &path[..len - 1]),
        CombinatorKind::Descendant => {
            (1..len).any(|k| selector_matches(left, &path[..k]))
        }
        CombinatorKind::Adjacent => {
            preceding_sibling_path(path, |idx, here| idx + 1 == here)
                .iter()
                .any(|p| selector_matches(left, p))
        }
        CombinatorKind::Sibling => preceding_sibling_path(path, |idx, here| idx < here)
            .iter()
            .any(|p| selector_matches(left, p)),
    }
}

/// Invokes `f` on the path extended with each direct child of the candidate.
fn any_child(path: &[PathEntry<'_>], f: impl Fn(&[PathEntry<'_>]) -> bool) -> bool {
    let Some(last) = path.last() else {
        return false;
    };
    let mut extended: Vec<PathEntry<'_>> = path.to_vec();
    for (i, child) in last.node.children.iter().enumerate() {
        extended.push(PathEntry::new(child, i));
        if f(&extended) {
            return true;
        }
        extended.pop();
    }
    false
}

/// Invokes `f` on the path extended with each strict descendant of the
/// candidate, pre-order.
fn any_in_subtree(path: &[PathEntry<'_>], f: impl Fn(&[PathEntry<'_>]) -> bool + Copy) -> bool {
    let Some(last) = path.last() else {
        return false;
    };
    let mut extended: Vec<PathEntry<'_>> = path.to_vec();
    descend(last.node, &mut extended, f)
}

fn descend<'a>(
    node: &'a Node,
    path: &mut Vec<PathEntry<'a>>,
    f: impl Fn(&[PathEntry<'_>]) -> bool + Copy,
) -> bool {
    for (i, child) in node.children.iter().enumerate() {
        path.push(PathEntry::new(child, i));
        if f(path) || descend(child, path, f) {
            return true;
        }
        path.pop();
    }
    false
}

/// Path to the sibling `offset` positions after the candidate, if any.
fn following_sibling<'a>(
    path: &[PathEntry<'a>],
    offset: usize,
) -> Option<Vec<PathEntry<'a>>> {
    let len = path.len();
    if len < 2 {
        return None;
    }
    let parent = path[len - 2].node;
    let idx = path[len - 1].index + offset;
    let sibling = parent.children.get(idx)?;
    let mut p = path[..len - 1].to_vec();
    p.push(PathEntry::new(sibling, idx));
    Some(p)
}

fn any_following_sibling(
    path: &[PathEntry<'_>],
    f: impl Fn(&[PathEntry<'_>]) -> bool,
) -> bool {
    let len = path.len();
    if len < 2 {
        return false;
    }
    let parent = path[len - 2].node;
    let here = path[len - 1].index;
    let mut p = path[..len - 1].to_vec();
    for (idx, sibling) in parent.children.iter().enumerate().skip(here + 1) {
        p.push(PathEntry::new(sibling, idx));
        if f(&p) {
            return true;
        }
        p.pop();
    }
    false
}

/// Paths to preceding siblings of the candidate whose index satisfies
/// `accept(sibling_index, candidate_index)`.
fn preceding_sibling_path<'a>(
    path: &[PathEntry<'a>],
    accept: impl Fn(usize, usize) -> bool,
) -> Vec<Vec<PathEntry<'a>>> {
    let len = path.len();
    if len < 2 {
        return Vec::new();
    }
    let parent = path[len - 2].node;
    let here = path[len - 1].index;
    let mut out = Vec::new();
    for (idx, sibling) in parent.children.iter().enumerate() {
        if idx < here && accept(idx, here) {
            let mut p = path[..len - 1].to_vec();
            p.push(PathEntry::new(sibling, idx));
            out.push(p);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Span;

    /// `!+ PLATFORM(windows, windows)`-shaped tree.
    fn hint_tree() -> Node {
        Node::new("HintCommandRule", Span::new(0, 29)).with_child(
            Node::new("Hint", Span::new(3, 29))
                .with_attr("name", "PLATFORM")
                .with_child(
                    Node::new("HintParameter", Span::new(12, 19)).with_attr("value", "windows"),
                )
                .with_child(
                    Node::new("HintParameter", Span::new(21, 28)).with_attr("value", "windows"),
                ),
        )
    }

    fn root_path(node: &Node) -> Vec<PathEntry<'_>> {
        vec![PathEntry::new(node, 0)]
    }

    fn check(selector: &str, path: &[PathEntry<'_>]) -> bool {
        selector_matches(&Selector::parse(selector).unwrap(), path)
    }

    #[test]
    fn type_and_wildcard() {
        let tree = hint_tree();
        let path = root_path(&tree);
        assert!(check("HintCommandRule", &path));
        assert!(check("*", &path));
        assert!(!check("NetworkRule", &path));
    }

    #[test]
    fn attributes() {
        let tree = hint_tree();
        let hint = &tree.children[0];
        let path = vec![PathEntry::new(&tree, 0), PathEntry::new(hint, 0)];
        assert!(check("[name=PLATFORM]", &path));
        assert!(check("[name]", &path));
        assert!(check("[type=Hint]", &path));
        assert!(check("[type=/^Hint$/]", &path));
        assert!(!check("[name=NOT_PLATFORM]", &path));
        assert!(!check("[missing]", &path));
    }

    #[test]
    fn child_and_descendant_combinators() {
        let tree = hint_tree();
        let hint = &tree.children[0];
        let param = &hint.children[0];
        let hint_path = vec![PathEntry::new(&tree, 0), PathEntry::new(hint, 0)];
        let param_path = vec![
            PathEntry::new(&tree, 0),
            PathEntry::new(hint, 0),
            PathEntry::new(param, 0),
        ];

        assert!(check("HintCommandRule > Hint", &hint_path));
        assert!(!check("HintCommandRule > HintParameter", &param_path));
        assert!(check("HintCommandRule HintParameter", &param_path));
        assert!(check("Hint > HintParameter", &param_path));
    }

    #[test]
    fn sibling_combinators() {
        let tree = hint_tree();
        let hint = &tree.children[0];
        let second = &hint.children[1];
        let second_path = vec![
            PathEntry::new(&tree, 0),
            PathEntry::new(hint, 0),
            PathEntry::new(second, 1),
        ];
        assert!(check("HintParameter + HintParameter", &second_path));
        assert!(check("HintParameter ~ HintParameter", &second_path));

        let first = &hint.children[0];
        let first_path = vec![
            PathEntry::new(&tree, 0),
            PathEntry::new(hint, 0),
            PathEntry::new(first, 0),
        ];
        assert!(!check("HintParameter + HintParameter", &first_path));
    }

    #[test]
    fn explicit_subject_on_left() {
        let tree = hint_tree();
        let hint = &tree.children[0];
        let path = vec![PathEntry::new(&tree, 0), PathEntry::new(hint, 0)];
        // The subject is the Hint, selected for having a parameter child.
        assert!(check("!Hint > HintParameter", &path));
        assert!(check("!Hint HintParameter", &path));
        assert!(!check("!Hint > NetworkRule", &path));
    }

    #[test]
    fn not_and_has() {
        let tree = hint_tree();
        let path = root_path(&tree);
        assert!(check(":not(NetworkRule)", &path));
        assert!(!check(":not(HintCommandRule)", &path));
        assert!(check(":has(HintParameter)", &path));
        assert!(!check(":has(NetworkRule)", &path));
    }

    #[test]
    fn pseudo_position() {
        let tree = hint_tree();
        let hint = &tree.children[0];
        let first = &hint.children[0];
        let second = &hint.children[1];
        let first_path = vec![
            PathEntry::new(&tree, 0),
            PathEntry::new(hint, 0),
            PathEntry::new(first, 0),
        ];
        let second_path = vec![
            PathEntry::new(&tree, 0),
            PathEntry::new(hint, 0),
            PathEntry::new(second, 1),
        ];
        assert!(check(":first-child", &first_path));
        assert!(!check(":first-child", &second_path));
        assert!(check(":last-child", &second_path));
    }

    #[test]
    fn union_and_compound() {
        let tree = hint_tree();
        let hint = &tree.children[0];
        let path = vec![PathEntry::new(&tree, 0), PathEntry::new(hint, 0)];
        assert!(check("Hint[name=PLATFORM]", &path));
        assert!(!check("Hint[name=NOT_PLATFORM]", &path));
        assert!(check(":matches(NetworkRule, Hint)", &path));
    }
}
