//! List-tree interpreter and its library of operations.
//!
//! `map` walks a list: a nested list at the head is mapped first, a
//! registered token at the head hands the whole list to its operation, and
//! anything else passes through while the rest of the list is mapped. The
//! rest of a list is itself mapped as a list, so an operation governs the
//! remainder of the list it heads and never the siblings of that list.
//! Context (`memory`) is passed down by reference and only ever replaced by
//! a modified copy.

use super::{Node, Rule};
use crate::error::TreeError;
use crate::types::Tags;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

/// A rewrite invoked when its opcode heads a list.
///
/// `tree` is the whole list, opcode included. The operation decides whether
/// and how to recurse into the rest through `map`.
pub trait ListOperation {
    fn apply(&self, map: &ListTreeMap, tree: &[Node], memory: &Tags) -> Result<Node, TreeError>;
}

impl<F> ListOperation for F
where
    F: Fn(&ListTreeMap, &[Node], &Tags) -> Result<Node, TreeError>,
{
    fn apply(&self, map: &ListTreeMap, tree: &[Node], memory: &Tags) -> Result<Node, TreeError> {
        self(map, tree, memory)
    }
}

/// Opcode table for one list-tree pass.
#[derive(Clone, Default)]
pub struct ListTreeMap {
    operations: BTreeMap<String, Rc<dyn ListOperation>>,
}

impl ListTreeMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, opcode: impl Into<String>, operation: impl ListOperation + 'static) -> Self {
        self.insert(opcode, operation);
        self
    }

    pub fn insert(&mut self, opcode: impl Into<String>, operation: impl ListOperation + 'static) {
        self.operations.insert(opcode.into(), Rc::new(operation));
    }

    /// Register the operations of `other`, replacing any with the same opcode.
    pub fn extend(&mut self, other: &ListTreeMap) {
        for (opcode, operation) in &other.operations {
            self.operations.insert(opcode.clone(), Rc::clone(operation));
        }
    }

    /// `self` with `other` layered on top.
    pub fn merged(&self, other: &ListTreeMap) -> ListTreeMap {
        let mut merged = self.clone();
        merged.extend(other);
        merged
    }

    pub fn contains(&self, opcode: &str) -> bool {
        self.operations.contains_key(opcode)
    }

    pub fn opcodes(&self) -> impl Iterator<Item = &str> {
        self.operations.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Rewrite `tree` under `memory`. Only lists are interpreted.
    pub fn map(&self, tree: &Node, memory: &Tags) -> Result<Node, TreeError> {
        match tree {
            Node::List(items) => self.map_list(items, memory),
            other => Ok(other.clone()),
        }
    }

    pub fn map_list(&self, tree: &[Node], memory: &Tags) -> Result<Node, TreeError> {
        let Some((head, rest)) = tree.split_first() else {
            return Ok(Node::empty());
        };
        match head {
            Node::List(items) => {
                let mut out = vec![self.map_list(items, memory)?];
                out.extend(self.map_rest(rest, memory)?);
                Ok(Node::List(out))
            }
            Node::Token(opcode) => match self.operations.get(opcode) {
                Some(operation) => operation.apply(self, tree, memory),
                None => self.pass_through(tree, memory),
            },
            _ => self.pass_through(tree, memory),
        }
    }

    /// Map `rest` as a list and return its items.
    pub fn map_rest(&self, rest: &[Node], memory: &Tags) -> Result<Vec<Node>, TreeError> {
        let mut out = Vec::new();
        self.map_list(rest, memory)?.spread_into(&mut out);
        Ok(out)
    }

    fn pass_through(&self, tree: &[Node], memory: &Tags) -> Result<Node, TreeError> {
        let Some((head, rest)) = tree.split_first() else {
            return Ok(Node::empty());
        };
        let mut out = vec![head.clone()];
        out.extend(self.map_rest(rest, memory)?);
        Ok(Node::List(out))
    }
}

impl fmt::Debug for ListTreeMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListTreeMap")
            .field("opcodes", &self.operations.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// The opcode and the rest of a list handed to `operation`.
fn split_opcode<'a>(tree: &'a [Node], operation: &str) -> Result<(&'a Node, &'a [Node]), TreeError> {
    tree.split_first().ok_or_else(|| TreeError::Malformed {
        opcode: operation.to_string(),
        reason: "empty list".to_string(),
    })
}

fn head_token<'a>(tree: &'a [Node], operation: &str) -> Result<(&'a str, &'a [Node]), TreeError> {
    let (head, rest) = split_opcode(tree, operation)?;
    let token = head.as_token().ok_or_else(|| TreeError::Malformed {
        opcode: operation.to_string(),
        reason: "list is not headed by a token".to_string(),
    })?;
    Ok((token, rest))
}

/// Set context for the rest of the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub modifications: Tags,
    /// Drop the marker token from the output.
    pub remove: bool,
}

impl Tag {
    pub fn new(modifications: Tags, remove: bool) -> Self {
        Self {
            modifications,
            remove,
        }
    }
}

impl ListOperation for Tag {
    fn apply(&self, map: &ListTreeMap, tree: &[Node], memory: &Tags) -> Result<Node, TreeError> {
        let (head, rest) = split_opcode(tree, "tag")?;
        let mut scoped = memory.clone();
        scoped.extend(self.modifications.clone());
        let rest = map.map_rest(rest, &scoped)?;
        if self.remove {
            return Ok(Node::List(rest));
        }
        let mut out = vec![head.clone()];
        out.extend(rest);
        Ok(Node::List(out))
    }
}

/// Reduce the list into a [`Rule`] tagged by its opcode, capturing `memory`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Reduce;

impl ListOperation for Reduce {
    fn apply(&self, map: &ListTreeMap, tree: &[Node], memory: &Tags) -> Result<Node, TreeError> {
        let (tag, rest) = head_token(tree, "reduce")?;
        let content = map.map_list(rest, memory)?.flatten();
        Ok(Node::Rule(Rule::new(tag, memory.clone(), content)))
    }
}

/// Splice fixed nodes in place of the opcode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replace(pub Vec<Node>);

impl ListOperation for Replace {
    fn apply(&self, map: &ListTreeMap, tree: &[Node], memory: &Tags) -> Result<Node, TreeError> {
        let (_, rest) = split_opcode(tree, "replace")?;
        let mut out = self.0.clone();
        out.extend(map.map_rest(rest, memory)?);
        Ok(Node::List(out))
    }
}

/// Leave the list exactly as written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Keep;

impl ListOperation for Keep {
    fn apply(&self, _map: &ListTreeMap, tree: &[Node], _memory: &Tags) -> Result<Node, TreeError> {
        Ok(Node::List(tree.to_vec()))
    }
}

/// Replace the whole list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constant(pub Node);

impl ListOperation for Constant {
    fn apply(&self, _map: &ListTreeMap, _tree: &[Node], _memory: &Tags) -> Result<Node, TreeError> {
        Ok(self.0.clone())
    }
}

/// Nest the list one level down behind `prefix`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wrap(pub Vec<Node>);

impl ListOperation for Wrap {
    fn apply(&self, map: &ListTreeMap, tree: &[Node], memory: &Tags) -> Result<Node, TreeError> {
        let (head, rest) = split_opcode(tree, "wrap")?;
        let mut inner = vec![head.clone()];
        inner.extend(map.map_rest(rest, memory)?);
        let mut out = self.0.clone();
        out.push(Node::List(inner));
        Ok(Node::List(out))
    }
}

/// Drop the opcode, keep the mapped rest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Unwrap;

impl ListOperation for Unwrap {
    fn apply(&self, map: &ListTreeMap, tree: &[Node], memory: &Tags) -> Result<Node, TreeError> {
        let (_, rest) = split_opcode(tree, "unwrap")?;
        Ok(Node::List(map.map_rest(rest, memory)?))
    }
}

/// Remove the list entirely.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Prune;

impl ListOperation for Prune {
    fn apply(&self, _map: &ListTreeMap, _tree: &[Node], _memory: &Tags) -> Result<Node, TreeError> {
        Ok(Node::empty())
    }
}

/// Transform the list after its rest has been mapped.
#[derive(Clone)]
pub struct Postprocess(pub Rc<dyn Fn(Node) -> Node>);

impl Postprocess {
    pub fn new(f: impl Fn(Node) -> Node + 'static) -> Self {
        Self(Rc::new(f))
    }
}

impl ListOperation for Postprocess {
    fn apply(&self, map: &ListTreeMap, tree: &[Node], memory: &Tags) -> Result<Node, TreeError> {
        let (head, rest) = split_opcode(tree, "postprocess")?;
        let mut out = vec![head.clone()];
        out.extend(map.map_rest(rest, memory)?);
        Ok((self.0)(Node::List(out)))
    }
}

impl fmt::Debug for Postprocess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Postprocess")
    }
}

/// Transform the raw list, then map everything after its new head.
#[derive(Clone)]
pub struct Preprocess(pub Rc<dyn Fn(&[Node]) -> Vec<Node>>);

impl Preprocess {
    pub fn new(f: impl Fn(&[Node]) -> Vec<Node> + 'static) -> Self {
        Self(Rc::new(f))
    }
}

impl ListOperation for Preprocess {
    fn apply(&self, map: &ListTreeMap, tree: &[Node], memory: &Tags) -> Result<Node, TreeError> {
        let rewritten = (self.0)(tree);
        let Some((head, rest)) = rewritten.split_first() else {
            return Ok(Node::empty());
        };
        let mut out = vec![head.clone()];
        out.extend(map.map_rest(rest, memory)?);
        Ok(Node::List(out))
    }
}

impl fmt::Debug for Preprocess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Preprocess")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::tags;
    use pretty_assertions::assert_eq;

    fn t(text: &str) -> Node {
        Node::token(text)
    }

    fn l<const N: usize>(items: [Node; N]) -> Node {
        Node::list(items)
    }

    /// Records the memory it sees as a rule, without touching the rest.
    fn capture(_map: &ListTreeMap, tree: &[Node], memory: &Tags) -> Result<Node, TreeError> {
        let tag = tree[0].as_token().unwrap_or_default();
        Ok(Node::Rule(Rule::new(tag, memory.clone(), Vec::new())))
    }

    #[test]
    fn no_operations_leaves_tree_unchanged() {
        let tree = l([
            t("clause"),
            l([t("np"), t("the"), l([t("n"), t("man")])]),
            l([t("vp"), l([t("cloze"), l([t("v"), t("eat")])])]),
            l([]),
        ]);
        let mapped = ListTreeMap::new().map(&tree, &Tags::new()).unwrap();
        assert_eq!(mapped, tree);
    }

    #[test]
    fn tag_scope_ends_with_its_list() {
        let map = ListTreeMap::new()
            .with("passive", Tag::new(tags([("voice", "passive")]), false))
            .with("capture", capture);
        let tree = l([
            t("clause"),
            l([t("passive"), l([t("capture")])]),
            l([t("capture")]),
        ]);
        let memory = tags([("voice", "active")]);
        let mapped = map.map(&tree, &memory).unwrap();

        let expected = l([
            t("clause"),
            l([
                t("passive"),
                Node::Rule(Rule::new("capture", tags([("voice", "passive")]), vec![])),
            ]),
            Node::Rule(Rule::new("capture", tags([("voice", "active")]), vec![])),
        ]);
        assert_eq!(mapped, expected);
    }

    #[test]
    fn tag_applies_to_rest_of_enclosing_list() {
        let map = ListTreeMap::new()
            .with("past", Tag::new(tags([("tense", "past")]), true))
            .with("capture", capture);
        let tree = l([t("clause"), t("past"), l([t("capture")])]);
        let mapped = map.map(&tree, &Tags::new()).unwrap();
        assert_eq!(
            mapped,
            l([
                t("clause"),
                Node::Rule(Rule::new("capture", tags([("tense", "past")]), vec![])),
            ])
        );
    }

    #[test]
    fn reduce_snapshots_memory_and_flattens() {
        let map = ListTreeMap::new()
            .with("np", Reduce)
            .with("n", Reduce)
            .with("agent", Tag::new(tags([("role", "agent")]), true));
        let tree = l([t("agent"), t("np"), l([t("the")]), l([t("n"), t("man")])]);
        let mapped = map.map(&tree, &Tags::new()).unwrap().unwrap_singleton();

        let n = Rule::new("n", tags([("role", "agent")]), vec![t("man")]);
        let np = Rule::new("np", tags([("role", "agent")]), vec![t("the"), Node::Rule(n)]);
        assert_eq!(mapped, Node::Rule(np));
    }

    #[test]
    fn replace_splices_in_place_of_opcode() {
        let map = ListTreeMap::new().with("the", Replace(vec![l([t("art"), t("the")])]));
        let tree = l([t("np"), t("the"), l([t("n"), t("man")])]);
        let mapped = map.map(&tree, &Tags::new()).unwrap();
        assert_eq!(
            mapped,
            l([t("np"), l([t("art"), t("the")]), l([t("n"), t("man")])])
        );
    }

    #[test]
    fn wrap_nests_list_behind_prefix() {
        let map = ListTreeMap::new().with("v", Wrap(vec![t("cloze")]));
        let tree = l([t("vp"), l([t("v"), t("eat")])]);
        let mapped = map.map(&tree, &Tags::new()).unwrap();
        assert_eq!(mapped, l([t("vp"), l([t("cloze"), l([t("v"), t("eat")])])]));
    }

    #[test]
    fn unwrap_prune_and_constant() {
        let map = ListTreeMap::new()
            .with("group", Unwrap)
            .with("aside", Prune)
            .with("copula", Constant(l([t("v"), t("be")])));
        let tree = l([
            t("clause"),
            l([t("group"), t("a"), t("b")]),
            l([t("aside"), t("c")]),
            l([t("copula"), t("ignored")]),
        ]);
        let mapped = map.map(&tree, &Tags::new()).unwrap();
        assert_eq!(
            mapped,
            l([t("clause"), l([t("a"), t("b")]), l([]), l([t("v"), t("be")])])
        );
    }

    #[test]
    fn pre_and_postprocess() {
        let map = ListTreeMap::new()
            .with(
                "shout",
                Postprocess::new(|node| match node {
                    Node::List(items) => Node::List(items.into_iter().skip(1).collect()),
                    other => other,
                }),
            )
            .with(
                "reverse",
                Preprocess::new(|tree| tree[1..].iter().rev().cloned().collect()),
            );
        let tree = l([l([t("shout"), t("hey")]), l([t("reverse"), t("b"), t("a")])]);
        let mapped = map.map(&tree, &Tags::new()).unwrap();
        assert_eq!(mapped, l([l([t("hey")]), l([t("a"), t("b")])]));
    }

    #[test]
    fn reduce_requires_token_head() {
        let tree = [Node::Missing];
        let result = Reduce.apply(&ListTreeMap::new(), &tree, &Tags::new());
        assert!(matches!(result, Err(TreeError::Malformed { .. })));
    }

    #[test]
    fn operations_reject_empty_lists() {
        let map = ListTreeMap::new();
        let operations: Vec<Box<dyn ListOperation>> = vec![
            Box::new(Tag::new(Tags::new(), true)),
            Box::new(Reduce),
            Box::new(Replace(vec![])),
            Box::new(Wrap(vec![t("cloze")])),
            Box::new(Unwrap),
            Box::new(Postprocess::new(|node| node)),
        ];
        for operation in operations {
            assert!(matches!(
                operation.apply(&map, &[], &Tags::new()),
                Err(TreeError::Malformed { .. })
            ));
        }
    }

    #[test]
    fn keep_leaves_lemma_unrewritten() {
        let map = ListTreeMap::new()
            .with("the", Replace(vec![l([t("art"), t("the")])]))
            .with("art", Keep);
        let tree = l([t("np"), l([t("art"), t("the")]), t("the")]);
        let mapped = map.map(&tree, &Tags::new()).unwrap();
        assert_eq!(
            mapped,
            l([t("np"), l([t("art"), t("the")]), l([t("art"), t("the")])])
        );
    }

    #[test]
    fn forms_are_never_dispatched() {
        let map = ListTreeMap::new().with("present", Tag::new(tags([("tense", "present")]), true));
        let tree = l([t("n"), Node::form("present")]);
        assert_eq!(map.map(&tree, &Tags::new()).unwrap(), tree);
    }

    #[test]
    fn merged_maps_prefer_later_operations() {
        let first = ListTreeMap::new().with("the", Prune);
        let second = ListTreeMap::new().with("the", Unwrap);
        let merged = first.merged(&second);
        let mapped = merged.map(&l([t("the"), t("x")]), &Tags::new()).unwrap();
        assert_eq!(mapped, l([t("x")]));
        assert_eq!(merged.len(), 1);
    }
}
