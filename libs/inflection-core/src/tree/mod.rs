//! Syntax trees and the interpreters that rewrite them.
//!
//! Templates start life as nested lists of tokens ([`Node::List`]). A
//! [`ListTreeMap`] pass dispatches on the head token of each list; the
//! reduction pass turns tagged lists into [`Rule`]s, after which
//! [`RuleTreeMap`] passes reorder and format them. Words looked up in a
//! grammar table come back as [`Node::Form`], which no interpreter ever
//! treats as an opcode.

pub mod list;
pub mod rule;

pub use list::{
    Constant, Keep, ListOperation, ListTreeMap, Postprocess, Preprocess, Prune, Reduce, Replace,
    Tag, Unwrap, Wrap,
};
pub use rule::{RuleOperation, RuleTreeMap};

use crate::types::Tags;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A tree node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Node {
    Token(String),
    /// An inflected word. Rendered as text, never dispatched on.
    Form(String),
    List(Vec<Node>),
    Rule(Rule),
    /// A form the grammar does not have.
    Missing,
}

impl Node {
    pub fn token(text: impl Into<String>) -> Self {
        Node::Token(text.into())
    }

    pub fn form(text: impl Into<String>) -> Self {
        Node::Form(text.into())
    }

    pub fn list(items: impl IntoIterator<Item = Node>) -> Self {
        Node::List(items.into_iter().collect())
    }

    pub fn empty() -> Self {
        Node::List(Vec::new())
    }

    pub fn as_token(&self) -> Option<&str> {
        match self {
            Node::Token(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_rule(&self) -> Option<&Rule> {
        match self {
            Node::Rule(rule) => Some(rule),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Node::Missing)
    }

    /// Push into `out`, splicing the items of a list.
    pub fn spread_into(self, out: &mut Vec<Node>) {
        match self {
            Node::List(items) => out.extend(items),
            other => out.push(other),
        }
    }

    /// Leaves and rules in order, with every level of list nesting removed.
    pub fn flatten(self) -> Vec<Node> {
        let mut out = Vec::new();
        self.flatten_into(&mut out);
        out
    }

    fn flatten_into(self, out: &mut Vec<Node>) {
        match self {
            Node::List(items) => {
                for item in items {
                    item.flatten_into(out);
                }
            }
            other => out.push(other),
        }
    }

    /// Unwrap single-item lists until something else is reached.
    pub fn unwrap_singleton(self) -> Node {
        match self {
            Node::List(mut items) if items.len() == 1 => items.remove(0).unwrap_singleton(),
            other => other,
        }
    }
}

impl From<&str> for Node {
    fn from(text: &str) -> Self {
        Node::Token(text.to_string())
    }
}

impl From<Rule> for Node {
    fn from(rule: Rule) -> Self {
        Node::Rule(rule)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Token(text) | Node::Form(text) => write!(f, "{}", text),
            Node::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Node::Rule(rule) => write!(f, "{}", rule),
            Node::Missing => write!(f, "?"),
        }
    }
}

/// A reduced node: a syntactic tag, the context it was reduced under, and
/// its children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub tag: String,
    pub tags: Tags,
    pub content: Vec<Node>,
}

impl Rule {
    pub fn new(tag: impl Into<String>, tags: Tags, content: Vec<Node>) -> Self {
        Self {
            tag: tag.into(),
            tags,
            content,
        }
    }

    /// Same tag and context, new children.
    pub fn with_content(&self, content: Vec<Node>) -> Self {
        Self {
            tag: self.tag.clone(),
            tags: self.tags.clone(),
            content,
        }
    }

    /// Value of a context tag.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }

    /// Child rules, skipping words.
    pub fn rules(&self) -> impl Iterator<Item = &Rule> {
        self.content.iter().filter_map(Node::as_rule)
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.tag)?;
        for (i, child) in self.content.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", child)?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::tags;
    use pretty_assertions::assert_eq;

    #[test]
    fn flatten_removes_all_list_levels() {
        let rule = Rule::new("n", Tags::new(), vec![Node::token("man")]);
        let tree = Node::list([
            Node::token("a"),
            Node::list([Node::list([Node::token("b")]), Node::Rule(rule.clone())]),
            Node::empty(),
        ]);
        assert_eq!(
            tree.flatten(),
            vec![Node::token("a"), Node::token("b"), Node::Rule(rule)]
        );
    }

    #[test]
    fn spread_splices_lists_only() {
        let mut out = vec![Node::token("head")];
        Node::list([Node::token("x"), Node::token("y")]).spread_into(&mut out);
        Node::Missing.spread_into(&mut out);
        assert_eq!(
            out,
            vec![Node::token("head"), Node::token("x"), Node::token("y"), Node::Missing]
        );
    }

    #[test]
    fn display_shows_structure() {
        let rule = Rule::new(
            "np",
            tags([("role", "agent")]),
            vec![Node::token("the"), Node::token("man")],
        );
        let tree = Node::list([Node::token("clause"), Node::Rule(rule), Node::form("ate"), Node::Missing]);
        assert_eq!(tree.to_string(), "[clause np(the man) ate ?]");
    }

    #[test]
    fn unwrap_singleton_descends() {
        let rule = Node::Rule(Rule::new("clause", Tags::new(), vec![]));
        let wrapped = Node::list([Node::list([rule.clone()])]);
        assert_eq!(wrapped.unwrap_singleton(), rule);
    }
}
