//! Rule-tree interpreter.

use super::{Node, Rule};
use crate::error::TreeError;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

/// A rewrite invoked for rules carrying its tag.
pub trait RuleOperation {
    fn apply(&self, map: &RuleTreeMap, rule: &Rule) -> Result<Node, TreeError>;
}

impl<F> RuleOperation for F
where
    F: Fn(&RuleTreeMap, &Rule) -> Result<Node, TreeError>,
{
    fn apply(&self, map: &RuleTreeMap, rule: &Rule) -> Result<Node, TreeError> {
        self(map, rule)
    }
}

/// Tag table for one rule-tree pass.
///
/// Rules with no registered operation go to the default operation if one is
/// set, otherwise they are rebuilt around their mapped children.
#[derive(Clone, Default)]
pub struct RuleTreeMap {
    operations: BTreeMap<String, Rc<dyn RuleOperation>>,
    default: Option<Rc<dyn RuleOperation>>,
}

impl RuleTreeMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, tag: impl Into<String>, operation: impl RuleOperation + 'static) -> Self {
        self.operations.insert(tag.into(), Rc::new(operation));
        self
    }

    pub fn with_default(mut self, operation: impl RuleOperation + 'static) -> Self {
        self.default = Some(Rc::new(operation));
        self
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.operations.contains_key(tag)
    }

    pub fn map(&self, node: &Node) -> Result<Node, TreeError> {
        match node {
            Node::Rule(rule) => self.map_rule(rule),
            Node::List(items) => Ok(Node::List(self.map_all(items)?)),
            other => Ok(other.clone()),
        }
    }

    pub fn map_rule(&self, rule: &Rule) -> Result<Node, TreeError> {
        match self.operations.get(&rule.tag).or(self.default.as_ref()) {
            Some(operation) => operation.apply(self, rule),
            None => Ok(Node::Rule(rule.with_content(self.map_content(rule)?))),
        }
    }

    /// The children of `rule`, each mapped.
    pub fn map_content(&self, rule: &Rule) -> Result<Vec<Node>, TreeError> {
        self.map_all(&rule.content)
    }

    fn map_all(&self, nodes: &[Node]) -> Result<Vec<Node>, TreeError> {
        nodes.iter().map(|node| self.map(node)).collect()
    }
}

impl fmt::Debug for RuleTreeMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleTreeMap")
            .field("tags", &self.operations.keys().collect::<Vec<_>>())
            .field("default", &self.default.is_some())
            .finish()
    }
}
