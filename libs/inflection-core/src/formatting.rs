//! Final passes over a rule tree: validation and rendering to text.

use crate::error::TreeError;
use crate::tree::{Node, Rule, RuleOperation, RuleTreeMap};

/// Whether every leaf of `node` holds a form.
pub fn validate(node: &Node) -> bool {
    match node {
        Node::Missing => false,
        Node::Token(_) | Node::Form(_) => true,
        Node::List(items) => items.iter().all(validate),
        Node::Rule(rule) => rule.content.iter().all(validate),
    }
}

/// Renders rules to text. Unregistered tags join their children with spaces.
#[derive(Debug, Clone)]
pub struct RuleFormatting {
    map: RuleTreeMap,
}

impl Default for RuleFormatting {
    fn default() -> Self {
        Self {
            map: RuleTreeMap::new()
                .with_default(join)
                .with("cloze", cloze)
                .with("implicit", parenthesize)
                .with("parentheses", parenthesize),
        }
    }
}

impl RuleFormatting {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a formatter for `tag`; it must return a [`Node::Token`].
    pub fn with(mut self, tag: impl Into<String>, operation: impl RuleOperation + 'static) -> Self {
        self.map = self.map.with(tag, operation);
        self
    }

    pub fn format(&self, node: &Node) -> Result<String, TreeError> {
        text(&self.map, std::slice::from_ref(node))
    }
}

/// Space-joined text of `nodes`, skipping empty pieces.
pub fn text(map: &RuleTreeMap, nodes: &[Node]) -> Result<String, TreeError> {
    let mut pieces: Vec<String> = Vec::new();
    for node in nodes {
        let piece = match node {
            Node::Token(text) | Node::Form(text) => text.clone(),
            Node::Missing => String::new(),
            Node::List(items) => text(map, items)?,
            Node::Rule(rule) => match map.map_rule(rule)? {
                Node::Token(rendered) | Node::Form(rendered) => rendered,
                other => {
                    return Err(TreeError::Malformed {
                        opcode: rule.tag.clone(),
                        reason: format!("formatter returned {} instead of text", other),
                    })
                }
            },
        };
        if !piece.is_empty() {
            pieces.push(piece);
        }
    }
    Ok(pieces.join(" "))
}

fn join(map: &RuleTreeMap, rule: &Rule) -> Result<Node, TreeError> {
    Ok(Node::Token(text(map, &rule.content)?))
}

fn cloze(map: &RuleTreeMap, rule: &Rule) -> Result<Node, TreeError> {
    let id = rule.get("id").unwrap_or("1");
    Ok(Node::Token(format!("{{{{c{}::{}}}}}", id, text(map, &rule.content)?)))
}

fn parenthesize(map: &RuleTreeMap, rule: &Rule) -> Result<Node, TreeError> {
    Ok(Node::Token(format!("({})", text(map, &rule.content)?)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{tags, Tags};

    fn rule(tag: &str, content: Vec<Node>) -> Node {
        Node::Rule(Rule::new(tag, Tags::new(), content))
    }

    #[test]
    fn cloze_renders_anki_markup() {
        let node = Node::Rule(Rule::new(
            "cloze",
            tags([("id", "1")]),
            vec![Node::token("foo"), Node::token("bar")],
        ));
        assert_eq!(RuleFormatting::new().format(&node).unwrap(), "{{c1::foo bar}}");
    }

    #[test]
    fn cloze_id_defaults_to_one() {
        let node = rule("cloze", vec![Node::token("ate")]);
        assert_eq!(RuleFormatting::new().format(&node).unwrap(), "{{c1::ate}}");
    }

    #[test]
    fn nested_rules_join_with_single_spaces() {
        let node = rule(
            "clause",
            vec![
                rule("np", vec![rule("art", vec![Node::token("the")]), rule("n", vec![Node::token("man")])]),
                rule("vp", vec![rule("cloze", vec![rule("v", vec![Node::token("ate")])])]),
                rule("implicit", vec![Node::token("it")]),
                rule("adj", vec![Node::token("")]),
            ],
        );
        assert_eq!(
            RuleFormatting::new().format(&node).unwrap(),
            "the man {{c1::ate}} (it)"
        );
    }

    #[test]
    fn custom_formatter_overrides_default() {
        let formatting = RuleFormatting::new().with("n", |_: &RuleTreeMap, rule: &Rule| -> Result<Node, TreeError> {
            Ok(Node::token(format!("<b>{}</b>", rule.content.len())))
        });
        let node = rule("np", vec![rule("n", vec![Node::token("man")])]);
        assert_eq!(formatting.format(&node).unwrap(), "<b>1</b>");
    }

    #[test]
    fn validation_finds_missing_leaves() {
        let good = rule("clause", vec![rule("v", vec![Node::token("is")])]);
        let bad = rule("clause", vec![rule("v", vec![Node::Missing])]);
        assert!(validate(&good));
        assert!(validate(&rule("n", vec![Node::form("men")])));
        assert!(!validate(&bad));
        assert!(!validate(&Node::list([Node::token("a"), Node::Missing])));
    }
}
