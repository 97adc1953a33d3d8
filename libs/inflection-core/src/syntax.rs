//! Word order: places the children of clauses and noun phrases into a
//! language's declared slots.

use crate::error::TreeError;
use crate::lookup::DictLookup;
use crate::semantics::subjectivity_of;
use crate::tree::{Node, Rule, RuleTreeMap};
use serde::{Deserialize, Serialize};
use std::rc::Rc;

/// Tags that only decorate the phrase they enclose.
pub const WRAPPERS: &[&str] = &["cloze", "implicit", "parentheses"];

/// The rule that decides where `rule` goes: itself, or for a wrapper the
/// first rule it encloses.
pub fn syntactic_rule(rule: &Rule) -> &Rule {
    if WRAPPERS.contains(&rule.tag.as_str()) {
        if let Some(inner) = rule.rules().next() {
            return syntactic_rule(inner);
        }
    }
    rule
}

pub fn syntactic_tag(rule: &Rule) -> &str {
    &syntactic_rule(rule).tag
}

/// Slot orders of one language.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Structure {
    /// Clause slots, e.g. `["subject", "verb", "direct-object"]`.
    pub sentence: Vec<String>,
    /// Noun-phrase slots, e.g. `["art", "adj", "n"]`.
    pub noun_phrase: Vec<String>,
    /// `adjective-kind` values that lead the adjective slot, in order.
    #[serde(default)]
    pub adjective_precedence: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct RuleSyntax {
    structure: Structure,
    subjectivity: Rc<DictLookup<String>>,
}

impl RuleSyntax {
    pub fn new(structure: Structure, subjectivity: Rc<DictLookup<String>>) -> Self {
        Self {
            structure,
            subjectivity,
        }
    }

    pub fn structure(&self) -> &Structure {
        &self.structure
    }

    /// The clause slot of `child`, if it has one.
    pub fn clause_slot(&self, child: &Node) -> Result<Option<String>, TreeError> {
        let Some(rule) = child.as_rule() else {
            return Ok(None);
        };
        let inner = syntactic_rule(rule);
        match inner.tag.as_str() {
            "vp" => Ok(Some("verb".to_string())),
            "np" => {
                let subjectivity = match inner.get("subjectivity") {
                    Some(subjectivity) => Some(subjectivity.to_string()),
                    None => match inner.get("role") {
                        Some(role) => subjectivity_of(&self.subjectivity, role, &inner.tags)?,
                        None => None,
                    },
                };
                Ok(subjectivity.map(|subjectivity| {
                    let clitic = format!("{}-pronoun", subjectivity);
                    if inner.get("noun-form") == Some("pronoun") && self.structure.sentence.contains(&clitic) {
                        clitic
                    } else {
                        subjectivity
                    }
                }))
            }
            _ => Ok(None),
        }
    }

    /// Reorder the children of a clause into sentence slots.
    pub fn order_clause(&self, map: &RuleTreeMap, rule: &Rule) -> Result<Node, TreeError> {
        let slots = rule
            .content
            .iter()
            .map(|child| self.clause_slot(child))
            .collect::<Result<Vec<_>, _>>()?;
        let order = arrange(&slots, &self.structure.sentence);
        let content = order
            .into_iter()
            .map(|i| map.map(&rule.content[i]))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Node::Rule(rule.with_content(content)))
    }

    /// Reorder the children of a noun phrase into noun-phrase slots.
    pub fn order_noun_phrase(&self, map: &RuleTreeMap, rule: &Rule) -> Result<Node, TreeError> {
        let slots: Vec<Option<String>> = rule
            .content
            .iter()
            .map(|child| child.as_rule().map(|r| syntactic_tag(r).to_string()))
            .collect();
        let mut order = arrange(&slots, &self.structure.noun_phrase);
        let precedence = &self.structure.adjective_precedence;
        if !precedence.is_empty() {
            let adjectives: Vec<usize> = order
                .iter()
                .copied()
                .filter(|&i| slots[i].as_deref() == Some("adj"))
                .collect();
            let mut ranked = adjectives.clone();
            ranked.sort_by_key(|&i| {
                rule.content[i]
                    .as_rule()
                    .and_then(|r| syntactic_rule(r).get("adjective-kind"))
                    .and_then(|kind| precedence.iter().position(|p| p == kind))
                    .unwrap_or(precedence.len())
            });
            let mut ranked = ranked.into_iter();
            for position in order.iter_mut() {
                if adjectives.contains(position) {
                    if let Some(next) = ranked.next() {
                        *position = next;
                    }
                }
            }
        }
        let content = order
            .into_iter()
            .map(|i| map.map(&rule.content[i]))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Node::Rule(rule.with_content(content)))
    }

    /// `clause` and `np` reordering over this syntax.
    pub fn operations(self: &Rc<Self>) -> RuleTreeMap {
        let clause = Rc::clone(self);
        let noun_phrase = Rc::clone(self);
        RuleTreeMap::new()
            .with("clause", move |map: &RuleTreeMap, rule: &Rule| clause.order_clause(map, rule))
            .with("np", move |map: &RuleTreeMap, rule: &Rule| noun_phrase.order_noun_phrase(map, rule))
    }
}

/// Indices of `slots` grouped by `structure`, then the unplaced ones in order.
fn arrange(slots: &[Option<String>], structure: &[String]) -> Vec<usize> {
    let mut order = Vec::with_capacity(slots.len());
    for slot in structure {
        order.extend(
            slots
                .iter()
                .enumerate()
                .filter(|(_, s)| s.as_ref() == Some(slot))
                .map(|(i, _)| i),
        );
    }
    let unplaced: Vec<usize> = (0..slots.len()).filter(|i| !order.contains(i)).collect();
    order.extend(unplaced);
    order
}
