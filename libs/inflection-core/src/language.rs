//! A language: the ordered passes that turn a template into a sentence.
//!
//! 1. substitution: literal rewrites such as `the` to `[art the]`
//! 2. inflection: markers set context, inflection opcodes look up forms
//! 3. reduction: markers are dropped and syntactic tags become rules
//! 4. syntax: clauses and noun phrases are put in order
//! 5. validation: any missing form rejects the sentence
//! 6. formatting: rules are rendered to text

use crate::error::TreeError;
use crate::formatting::{validate, RuleFormatting};
use crate::grammar::{Inflection, ListGrammar};
use crate::semantics::ListSemantics;
use crate::syntax::RuleSyntax;
use crate::tree::{Keep, ListTreeMap, Node, Reduce, Replace, RuleTreeMap};
use crate::types::Tags;
use std::rc::Rc;

/// Tags reduced into rules.
pub const SYNTACTIC_TAGS: &[&str] = &[
    "clause",
    "cloze",
    "implicit",
    "parentheses",
    "np",
    "vp",
    "n",
    "v",
    "art",
    "adj",
    "stock-adposition",
];

/// Determiner rewrites every language starts from.
///
/// Lists headed by an inflection opcode are left as written, so the lemma
/// in `[art the]` stays a lemma.
pub fn default_substitutions() -> ListTreeMap {
    let mut map = ListTreeMap::new()
        .with("the", Replace(vec![Node::list([Node::token("art"), Node::token("the")])]))
        .with("a", Replace(vec![Node::list([Node::token("art"), Node::token("a")])]));
    for kind in Inflection::ALL {
        map.insert(kind.opcode(), Keep);
    }
    map
}

#[derive(Debug, Clone)]
pub struct Language {
    name: String,
    substitution: ListTreeMap,
    inflection: ListTreeMap,
    reduction: ListTreeMap,
    syntax: RuleTreeMap,
    formatting: RuleFormatting,
    validation: bool,
}

impl Language {
    pub fn new(
        name: impl Into<String>,
        grammar: ListGrammar,
        semantics: ListSemantics,
        syntax: RuleSyntax,
    ) -> Self {
        let mut inflection = semantics.operations(false);
        inflection.extend(&Rc::new(grammar).operations());

        let mut reduction = semantics.operations(true);
        for tag in SYNTACTIC_TAGS {
            reduction.insert(*tag, Reduce);
        }

        Self {
            name: name.into(),
            substitution: default_substitutions(),
            inflection,
            reduction,
            syntax: Rc::new(syntax).operations(),
            formatting: RuleFormatting::default(),
            validation: true,
        }
    }

    /// Layer language substitutions over the defaults.
    pub fn with_substitutions(mut self, substitutions: &ListTreeMap) -> Self {
        self.substitution.extend(substitutions);
        self
    }

    pub fn with_formatting(mut self, formatting: RuleFormatting) -> Self {
        self.formatting = formatting;
        self
    }

    /// Toggle rejection of sentences with missing forms.
    pub fn with_validation(mut self, validation: bool) -> Self {
        self.validation = validation;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Render `tree` at the point `memory` describes.
    ///
    /// `Ok(None)` means the point has no sentence: some form it needs is not
    /// in the tables.
    pub fn map(&self, tree: &Node, memory: &Tags) -> Result<Option<String>, TreeError> {
        let substituted = self.substitution.map(tree, memory)?;
        let inflected = self.inflection.map(&substituted, memory)?;
        let reduced = match self.reduction.map(&inflected, memory)?.unwrap_singleton() {
            Node::Rule(rule) => rule,
            other => {
                return Err(TreeError::Malformed {
                    opcode: "reduction".to_string(),
                    reason: format!("expected a single rule, got {}", other),
                })
            }
        };
        let ordered = self.syntax.map_rule(&reduced)?;
        if self.validation && !validate(&ordered) {
            return Ok(None);
        }
        self.formatting.format(&ordered).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indexing::DictTupleIndexing;
    use crate::lookup::DictLookup;
    use crate::parser::parse_template;
    use crate::semantics::default_subjectivity;
    use crate::syntax::Structure;
    use crate::tree::Wrap;
    use crate::types::{tags, Dictkey};
    use pretty_assertions::assert_eq;

    fn table(name: &str, axes: &[&str], rows: &[(&[(&str, &str)], &str)]) -> DictLookup<String> {
        let mut lookup = DictLookup::new(name, DictTupleIndexing::new(axes.iter().copied()));
        for (point, form) in rows {
            let key: Dictkey = point.iter().copied().collect();
            lookup.insert(&key, form.to_string()).unwrap();
        }
        lookup
    }

    fn english() -> Language {
        let conjugation = table(
            "finite-conjugations",
            &["verb", "person", "number", "tense"],
            &[
                (&[("verb", "eat"), ("person", "3"), ("number", "singular"), ("tense", "present")], "eats"),
                (&[("verb", "eat"), ("person", "3"), ("number", "singular"), ("tense", "past")], "ate"),
                (&[("verb", "be"), ("person", "1"), ("number", "singular"), ("tense", "present")], "am"),
            ],
        );
        let declension = table(
            "declensions",
            &["noun", "number", "case"],
            &[
                (&[("noun", "man"), ("number", "singular"), ("case", "nominative")], "man"),
                (&[("noun", "apple"), ("number", "singular"), ("case", "oblique")], "apple"),
                (&[("noun", "I"), ("number", "singular"), ("case", "nominative")], "I"),
                (&[("noun", "present"), ("number", "singular"), ("case", "nominative")], "present"),
            ],
        );
        let subjectivity = Rc::new(default_subjectivity());
        let semantics = ListSemantics::new(
            Rc::clone(&subjectivity),
            tags([("subject", "nominative"), ("direct-object", "oblique")]),
        );
        let syntax = RuleSyntax::new(
            Structure {
                sentence: vec!["subject".into(), "verb".into(), "direct-object".into()],
                noun_phrase: vec!["art".into(), "adj".into(), "n".into()],
                adjective_precedence: vec![],
            },
            subjectivity,
        );
        Language::new("english", ListGrammar::new(conjugation, declension), semantics, syntax)
    }

    fn point(person: &str, tense: &str) -> Tags {
        tags([("person", person), ("number", "singular"), ("tense", tense)])
    }

    #[test]
    fn renders_ordered_inflected_cloze_sentence() {
        let tree = parse_template(
            "[clause [patient np the [n apple]] [vp [cloze [v eat]]] [agent np the [n man]]]",
        )
        .unwrap();
        let sentence = english().map(&tree, &point("3", "past")).unwrap();
        assert_eq!(sentence.as_deref(), Some("the man {{c1::ate}} the apple"));
    }

    #[test]
    fn missing_form_yields_no_sentence() {
        let tree = parse_template("[clause [agent np [n I]] [vp [cloze [v be]]]]").unwrap();
        let language = english();
        assert_eq!(
            language.map(&tree, &point("1", "present")).unwrap().as_deref(),
            Some("I {{c1::am}}")
        );
        assert_eq!(language.map(&tree, &point("2", "present")).unwrap(), None);
    }

    #[test]
    fn without_validation_gaps_render_empty() {
        let tree = parse_template("[clause [agent np [n I]] [vp [cloze [v be]]]]").unwrap();
        let language = english().with_validation(false);
        assert_eq!(
            language.map(&tree, &point("2", "present")).unwrap().as_deref(),
            Some("I {{c1::}}")
        );
    }

    #[test]
    fn markers_set_context_without_appearing() {
        let tree = parse_template("[clause past [agent np the [n man]] [vp [v eat]]]").unwrap();
        let memory = tags([("person", "3"), ("number", "singular"), ("tense", "present")]);
        assert_eq!(
            english().map(&tree, &memory).unwrap().as_deref(),
            Some("the man ate")
        );
    }

    #[test]
    fn words_spelled_like_markers_stay_words() {
        let tree = parse_template("[clause [agent np the [adj perfect] [n present]] [vp [v eat]]]").unwrap();
        assert_eq!(
            english().map(&tree, &point("3", "present")).unwrap().as_deref(),
            Some("the perfect present eats")
        );
    }

    #[test]
    fn explicit_article_is_not_substituted_again() {
        let tree = parse_template("[clause [agent np [art the] [n man]] [vp [v eat]]]").unwrap();
        assert_eq!(
            english().map(&tree, &point("3", "present")).unwrap().as_deref(),
            Some("the man eats")
        );
    }

    #[test]
    fn language_substitutions_layer_over_defaults() {
        let substitutions = ListTreeMap::new().with("v", Wrap(vec![Node::token("cloze")]));
        let language = english().with_substitutions(&substitutions);
        let tree = parse_template("[clause [agent np the [n man]] [vp [v eat]]]").unwrap();
        assert_eq!(
            language.map(&tree, &point("3", "present")).unwrap().as_deref(),
            Some("the man {{c1::eats}}")
        );
    }

    #[test]
    fn unreduced_tree_is_malformed() {
        let tree = parse_template("[foo bar]").unwrap();
        assert!(matches!(
            english().map(&tree, &Tags::new()),
            Err(TreeError::Malformed { .. })
        ));
    }
}
