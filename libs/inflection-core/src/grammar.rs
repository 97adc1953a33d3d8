//! Inflection tables and the list operations that consult them.

use crate::error::{LookupError, TreeError};
use crate::lookup::Lookup;
use crate::tree::{ListOperation, ListTreeMap, Node};
use crate::types::{Dictkey, Tags};
use std::fmt;
use std::rc::Rc;

type Table = Box<dyn Lookup<Value = String>>;

/// What an inflection opcode inflects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Inflection {
    Verb,
    Noun,
    Article,
    Adjective,
    StockAdposition,
}

impl Inflection {
    pub const ALL: [Inflection; 5] = [
        Inflection::Verb,
        Inflection::Noun,
        Inflection::Article,
        Inflection::Adjective,
        Inflection::StockAdposition,
    ];

    pub fn opcode(self) -> &'static str {
        match self {
            Inflection::Verb => "v",
            Inflection::Noun => "n",
            Inflection::Article => "art",
            Inflection::Adjective => "adj",
            Inflection::StockAdposition => "stock-adposition",
        }
    }

    /// Axis naming the lemma, for kinds that take one.
    pub fn lemma_axis(self) -> Option<&'static str> {
        match self {
            Inflection::Verb => Some("verb"),
            Inflection::Noun => Some("noun"),
            Inflection::Article => Some("article"),
            Inflection::Adjective => Some("adjective"),
            Inflection::StockAdposition => None,
        }
    }
}

/// The inflection tables of one language.
///
/// Fixed `tags` fill axes the context leaves open, e.g. `verb-form: finite`
/// for a grammar built over finite conjugations only.
pub struct ListGrammar {
    conjugation: Table,
    declension: Table,
    articles: Option<Table>,
    adjectives: Option<Table>,
    adpositions: Option<Table>,
    tags: Tags,
}

impl ListGrammar {
    pub fn new<C, D>(conjugation: C, declension: D) -> Self
    where
        C: Lookup<Value = String> + 'static,
        D: Lookup<Value = String> + 'static,
    {
        Self {
            conjugation: Box::new(conjugation),
            declension: Box::new(declension),
            articles: None,
            adjectives: None,
            adpositions: None,
            tags: Tags::new(),
        }
    }

    pub fn with_articles(mut self, articles: impl Lookup<Value = String> + 'static) -> Self {
        self.articles = Some(Box::new(articles));
        self
    }

    pub fn with_adjectives(mut self, adjectives: impl Lookup<Value = String> + 'static) -> Self {
        self.adjectives = Some(Box::new(adjectives));
        self
    }

    pub fn with_adpositions(mut self, adpositions: impl Lookup<Value = String> + 'static) -> Self {
        self.adpositions = Some(Box::new(adpositions));
        self
    }

    pub fn with_tags(mut self, tags: Tags) -> Self {
        self.tags = tags;
        self
    }

    fn key(&self, memory: &Tags, lemma: Option<(&str, &str)>) -> Dictkey {
        let mut point = self.tags.clone();
        point.extend(memory.iter().map(|(k, v)| (k.clone(), v.clone())));
        if let Some((axis, value)) = lemma {
            point.insert(axis.to_string(), value.to_string());
        }
        Dictkey::from(&point)
    }

    fn resolve(table: &dyn Lookup<Value = String>, key: &Dictkey) -> Result<Option<String>, LookupError> {
        match table.lookup(key) {
            Ok(form) => Ok(Some(form)),
            Err(error) if error.is_not_found() => Ok(None),
            Err(error) => Err(error),
        }
    }

    /// The form of `verb` at the point `memory` describes, if the table has one.
    pub fn conjugate(&self, memory: &Tags, verb: &str) -> Result<Option<String>, LookupError> {
        Self::resolve(self.conjugation.as_ref(), &self.key(memory, Some(("verb", verb))))
    }

    pub fn decline(&self, memory: &Tags, noun: &str) -> Result<Option<String>, LookupError> {
        Self::resolve(self.declension.as_ref(), &self.key(memory, Some(("noun", noun))))
    }

    /// Without an article table the lemma is its own form.
    pub fn inflect_article(&self, memory: &Tags, article: &str) -> Result<Option<String>, LookupError> {
        match &self.articles {
            Some(table) => Self::resolve(table.as_ref(), &self.key(memory, Some(("article", article)))),
            None => Ok(Some(article.to_string())),
        }
    }

    /// Without an adjective table the lemma is its own form.
    pub fn inflect_adjective(&self, memory: &Tags, adjective: &str) -> Result<Option<String>, LookupError> {
        match &self.adjectives {
            Some(table) => Self::resolve(table.as_ref(), &self.key(memory, Some(("adjective", adjective)))),
            None => Ok(Some(adjective.to_string())),
        }
    }

    /// The adposition that marks the context's case or role, if any.
    ///
    /// Languages without an adposition table mark nothing.
    pub fn stock_adposition(&self, memory: &Tags) -> Result<Option<String>, LookupError> {
        match &self.adpositions {
            Some(table) => Self::resolve(table.as_ref(), &self.key(memory, None)),
            None => Ok(Some(String::new())),
        }
    }

    /// Inflect `lemma`, or whatever `memory` describes when there is none.
    ///
    /// Tables indexed without a lemma axis (pronouns, for instance) are
    /// queried by context alone.
    pub fn inflect(&self, kind: Inflection, memory: &Tags, lemma: Option<&str>) -> Result<Option<String>, LookupError> {
        let Some(axis) = kind.lemma_axis() else {
            return self.stock_adposition(memory);
        };
        let table = match kind {
            Inflection::Verb => Some(&self.conjugation),
            Inflection::Noun => Some(&self.declension),
            Inflection::Article => self.articles.as_ref(),
            Inflection::Adjective => self.adjectives.as_ref(),
            Inflection::StockAdposition => None,
        };
        match (table, lemma) {
            (Some(table), _) => Self::resolve(table.as_ref(), &self.key(memory, lemma.map(|l| (axis, l)))),
            (None, Some(lemma)) => Ok(Some(lemma.to_string())),
            (None, None) => Ok(memory.get(axis).cloned()),
        }
    }

    /// `v`, `n`, `art`, `adj` and `stock-adposition` over this grammar.
    pub fn operations(self: &Rc<Self>) -> ListTreeMap {
        Inflection::ALL
            .into_iter()
            .fold(ListTreeMap::new(), |map, kind| {
                map.with(
                    kind.opcode(),
                    InflectionOperation {
                        grammar: Rc::clone(self),
                        kind,
                    },
                )
            })
    }
}

impl fmt::Debug for ListGrammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListGrammar")
            .field("articles", &self.articles.is_some())
            .field("adjectives", &self.adjectives.is_some())
            .field("adpositions", &self.adpositions.is_some())
            .field("tags", &self.tags)
            .finish_non_exhaustive()
    }
}

/// Replaces the lemma after its opcode with the inflected [`Node::Form`],
/// or [`Node::Missing`] when the table has none.
#[derive(Debug, Clone)]
pub struct InflectionOperation {
    grammar: Rc<ListGrammar>,
    kind: Inflection,
}

impl ListOperation for InflectionOperation {
    fn apply(&self, map: &ListTreeMap, tree: &[Node], memory: &Tags) -> Result<Node, TreeError> {
        let Some((opcode, rest)) = tree.split_first() else {
            return Err(TreeError::Malformed {
                opcode: self.kind.opcode().to_string(),
                reason: "empty list".to_string(),
            });
        };
        let (lemma, tail) = match (self.kind.lemma_axis(), rest.split_first()) {
            (Some(_), Some((Node::Token(lemma), tail))) => (Some(lemma.as_str()), tail),
            _ => (None, rest),
        };
        let form = self.grammar.inflect(self.kind, memory, lemma)?;
        let mut out = vec![opcode.clone(), form.map(Node::Form).unwrap_or(Node::Missing)];
        out.extend(map.map_rest(tail, memory)?);
        Ok(Node::List(out))
    }
}
