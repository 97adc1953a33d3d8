//! Core inflection engine shared by the card generators.
//!
//! Provides:
//! - Named-axis indexing (dictkeys, tuplekeys) and lookups with ambiguity detection
//! - Point containers with set algebra (`DictSet`, `DictSpace`, `DictList`)
//! - List and rule tree interpreters with a library of rewrite operations
//! - Grammar, semantics, syntax and formatting passes composed into a `Language`
//! - Table parsing, annotation and population

pub mod annotation;
pub mod error;
pub mod formatting;
pub mod grammar;
pub mod indexing;
pub mod language;
pub mod lookup;
pub mod parser;
pub mod population;
pub mod semantics;
pub mod space;
pub mod syntax;
pub mod tree;
pub mod types;

pub use annotation::{tagaxis, CellAnnotation, TableAnnotation};
pub use error::{IndexError, LookupError, ParseError, PopulationError, StoreError, TreeError};
pub use formatting::{validate, RuleFormatting};
pub use grammar::{Inflection, ListGrammar};
pub use indexing::{DictKeyIndexing, DictTupleIndexing, Indexing};
pub use language::{default_substitutions, Language};
pub use lookup::{DefaultDictLookup, DictLookup, FallbackDictLookup, Lookup, NestedDictLookup};
pub use parser::{parse_template, parse_tsv};
pub use population::{FlatLookupPopulation, NestedLookupPopulation};
pub use semantics::{default_subjectivity, ListSemantics};
pub use space::{DictList, DictSet, DictSpace, Region};
pub use syntax::{RuleSyntax, Structure};
pub use tree::{ListOperation, ListTreeMap, Node, Rule, RuleOperation, RuleTreeMap};
pub use types::{tags, Dictkey, Tags, Tuplekey};
