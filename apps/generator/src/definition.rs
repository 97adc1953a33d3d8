//! `language.json`: everything the generator needs to know about a language.

use std::collections::BTreeMap;
use std::path::Path;

use inflection_core::{Structure, Tags};
use serde::{Deserialize, Serialize};

use crate::error::{GeneratorError, Result};

/// File name of the definition inside a language directory.
pub const DEFINITION_FILE: &str = "language.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageDefinition {
    pub name: String,
    pub structure: Structure,
    /// Seme opcodes and the tags each sets.
    #[serde(default)]
    pub semes: BTreeMap<String, Tags>,
    /// Case taken by each subjectivity.
    #[serde(default)]
    pub cases: Tags,
    /// Axis values the grammar assumes when the context has none.
    #[serde(default)]
    pub grammar_tags: Tags,
    /// Opcode rewrites, as template text spliced in place of the opcode.
    #[serde(default)]
    pub substitutions: BTreeMap<String, String>,
    /// Term vocabulary per axis, for grid tables.
    #[serde(default)]
    pub vocabulary: BTreeMap<String, Vec<String>>,
    pub lookups: Vec<LookupDefinition>,
    pub tables: Vec<TableDefinition>,
    pub decks: Vec<DeckDefinition>,
}

impl LanguageDefinition {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| GeneratorError::io(path, e))?;
        serde_json::from_str(&content).map_err(|source| GeneratorError::Json {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// The grammar lookup a table feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LookupTarget {
    Conjugation,
    Declension,
    Articles,
    Adjectives,
    Adpositions,
}

/// Shape of one grammar lookup: flat over `axes`, or nested by `key`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LookupDefinition {
    pub target: LookupTarget,
    #[serde(default)]
    pub axes: Vec<String>,
    #[serde(default)]
    pub defaults: Tags,
    #[serde(default)]
    pub nested: Option<NestedDefinition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NestedDefinition {
    pub key: String,
    /// Axes of each sub-lookup, by selector value.
    pub tables: BTreeMap<String, Vec<String>>,
}

/// One TSV file and how to read it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableDefinition {
    pub file: String,
    pub lookup: LookupTarget,
    #[serde(default)]
    pub layout: Layout,
    /// Added to every cell's annotation.
    #[serde(default)]
    pub tags: Tags,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Layout {
    /// A header row of axis names and one value column.
    Table { value_column: String },
    /// Header rows and columns of grammatical terms around a grid of forms.
    Grid {
        header_rows: usize,
        header_columns: usize,
        /// Header columns holding raw values of an axis.
        #[serde(default)]
        key_columns: BTreeMap<usize, String>,
    },
}

impl Default for Layout {
    fn default() -> Self {
        Layout::Table {
            value_column: "form".to_string(),
        }
    }
}

/// One output file of cards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeckDefinition {
    pub output: String,
    pub template: String,
    /// Axes to traverse and their values, first axis outermost.
    pub traversal: Vec<(String, Vec<String>)>,
    /// Points to leave out; each may name only some axes.
    #[serde(default)]
    pub exclude: Vec<Tags>,
    /// Context shared by every card.
    #[serde(default)]
    pub tags: Tags,
}
