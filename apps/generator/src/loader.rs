//! Building a [`Language`] and its decks from a language directory.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use inflection_core::{
    default_subjectivity, parse_template, parse_tsv, tagaxis, CellAnnotation, DictLookup,
    DictTupleIndexing, Dictkey, FlatLookupPopulation, Language, ListGrammar, ListSemantics,
    ListTreeMap, Lookup, LookupError, NestedDictLookup, NestedLookupPopulation, Node,
    PopulationError, RuleSyntax, TableAnnotation,
};
use inflection_core::tree::Replace;
use tracing::debug;

use crate::definition::{
    Layout, LanguageDefinition, LookupDefinition, LookupTarget, TableDefinition, DEFINITION_FILE,
};
use crate::error::{GeneratorError, Result};

/// A populated grammar table, flat or nested.
#[derive(Debug, Clone)]
pub enum Table {
    Flat(DictLookup<String>),
    Nested(NestedDictLookup<String>),
}

impl Table {
    pub fn len(&self) -> usize {
        match self {
            Table::Flat(lookup) => lookup.len(),
            Table::Nested(lookup) => lookup.tables().map(DictLookup::len).sum(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Lookup for Table {
    type Value = String;

    fn lookup(&self, key: &Dictkey) -> std::result::Result<String, LookupError> {
        match self {
            Table::Flat(lookup) => lookup.lookup(key),
            Table::Nested(lookup) => lookup.lookup(key),
        }
    }
}

/// A table being filled, kept with the population that fills it.
enum TableBuilder {
    Flat(FlatLookupPopulation, DictLookup<String>),
    Nested(NestedLookupPopulation, NestedDictLookup<String>),
}

impl TableBuilder {
    fn from_definition(definition: &LookupDefinition) -> Self {
        let name = target_name(definition.target);
        let indexing = |axes: &[String]| {
            DictTupleIndexing::new(axes.iter().cloned()).with_defaults(definition.defaults.clone())
        };
        match &definition.nested {
            Some(nested) => {
                let population = NestedLookupPopulation::new(
                    name,
                    nested.key.clone(),
                    nested
                        .tables
                        .iter()
                        .map(|(selector, axes)| (selector.clone(), indexing(axes.as_slice()))),
                );
                let lookup = population.empty();
                TableBuilder::Nested(population, lookup)
            }
            None => {
                let population = FlatLookupPopulation::new(name, indexing(&definition.axes));
                let lookup = population.empty();
                TableBuilder::Flat(population, lookup)
            }
        }
    }

    fn populate(&mut self, pairs: Vec<(Dictkey, String)>) -> std::result::Result<(), PopulationError> {
        match self {
            TableBuilder::Flat(population, lookup) => population.populate_into(lookup, pairs),
            TableBuilder::Nested(population, lookup) => population.populate_into(lookup, pairs),
        }
    }

    fn build(self) -> Table {
        match self {
            TableBuilder::Flat(_, lookup) => Table::Flat(lookup),
            TableBuilder::Nested(_, lookup) => Table::Nested(lookup),
        }
    }
}

fn target_name(target: LookupTarget) -> &'static str {
    match target {
        LookupTarget::Conjugation => "conjugation",
        LookupTarget::Declension => "declension",
        LookupTarget::Articles => "articles",
        LookupTarget::Adjectives => "adjectives",
        LookupTarget::Adpositions => "adpositions",
    }
}

/// A language ready to render decks.
#[derive(Debug)]
pub struct LoadedLanguage {
    pub directory: PathBuf,
    pub definition: LanguageDefinition,
    pub language: Language,
}

/// Read `language.json` and every table it names from `directory`.
pub fn load_language(directory: &Path) -> Result<LoadedLanguage> {
    let definition = LanguageDefinition::load(&directory.join(DEFINITION_FILE))?;
    let mut tables = load_tables(directory, &definition)?;

    let mut take = |target: LookupTarget| tables.remove(&target);
    let conjugation = take(LookupTarget::Conjugation).ok_or_else(|| {
        GeneratorError::Definition(format!("{}: no conjugation lookup", definition.name))
    })?;
    let declension = take(LookupTarget::Declension).ok_or_else(|| {
        GeneratorError::Definition(format!("{}: no declension lookup", definition.name))
    })?;
    let mut grammar =
        ListGrammar::new(conjugation, declension).with_tags(definition.grammar_tags.clone());
    if let Some(articles) = take(LookupTarget::Articles) {
        grammar = grammar.with_articles(articles);
    }
    if let Some(adjectives) = take(LookupTarget::Adjectives) {
        grammar = grammar.with_adjectives(adjectives);
    }
    if let Some(adpositions) = take(LookupTarget::Adpositions) {
        grammar = grammar.with_adpositions(adpositions);
    }

    let subjectivity = Rc::new(default_subjectivity());
    let semantics = ListSemantics::new(Rc::clone(&subjectivity), definition.cases.clone())
        .with_semes(definition.semes.clone());
    let syntax = RuleSyntax::new(definition.structure.clone(), subjectivity);
    let language = Language::new(definition.name.clone(), grammar, semantics, syntax)
        .with_substitutions(&substitutions(&definition)?);

    Ok(LoadedLanguage {
        directory: directory.to_path_buf(),
        definition,
        language,
    })
}

fn load_tables(
    directory: &Path,
    definition: &LanguageDefinition,
) -> Result<BTreeMap<LookupTarget, Table>> {
    let mut builders = BTreeMap::new();
    for lookup in &definition.lookups {
        if builders
            .insert(lookup.target, TableBuilder::from_definition(lookup))
            .is_some()
        {
            return Err(GeneratorError::Definition(format!(
                "{}: lookup {} declared twice",
                definition.name,
                target_name(lookup.target)
            )));
        }
    }
    let vocabulary = tagaxis(definition.vocabulary.clone());

    for table in &definition.tables {
        let path = directory.join(&table.file);
        let Some(builder) = builders.get_mut(&table.lookup) else {
            return Err(GeneratorError::Definition(format!(
                "{}: table {} feeds undeclared lookup {}",
                definition.name,
                table.file,
                target_name(table.lookup)
            )));
        };
        let content = std::fs::read_to_string(&path).map_err(|e| GeneratorError::io(&path, e))?;
        let rows = parse_tsv(&content);
        let cells = annotate(table, &vocabulary, &rows)
            .and_then(|pairs| {
                let count = pairs.len();
                builder.populate(pairs).map(|()| count)
            })
            .map_err(|source| GeneratorError::Table {
                path: path.clone(),
                source,
            })?;
        debug!(file = %path.display(), cells, "populated table");
    }
    Ok(builders
        .into_iter()
        .map(|(target, builder)| (target, builder.build()))
        .collect())
}

fn annotate(
    table: &TableDefinition,
    vocabulary: &BTreeMap<String, String>,
    rows: &[Vec<String>],
) -> std::result::Result<Vec<(Dictkey, String)>, PopulationError> {
    match &table.layout {
        Layout::Table { value_column } => TableAnnotation::new(value_column.clone())
            .with_tags(table.tags.clone())
            .annotate(rows),
        Layout::Grid {
            header_rows,
            header_columns,
            key_columns,
        } => {
            let mut annotation = CellAnnotation::new(vocabulary.clone(), *header_rows, *header_columns)
                .with_tags(table.tags.clone());
            for (column, axis) in key_columns {
                annotation = annotation.with_key_column(*column, axis.clone());
            }
            annotation.annotate(rows)
        }
    }
}

/// Each substitution's template text, spliced in place of its opcode.
fn substitutions(definition: &LanguageDefinition) -> Result<ListTreeMap> {
    let mut map = ListTreeMap::new();
    for (opcode, text) in &definition.substitutions {
        let nodes = match parse_template(&format!("[{}]", text)) {
            Ok(Node::List(items)) => items,
            Ok(other) => vec![other],
            Err(error) => {
                return Err(GeneratorError::Definition(format!(
                    "{}: substitution {}: {}",
                    definition.name, opcode, error
                )))
            }
        };
        map.insert(opcode.clone(), Replace(nodes));
    }
    Ok(map)
}
