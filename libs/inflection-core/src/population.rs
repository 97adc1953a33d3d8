//! Filling lookups from annotated cells.
//!
//! Empty cells are skipped: they mark forms a language does not have. Every
//! other cell is written through [`DictLookup::insert`], so inconsistent
//! tables fail with a conflict.

use crate::error::PopulationError;
use crate::indexing::DictTupleIndexing;
use crate::lookup::{DictLookup, NestedDictLookup};
use crate::types::Dictkey;
use std::collections::BTreeMap;

/// Populates a single lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatLookupPopulation {
    name: String,
    indexing: DictTupleIndexing,
}

impl FlatLookupPopulation {
    pub fn new(name: impl Into<String>, indexing: DictTupleIndexing) -> Self {
        Self {
            name: name.into(),
            indexing,
        }
    }

    pub fn empty(&self) -> DictLookup<String> {
        DictLookup::new(self.name.clone(), self.indexing.clone())
    }

    pub fn populate<I>(&self, pairs: I) -> Result<DictLookup<String>, PopulationError>
    where
        I: IntoIterator<Item = (Dictkey, String)>,
    {
        let mut lookup = self.empty();
        self.populate_into(&mut lookup, pairs)?;
        Ok(lookup)
    }

    pub fn populate_into<I>(&self, lookup: &mut DictLookup<String>, pairs: I) -> Result<(), PopulationError>
    where
        I: IntoIterator<Item = (Dictkey, String)>,
    {
        for (key, cell) in pairs {
            if cell.is_empty() {
                continue;
            }
            lookup.insert(&key, cell)?;
        }
        Ok(())
    }
}

/// Populates a lookup of lookups; the `key` axis of each annotation picks
/// the table its cell goes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NestedLookupPopulation {
    name: String,
    key: String,
    templates: BTreeMap<String, DictTupleIndexing>,
}

impl NestedLookupPopulation {
    pub fn new<T, S>(name: impl Into<String>, key: impl Into<String>, templates: T) -> Self
    where
        T: IntoIterator<Item = (S, DictTupleIndexing)>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            key: key.into(),
            templates: templates
                .into_iter()
                .map(|(selector, indexing)| (selector.into(), indexing))
                .collect(),
        }
    }

    /// An empty lookup with one table per template.
    pub fn empty(&self) -> NestedDictLookup<String> {
        let tables = self.templates.iter().map(|(selector, indexing)| {
            (
                selector.clone(),
                DictLookup::new(format!("{}/{}", self.name, selector), indexing.clone()),
            )
        });
        NestedDictLookup::new(self.name.clone(), self.key.clone(), tables)
    }

    pub fn populate<I>(&self, pairs: I) -> Result<NestedDictLookup<String>, PopulationError>
    where
        I: IntoIterator<Item = (Dictkey, String)>,
    {
        let mut lookup = self.empty();
        self.populate_into(&mut lookup, pairs)?;
        Ok(lookup)
    }

    /// Add cells to an existing lookup, e.g. when one lookup spans several files.
    pub fn populate_into<I>(&self, lookup: &mut NestedDictLookup<String>, pairs: I) -> Result<(), PopulationError>
    where
        I: IntoIterator<Item = (Dictkey, String)>,
    {
        for (key, cell) in pairs {
            if cell.is_empty() {
                continue;
            }
            let selector = match key.get(&self.key) {
                Some([selector]) => selector.clone(),
                _ => {
                    return Err(PopulationError::MissingKey {
                        axis: self.key.clone(),
                        key: key.to_string(),
                        cell,
                    })
                }
            };
            let table = lookup
                .table_mut(&selector)
                .ok_or_else(|| PopulationError::UnknownLookup {
                    axis: self.key.clone(),
                    value: selector.clone(),
                })?;
            table.insert(&key, cell)?;
        }
        Ok(())
    }
}
