//! Lookup tables keyed by points in a named-axis space.
//!
//! Reads are fail-closed: a key must match exactly one stored tuplekey.
//! Zero matches is [`LookupError::NotFound`], more than one is
//! [`LookupError::Ambiguous`]. Writes never silently overwrite a differing
//! value.

use crate::error::{IndexError, LookupError, StoreError};
use crate::indexing::{DictKeyIndexing, DictTupleIndexing, Indexing};
use crate::space::DictList;
use crate::types::{Dictkey, Tuplekey};
use std::collections::BTreeMap;
use std::fmt;

/// Anything that resolves a dictkey to a value.
pub trait Lookup {
    type Value;

    fn lookup(&self, key: &Dictkey) -> Result<Self::Value, LookupError>;
}

impl<L: Lookup + ?Sized> Lookup for Box<L> {
    type Value = L::Value;

    fn lookup(&self, key: &Dictkey) -> Result<Self::Value, LookupError> {
        (**self).lookup(key)
    }
}

/// Mapping from tuplekeys to values under an indexing.
#[derive(Debug, Clone, PartialEq)]
pub struct DictLookup<V, I = DictTupleIndexing> {
    name: String,
    indexing: I,
    content: BTreeMap<Tuplekey, V>,
}

impl<V, I: Indexing> DictLookup<V, I> {
    pub fn new(name: impl Into<String>, indexing: I) -> Self {
        Self {
            name: name.into(),
            indexing,
            content: BTreeMap::new(),
        }
    }

    /// Build directly from resolved tuplekeys; later entries replace earlier ones.
    pub fn from_content<C>(name: impl Into<String>, indexing: I, content: C) -> Self
    where
        C: IntoIterator<Item = (Tuplekey, V)>,
    {
        Self {
            name: name.into(),
            indexing,
            content: content.into_iter().collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn indexing(&self) -> &I {
        &self.indexing
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Stored tuplekeys implied by `key`.
    fn matches(&self, key: &Dictkey) -> (Vec<Tuplekey>, Vec<Tuplekey>) {
        let candidates = self.indexing.tuplekeys(key);
        let found = candidates
            .iter()
            .filter(|tuplekey| self.content.contains_key(*tuplekey))
            .cloned()
            .collect();
        (candidates, found)
    }

    fn describe(&self, tuplekeys: &[Tuplekey]) -> Vec<String> {
        tuplekeys
            .iter()
            .map(|tuplekey| self.indexing.dictkey(tuplekey).to_string())
            .collect()
    }

    /// The single value stored under `key`.
    pub fn get(&self, key: &Dictkey) -> Result<&V, LookupError> {
        let (candidates, found) = self.matches(key);
        match found.as_slice() {
            [tuplekey] => self.content.get(tuplekey).ok_or_else(|| self.not_found(key, &candidates)),
            [] => Err(self.not_found(key, &candidates)),
            _ => Err(LookupError::Ambiguous {
                lookup: self.name.clone(),
                key: key.to_string(),
                matches: self.describe(&found),
            }),
        }
    }

    fn not_found(&self, key: &Dictkey, candidates: &[Tuplekey]) -> LookupError {
        LookupError::NotFound {
            lookup: self.name.clone(),
            key: key.to_string(),
            attempted: self.describe(candidates),
            missing: self.missing_axes(key),
        }
    }

    fn missing_axes(&self, key: &Dictkey) -> Vec<String> {
        match self.indexing.check(key) {
            Ok(()) => Vec::new(),
            Err(IndexError::MissingAxis { axes }) => axes,
        }
    }

    pub fn get_tuplekey(&self, tuplekey: &Tuplekey) -> Option<&V> {
        self.content.get(tuplekey)
    }

    /// Whether `key` matches exactly one stored entry.
    pub fn contains(&self, key: &Dictkey) -> bool {
        self.matches(key).1.len() == 1
    }

    /// Store `value` at every tuplekey `key` implies.
    ///
    /// Rewriting an equal value is allowed; a differing value is a conflict
    /// and nothing is written.
    pub fn insert(&mut self, key: &Dictkey, value: V) -> Result<(), StoreError>
    where
        V: Clone + PartialEq + fmt::Debug,
    {
        let tuplekeys = self.indexing.tuplekeys(key);
        if tuplekeys.is_empty() {
            return Err(StoreError::MissingAxis {
                lookup: self.name.clone(),
                key: key.to_string(),
                axes: self.missing_axes(key),
            });
        }
        for tuplekey in &tuplekeys {
            if let Some(old) = self.content.get(tuplekey) {
                if *old != value {
                    return Err(StoreError::Conflict {
                        lookup: self.name.clone(),
                        key: self.indexing.dictkey(tuplekey).to_string(),
                        old: format!("{:?}", old),
                        new: format!("{:?}", value),
                    });
                }
            }
        }
        for tuplekey in tuplekeys {
            self.content.insert(tuplekey, value.clone());
        }
        Ok(())
    }

    /// Stored entries as points, in tuplekey order.
    pub fn iter(&self) -> impl Iterator<Item = (Dictkey, &V)> + '_ {
        self.content
            .iter()
            .map(|(tuplekey, value)| (self.indexing.dictkey(tuplekey), value))
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.content.values()
    }

    pub(crate) fn get_tuplekey_mut(&mut self, tuplekey: &Tuplekey) -> Option<&mut V> {
        self.content.get_mut(tuplekey)
    }
}

impl<V> DictLookup<V, DictTupleIndexing> {
    /// Join `other`, whose values are keys into `self`.
    ///
    /// Each point of `other` whose value resolves to exactly one entry of
    /// `self` is merged with that entry's point. The two lookups must not
    /// share axes.
    pub fn compose(&self, other: &DictLookup<Dictkey, DictTupleIndexing>) -> Result<DictList, StoreError> {
        let overlap = other.indexing.shared_axes(&self.indexing);
        if !overlap.is_empty() {
            return Err(StoreError::AxisOverlap { axes: overlap });
        }
        let indexing = &other.indexing | &self.indexing;
        let mut points = Vec::new();
        for (point, target) in other.iter() {
            let (_, found) = self.matches(target);
            if let [tuplekey] = found.as_slice() {
                points.push(point.merge(&self.indexing.dictkey(tuplekey)));
            }
        }
        if points.is_empty() {
            return Err(StoreError::EmptyResult {
                operation: "composition",
            });
        }
        Ok(DictList::new(indexing, points))
    }
}

impl<V: Clone, I: Indexing> Lookup for DictLookup<V, I> {
    type Value = V;

    fn lookup(&self, key: &Dictkey) -> Result<V, LookupError> {
        self.get(key).cloned()
    }
}

/// Lookup that computes a value wherever the table has no entry.
///
/// Ambiguity is still an error.
pub struct DefaultDictLookup<V, I = DictTupleIndexing> {
    lookup: DictLookup<V, I>,
    default: Box<dyn Fn(&Dictkey) -> V>,
}

impl<V, I: Indexing> DefaultDictLookup<V, I> {
    pub fn new(lookup: DictLookup<V, I>, default: impl Fn(&Dictkey) -> V + 'static) -> Self {
        Self {
            lookup,
            default: Box::new(default),
        }
    }

    pub fn inner(&self) -> &DictLookup<V, I> {
        &self.lookup
    }

    pub fn inner_mut(&mut self) -> &mut DictLookup<V, I> {
        &mut self.lookup
    }
}

impl<V: fmt::Debug, I: fmt::Debug> fmt::Debug for DefaultDictLookup<V, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefaultDictLookup")
            .field("lookup", &self.lookup)
            .finish_non_exhaustive()
    }
}

impl<V: Clone, I: Indexing> Lookup for DefaultDictLookup<V, I> {
    type Value = V;

    fn lookup(&self, key: &Dictkey) -> Result<V, LookupError> {
        match self.lookup.get(key) {
            Ok(value) => Ok(value.clone()),
            Err(error) if error.is_not_found() => Ok((self.default)(key)),
            Err(error) => Err(error),
        }
    }
}

/// Lookup of lookups: one axis selects the table, the same key reads it.
#[derive(Debug, Clone, PartialEq)]
pub struct NestedDictLookup<V, I = DictTupleIndexing> {
    outer: DictLookup<DictLookup<V, I>, DictKeyIndexing>,
}

impl<V, I: Indexing> NestedDictLookup<V, I> {
    pub fn new<T, S>(name: impl Into<String>, axis: impl Into<String>, tables: T) -> Self
    where
        T: IntoIterator<Item = (S, DictLookup<V, I>)>,
        S: Into<String>,
    {
        let content = tables
            .into_iter()
            .map(|(selector, table)| (Tuplekey::new(vec![selector.into()]), table));
        Self {
            outer: DictLookup::from_content(name, DictKeyIndexing::new(axis), content),
        }
    }

    pub fn name(&self) -> &str {
        self.outer.name()
    }

    /// Axis whose value selects the inner table.
    pub fn axis(&self) -> &str {
        self.outer.indexing().axis()
    }

    pub fn get(&self, key: &Dictkey) -> Result<&V, LookupError> {
        self.outer.get(key)?.get(key)
    }

    pub fn table(&self, selector: &str) -> Option<&DictLookup<V, I>> {
        self.outer.get_tuplekey(&Tuplekey::new(vec![selector.to_string()]))
    }

    pub fn table_mut(&mut self, selector: &str) -> Option<&mut DictLookup<V, I>> {
        self.outer
            .get_tuplekey_mut(&Tuplekey::new(vec![selector.to_string()]))
    }

    pub fn tables(&self) -> impl Iterator<Item = &DictLookup<V, I>> {
        self.outer.values()
    }
}

impl<V: Clone, I: Indexing> Lookup for NestedDictLookup<V, I> {
    type Value = V;

    fn lookup(&self, key: &Dictkey) -> Result<V, LookupError> {
        self.get(key).cloned()
    }
}

/// Lookup that consults `fallback` only where `primary` has no entry.
#[derive(Debug, Clone, PartialEq)]
pub struct FallbackDictLookup<A, B> {
    primary: A,
    fallback: B,
}

impl<A, B> FallbackDictLookup<A, B> {
    pub fn new(primary: A, fallback: B) -> Self {
        Self { primary, fallback }
    }
}

impl<A, B> Lookup for FallbackDictLookup<A, B>
where
    A: Lookup,
    B: Lookup<Value = A::Value>,
{
    type Value = A::Value;

    fn lookup(&self, key: &Dictkey) -> Result<A::Value, LookupError> {
        match self.primary.lookup(key) {
            Err(error) if error.is_not_found() => self.fallback.lookup(key),
            result => result,
        }
    }
}
