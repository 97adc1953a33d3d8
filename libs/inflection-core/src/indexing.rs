//! Conversion between dictkeys and tuplekeys.
//!
//! An indexing fixes an ordered list of axes. Resolving a dictkey yields the
//! Cartesian product of the candidates given for each axis; an axis that the
//! dictkey omits contributes its default if one is declared and otherwise
//! contributes nothing, so the product is empty.

use crate::error::IndexError;
use crate::types::{Dictkey, Tags, Tuplekey};
use serde::{Deserialize, Serialize};
use std::ops::{BitAnd, BitOr, Sub};

/// Bidirectional mapping between dictkeys and tuplekeys.
pub trait Indexing {
    /// Axis names in tuplekey order.
    fn axes(&self) -> &[String];

    /// Every tuplekey implied by `dictkey`.
    fn tuplekeys(&self, dictkey: &Dictkey) -> Vec<Tuplekey>;

    /// The point named by `tuplekey`.
    fn dictkey(&self, tuplekey: &Tuplekey) -> Dictkey;

    /// Fails naming every axis `dictkey` omits that has no default.
    fn check(&self, dictkey: &Dictkey) -> Result<(), IndexError>;

    /// Number of tuplekeys `dictkey` implies.
    fn count(&self, dictkey: &Dictkey) -> usize;
}

/// Ordered axes with optional per-axis defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictTupleIndexing {
    axes: Vec<String>,
    #[serde(default)]
    defaults: Tags,
}

impl DictTupleIndexing {
    pub fn new<I, S>(axes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for axis in axes {
            let axis = axis.into();
            if !unique.contains(&axis) {
                unique.push(axis);
            }
        }
        Self {
            axes: unique,
            defaults: Tags::new(),
        }
    }

    /// Declare a value used when a dictkey omits `axis`.
    pub fn with_default(mut self, axis: impl Into<String>, value: impl Into<String>) -> Self {
        self.defaults.insert(axis.into(), value.into());
        self
    }

    pub fn with_defaults(mut self, defaults: Tags) -> Self {
        self.defaults.extend(defaults);
        self
    }

    pub fn defaults(&self) -> &Tags {
        &self.defaults
    }

    pub fn len(&self) -> usize {
        self.axes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.axes.is_empty()
    }

    pub fn has_axis(&self, axis: &str) -> bool {
        self.axes.iter().any(|a| a == axis)
    }

    /// Position of `axis` within tuplekeys.
    pub fn position(&self, axis: &str) -> Option<usize> {
        self.axes.iter().position(|a| a == axis)
    }

    fn candidates<'a>(&'a self, dictkey: &'a Dictkey, axis: &str) -> &'a [String] {
        match dictkey.get(axis) {
            Some(values) => values,
            None => self
                .defaults
                .get(axis)
                .map(std::slice::from_ref)
                .unwrap_or(&[]),
        }
    }

    /// Axes present in both, in `self` order.
    pub fn intersection(&self, other: &DictTupleIndexing) -> DictTupleIndexing {
        self.filtered(|axis| other.has_axis(axis))
    }

    /// Axes of `self` followed by the axes only `other` has.
    pub fn union(&self, other: &DictTupleIndexing) -> DictTupleIndexing {
        let mut axes = self.axes.clone();
        axes.extend(other.axes.iter().filter(|a| !self.has_axis(a)).cloned());
        let mut defaults = other.defaults.clone();
        defaults.extend(self.defaults.clone());
        DictTupleIndexing { axes, defaults }
    }

    /// Axes of `self` absent from `other`.
    pub fn difference(&self, other: &DictTupleIndexing) -> DictTupleIndexing {
        self.filtered(|axis| !other.has_axis(axis))
    }

    fn filtered(&self, keep: impl Fn(&str) -> bool) -> DictTupleIndexing {
        let axes: Vec<String> = self.axes.iter().filter(|a| keep(a)).cloned().collect();
        let defaults = self
            .defaults
            .iter()
            .filter(|(axis, _)| axes.contains(axis))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        DictTupleIndexing { axes, defaults }
    }

    /// Whether both name the same axes, ignoring order.
    pub fn same_axes(&self, other: &DictTupleIndexing) -> bool {
        self.axes.len() == other.axes.len() && self.axes.iter().all(|a| other.has_axis(a))
    }

    /// Axes named by both, in `self` order.
    pub fn shared_axes(&self, other: &DictTupleIndexing) -> Vec<String> {
        self.intersection(other).axes
    }

    pub fn is_disjoint(&self, other: &DictTupleIndexing) -> bool {
        self.axes.iter().all(|a| !other.has_axis(a))
    }

    /// Translate a tuplekey of `from` into this axis order.
    pub fn reorder(&self, tuplekey: &Tuplekey, from: &DictTupleIndexing) -> Option<Tuplekey> {
        self.tuplekeys(&from.dictkey(tuplekey)).into_iter().next()
    }
}

impl Indexing for DictTupleIndexing {
    fn axes(&self) -> &[String] {
        &self.axes
    }

    fn tuplekeys(&self, dictkey: &Dictkey) -> Vec<Tuplekey> {
        let columns: Vec<&[String]> = self
            .axes
            .iter()
            .map(|axis| self.candidates(dictkey, axis))
            .collect();
        cartesian_product(&columns)
            .into_iter()
            .map(Tuplekey::new)
            .collect()
    }

    fn dictkey(&self, tuplekey: &Tuplekey) -> Dictkey {
        let mut key: Dictkey = self.defaults.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
        for (axis, value) in self.axes.iter().zip(tuplekey.values()) {
            key = key.with(axis.clone(), value.clone());
        }
        key
    }

    fn check(&self, dictkey: &Dictkey) -> Result<(), IndexError> {
        let missing: Vec<String> = self
            .axes
            .iter()
            .filter(|axis| !dictkey.contains_axis(axis) && !self.defaults.contains_key(*axis))
            .cloned()
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(IndexError::MissingAxis { axes: missing })
        }
    }

    fn count(&self, dictkey: &Dictkey) -> usize {
        self.axes
            .iter()
            .map(|axis| self.candidates(dictkey, axis).len())
            .product()
    }
}

impl BitAnd for &DictTupleIndexing {
    type Output = DictTupleIndexing;

    fn bitand(self, other: Self) -> DictTupleIndexing {
        self.intersection(other)
    }
}

impl BitOr for &DictTupleIndexing {
    type Output = DictTupleIndexing;

    fn bitor(self, other: Self) -> DictTupleIndexing {
        self.union(other)
    }
}

impl Sub for &DictTupleIndexing {
    type Output = DictTupleIndexing;

    fn sub(self, other: Self) -> DictTupleIndexing {
        self.difference(other)
    }
}

/// Single-axis indexing whose tuplekeys hold one value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictKeyIndexing {
    axes: [String; 1],
}

impl DictKeyIndexing {
    pub fn new(axis: impl Into<String>) -> Self {
        Self {
            axes: [axis.into()],
        }
    }

    pub fn axis(&self) -> &str {
        &self.axes[0]
    }
}

impl Indexing for DictKeyIndexing {
    fn axes(&self) -> &[String] {
        &self.axes
    }

    fn tuplekeys(&self, dictkey: &Dictkey) -> Vec<Tuplekey> {
        dictkey
            .get(self.axis())
            .unwrap_or(&[])
            .iter()
            .map(|value| Tuplekey::new(vec![value.clone()]))
            .collect()
    }

    fn dictkey(&self, tuplekey: &Tuplekey) -> Dictkey {
        tuplekey
            .values()
            .first()
            .map(|value| Dictkey::new().with(self.axis(), value.clone()))
            .unwrap_or_default()
    }

    fn check(&self, dictkey: &Dictkey) -> Result<(), IndexError> {
        if dictkey.contains_axis(self.axis()) {
            Ok(())
        } else {
            Err(IndexError::MissingAxis {
                axes: vec![self.axis().to_string()],
            })
        }
    }

    fn count(&self, dictkey: &Dictkey) -> usize {
        dictkey.get(self.axis()).map_or(0, <[String]>::len)
    }
}

/// Product of the given columns, first column varying slowest.
pub(crate) fn cartesian_product(columns: &[&[String]]) -> Vec<Vec<String>> {
    // Built from the last axis outward so each prefix is extended once.
    let mut suffixes: Vec<Vec<String>> = vec![Vec::new()];
    for column in columns.iter().rev() {
        let mut extended = Vec::with_capacity(suffixes.len() * column.len());
        for value in column.iter() {
            for suffix in &suffixes {
                let mut tuple = Vec::with_capacity(suffix.len() + 1);
                tuple.push(value.clone());
                tuple.extend(suffix.iter().cloned());
                extended.push(tuple);
            }
        }
        suffixes = extended;
    }
    suffixes
}
