//! Point containers with set algebra: [`DictSet`], [`DictSpace`], [`DictList`].
//!
//! Binary operations that combine containers over different axes first take
//! the union of both indexings, enumerate the product of every candidate
//! value either operand mentions, and keep the points the operator admits.
//! An operation whose result is empty fails with
//! [`StoreError::EmptyResult`] rather than returning an empty container.

use crate::error::StoreError;
use crate::indexing::{DictTupleIndexing, Indexing};
use crate::types::{Dictkey, Tuplekey};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A set of points that can be probed for membership.
pub trait Region {
    fn indexing(&self) -> &DictTupleIndexing;

    fn contains(&self, dictkey: &Dictkey) -> bool;

    /// Values this region takes on `axis`, in first-seen order.
    fn candidates(&self, axis: &str) -> Vec<String>;
}

fn combine<L, R>(
    left: &L,
    right: &R,
    operation: &'static str,
    keep: fn(bool, bool) -> bool,
) -> Result<DictSet, StoreError>
where
    L: Region + ?Sized,
    R: Region + ?Sized,
{
    let indexing = left.indexing() | right.indexing();
    let mut probe = Dictkey::new();
    for axis in indexing.axes() {
        let mut values = left.candidates(axis);
        for value in right.candidates(axis) {
            if !values.contains(&value) {
                values.push(value);
            }
        }
        probe.set(axis.clone(), values);
    }
    let content: BTreeSet<Tuplekey> = indexing
        .tuplekeys(&probe)
        .into_iter()
        .filter(|tuplekey| {
            let point = indexing.dictkey(tuplekey);
            keep(left.contains(&point), right.contains(&point))
        })
        .collect();
    if content.is_empty() {
        return Err(StoreError::EmptyResult { operation });
    }
    Ok(DictSet { indexing, content })
}

fn require_disjoint(left: &DictTupleIndexing, right: &DictTupleIndexing) -> Result<(), StoreError> {
    let overlap = left.shared_axes(right);
    if overlap.is_empty() {
        Ok(())
    } else {
        Err(StoreError::AxisOverlap { axes: overlap })
    }
}

fn require_same_axes(left: &DictTupleIndexing, right: &DictTupleIndexing) -> Result<(), StoreError> {
    if left.same_axes(right) {
        Ok(())
    } else {
        Err(StoreError::AxisMismatch {
            left: left.axes().to_vec(),
            right: right.axes().to_vec(),
        })
    }
}

fn column_values<'a>(
    indexing: &DictTupleIndexing,
    tuplekeys: impl Iterator<Item = &'a Tuplekey>,
    axis: &str,
) -> Vec<String> {
    let Some(position) = indexing.position(axis) else {
        return Vec::new();
    };
    let mut values: Vec<String> = Vec::new();
    for tuplekey in tuplekeys {
        let value = &tuplekey.values()[position];
        if !values.contains(value) {
            values.push(value.clone());
        }
    }
    values
}

/// Deduplicated set of points under an indexing.
///
/// Iteration is in sorted tuplekey order, never insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictSet {
    indexing: DictTupleIndexing,
    content: BTreeSet<Tuplekey>,
}

impl DictSet {
    pub fn new<I>(indexing: DictTupleIndexing, dictkeys: I) -> Self
    where
        I: IntoIterator<Item = Dictkey>,
    {
        let content = dictkeys
            .into_iter()
            .flat_map(|key| indexing.tuplekeys(&key))
            .collect();
        Self { indexing, content }
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Dictkey> + '_ {
        self.content.iter().map(|tuplekey| self.indexing.dictkey(tuplekey))
    }

    pub fn union<R: Region + ?Sized>(&self, other: &R) -> Result<DictSet, StoreError> {
        combine(self, other, "union", |a, b| a || b)
    }

    pub fn intersection<R: Region + ?Sized>(&self, other: &R) -> Result<DictSet, StoreError> {
        combine(self, other, "intersection", |a, b| a && b)
    }

    pub fn difference<R: Region + ?Sized>(&self, other: &R) -> Result<DictSet, StoreError> {
        combine(self, other, "difference", |a, b| a && !b)
    }
}

impl Region for DictSet {
    fn indexing(&self) -> &DictTupleIndexing {
        &self.indexing
    }

    /// True when `dictkey` implies at least one point and every implied point is stored.
    fn contains(&self, dictkey: &Dictkey) -> bool {
        let tuplekeys = self.indexing.tuplekeys(dictkey);
        !tuplekeys.is_empty() && tuplekeys.iter().all(|tuplekey| self.content.contains(tuplekey))
    }

    fn candidates(&self, axis: &str) -> Vec<String> {
        column_values(&self.indexing, self.content.iter(), axis)
    }
}

/// Lazy Cartesian product: each constrained axis maps to its legal values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictSpace {
    indexing: DictTupleIndexing,
    key: Dictkey,
}

impl DictSpace {
    /// Build from `(axis, values)` pairs; axis order is iteration order.
    pub fn new<I, A, V, S>(axes: I) -> Self
    where
        I: IntoIterator<Item = (A, V)>,
        A: Into<String>,
        V: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut order = Vec::new();
        let mut key = Dictkey::new();
        for (axis, values) in axes {
            let axis = axis.into();
            key.set(axis.clone(), values.into_iter().map(Into::into).collect());
            order.push(axis);
        }
        Self {
            indexing: DictTupleIndexing::new(order),
            key,
        }
    }

    fn from_parts(indexing: DictTupleIndexing, key: Dictkey) -> Self {
        Self { indexing, key }
    }

    /// Legal values of `axis`, if constrained.
    pub fn values(&self, axis: &str) -> Option<&[String]> {
        self.key.get(axis)
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.indexing.count(&self.key)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Points in axis order, first axis varying slowest.
    pub fn iter(&self) -> Points<'_> {
        Points::new(&self.indexing, &self.key)
    }

    /// Eager enumeration.
    pub fn to_list(&self) -> DictList {
        DictList::new(self.indexing.clone(), self.iter())
    }

    /// Per-axis union; both spaces must constrain the same axes.
    pub fn union(&self, other: &DictSpace) -> Result<DictSpace, StoreError> {
        require_same_axes(&self.indexing, &other.indexing)?;
        let mut key = self.key.clone();
        key.extend(&other.key);
        Ok(Self::from_parts(self.indexing.clone(), key))
    }

    /// Per-axis intersection; axes only one side constrains are kept as is.
    pub fn intersection(&self, other: &DictSpace) -> Result<DictSpace, StoreError> {
        let indexing = &self.indexing | &other.indexing;
        let mut key = Dictkey::new();
        for axis in indexing.axes() {
            let values: Vec<String> = match (self.key.get(axis), other.key.get(axis)) {
                (Some(a), Some(b)) => a.iter().filter(|v| b.contains(v)).cloned().collect(),
                (Some(a), None) => a.to_vec(),
                (None, Some(b)) => b.to_vec(),
                (None, None) => Vec::new(),
            };
            if values.is_empty() {
                return Err(StoreError::EmptyResult {
                    operation: "intersection",
                });
            }
            key.set(axis.clone(), values);
        }
        Ok(Self::from_parts(indexing, key))
    }

    /// Intersection with a non-space operand; degrades to a [`DictSet`].
    pub fn intersect_region<R: Region + ?Sized>(&self, other: &R) -> Result<DictSet, StoreError> {
        combine(self, other, "intersection", |a, b| a && b)
    }

    pub fn difference<R: Region + ?Sized>(&self, other: &R) -> Result<DictSet, StoreError> {
        combine(self, other, "difference", |a, b| a && !b)
    }

    /// Product with a space over disjoint axes; stays lazy.
    pub fn product(&self, other: &DictSpace) -> Result<DictSpace, StoreError> {
        require_disjoint(&self.indexing, &other.indexing)?;
        Ok(Self::from_parts(
            &self.indexing | &other.indexing,
            self.key.merge(&other.key),
        ))
    }

    /// Product with a concrete list over disjoint axes; list order leads.
    pub fn product_list(&self, list: &DictList) -> Result<DictList, StoreError> {
        list.product_space(self)
    }

    /// Axis-wise replacement where `other` takes precedence.
    pub fn override_space(&self, other: &DictSpace) -> DictSpace {
        Self::from_parts(&self.indexing | &other.indexing, self.key.merge(&other.key))
    }

    /// Axis-wise replacement where `self` takes precedence.
    pub fn fallback(&self, other: &DictSpace) -> DictSpace {
        other.override_space(self)
    }

    /// Cross each point of `list` with this space's axes that `list` does not
    /// already enumerate.
    pub fn override_list(&self, list: &DictList) -> Result<DictList, StoreError> {
        let residual_axes = &self.indexing - list.indexing();
        if residual_axes.is_empty() {
            return Ok(list.clone());
        }
        let residual_key: Dictkey = residual_axes
            .axes()
            .iter()
            .filter_map(|axis| self.key.get(axis).map(|values| (axis.clone(), values.to_vec())))
            .fold(Dictkey::new(), |key, (axis, values)| key.with_any(axis, values));
        list.product_space(&Self::from_parts(residual_axes, residual_key))
    }
}

impl Region for DictSpace {
    fn indexing(&self) -> &DictTupleIndexing {
        &self.indexing
    }

    /// True when `dictkey` supplies, for every constrained axis, only legal values.
    fn contains(&self, dictkey: &Dictkey) -> bool {
        self.indexing.axes().iter().all(|axis| {
            match (dictkey.get(axis), self.key.get(axis)) {
                (Some(probed), Some(legal)) => {
                    !probed.is_empty() && probed.iter().all(|value| legal.contains(value))
                }
                _ => false,
            }
        })
    }

    fn candidates(&self, axis: &str) -> Vec<String> {
        self.key.get(axis).map(<[String]>::to_vec).unwrap_or_default()
    }
}

impl<'a> IntoIterator for &'a DictSpace {
    type Item = Dictkey;
    type IntoIter = Points<'a>;

    fn into_iter(self) -> Points<'a> {
        self.iter()
    }
}

/// Lazy odometer over the points of a [`DictSpace`].
#[derive(Debug, Clone)]
pub struct Points<'a> {
    axes: &'a [String],
    columns: Vec<&'a [String]>,
    cursor: Option<Vec<usize>>,
}

impl<'a> Points<'a> {
    fn new(indexing: &'a DictTupleIndexing, key: &'a Dictkey) -> Self {
        let axes = indexing.axes();
        let columns: Vec<&[String]> = axes
            .iter()
            .map(|axis| key.get(axis).unwrap_or(&[]))
            .collect();
        let cursor = if columns.iter().any(|column| column.is_empty()) {
            None
        } else {
            Some(vec![0; columns.len()])
        };
        Self {
            axes,
            columns,
            cursor,
        }
    }
}

impl Iterator for Points<'_> {
    type Item = Dictkey;

    fn next(&mut self) -> Option<Dictkey> {
        let cursor = self.cursor.as_mut()?;
        let point = self
            .axes
            .iter()
            .zip(cursor.iter())
            .zip(self.columns.iter())
            .fold(Dictkey::new(), |key, ((axis, &i), column)| {
                key.with(axis.clone(), column[i].clone())
            });

        let mut exhausted = true;
        for position in (0..cursor.len()).rev() {
            cursor[position] += 1;
            if cursor[position] < self.columns[position].len() {
                exhausted = false;
                break;
            }
            cursor[position] = 0;
        }
        if exhausted {
            self.cursor = None;
        }
        Some(point)
    }
}

/// Ordered, possibly repeating sequence of points; the traversal type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictList {
    indexing: DictTupleIndexing,
    content: Vec<Tuplekey>,
}

impl DictList {
    pub fn new<I>(indexing: DictTupleIndexing, dictkeys: I) -> Self
    where
        I: IntoIterator<Item = Dictkey>,
    {
        let content = dictkeys
            .into_iter()
            .flat_map(|key| indexing.tuplekeys(&key))
            .collect();
        Self { indexing, content }
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Dictkey> + '_ {
        self.content.iter().map(|tuplekey| self.indexing.dictkey(tuplekey))
    }

    /// `self` followed by the points of `other` not already present.
    pub fn concat(&self, other: &DictList) -> Result<DictList, StoreError> {
        require_same_axes(&self.indexing, &other.indexing)?;
        let mut content = self.content.clone();
        for tuplekey in &other.content {
            if let Some(reordered) = self.indexing.reorder(tuplekey, &other.indexing) {
                if !content.contains(&reordered) {
                    content.push(reordered);
                }
            }
        }
        Ok(Self {
            indexing: self.indexing.clone(),
            content,
        })
    }

    /// Every point of `self` crossed with every point of `other`.
    pub fn product(&self, other: &DictList) -> Result<DictList, StoreError> {
        self.cross(&other.indexing, other.iter().collect())
    }

    /// Every point of `self` crossed with every point of `space`.
    pub fn product_space(&self, space: &DictSpace) -> Result<DictList, StoreError> {
        self.cross(&space.indexing, space.iter().collect())
    }

    fn cross(&self, indexing: &DictTupleIndexing, others: Vec<Dictkey>) -> Result<DictList, StoreError> {
        require_disjoint(&self.indexing, indexing)?;
        let joined = &self.indexing | indexing;
        let points: Vec<Dictkey> = self
            .iter()
            .flat_map(|point| others.iter().map(move |other| point.merge(other)))
            .collect();
        if points.is_empty() {
            return Err(StoreError::EmptyResult { operation: "product" });
        }
        Ok(DictList::new(joined, points))
    }

    /// Points of `self` that `other` contains, in order.
    pub fn intersection<R: Region + ?Sized>(&self, other: &R) -> Result<DictList, StoreError> {
        self.filter(other, "intersection", true)
    }

    /// Points of `self` that `other` does not contain, in order.
    pub fn difference<R: Region + ?Sized>(&self, other: &R) -> Result<DictList, StoreError> {
        self.filter(other, "difference", false)
    }

    fn filter<R: Region + ?Sized>(
        &self,
        other: &R,
        operation: &'static str,
        keep_members: bool,
    ) -> Result<DictList, StoreError> {
        let content: Vec<Tuplekey> = self
            .content
            .iter()
            .filter(|tuplekey| other.contains(&self.indexing.dictkey(tuplekey)) == keep_members)
            .cloned()
            .collect();
        if content.is_empty() {
            return Err(StoreError::EmptyResult { operation });
        }
        Ok(Self {
            indexing: self.indexing.clone(),
            content,
        })
    }
}

impl Region for DictList {
    fn indexing(&self) -> &DictTupleIndexing {
        &self.indexing
    }

    fn contains(&self, dictkey: &Dictkey) -> bool {
        let tuplekeys = self.indexing.tuplekeys(dictkey);
        !tuplekeys.is_empty() && tuplekeys.iter().all(|tuplekey| self.content.contains(tuplekey))
    }

    fn candidates(&self, axis: &str) -> Vec<String> {
        column_values(&self.indexing, self.content.iter(), axis)
    }
}
