//! Core key types for the named-axis space.
//!
//! A [`Dictkey`] names a point, or an unresolved region, by mapping axis
//! names to candidate values. A [`Tuplekey`] is the resolved, hashable form
//! of a single point under a fixed axis order. The two are never
//! interchangeable; an [`Indexing`](crate::indexing::Indexing) converts
//! between them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Scalar context threaded through tree rewriting.
pub type Tags = BTreeMap<String, String>;

/// Build [`Tags`] from string pairs.
pub fn tags<I, K, V>(pairs: I) -> Tags
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// Mapping from axis name to one or more candidate values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dictkey(BTreeMap<String, Vec<String>>);

impl Dictkey {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `axis` to a single value, replacing any candidates.
    pub fn with(mut self, axis: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(axis.into(), vec![value.into()]);
        self
    }

    /// Set `axis` to several candidate values, replacing any candidates.
    pub fn with_any<I, S>(mut self, axis: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set(axis, values.into_iter().map(Into::into).collect());
        self
    }

    /// Replace the candidates of `axis`, dropping duplicates.
    pub fn set(&mut self, axis: impl Into<String>, values: Vec<String>) {
        let mut unique: Vec<String> = Vec::with_capacity(values.len());
        for value in values {
            if !unique.contains(&value) {
                unique.push(value);
            }
        }
        self.0.insert(axis.into(), unique);
    }

    /// Add a candidate to `axis` if not already present.
    pub fn insert(&mut self, axis: impl Into<String>, value: impl Into<String>) {
        let value = value.into();
        let candidates = self.0.entry(axis.into()).or_default();
        if !candidates.contains(&value) {
            candidates.push(value);
        }
    }

    pub fn get(&self, axis: &str) -> Option<&[String]> {
        self.0.get(axis).map(Vec::as_slice)
    }

    pub fn contains_axis(&self, axis: &str) -> bool {
        self.0.contains_key(axis)
    }

    pub fn axes(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Axis-wise merge where `other` takes precedence.
    pub fn merge(&self, other: &Dictkey) -> Dictkey {
        let mut merged = self.clone();
        for (axis, values) in &other.0 {
            merged.0.insert(axis.clone(), values.clone());
        }
        merged
    }

    /// Axis-wise union of candidates.
    pub fn extend(&mut self, other: &Dictkey) {
        for (axis, values) in &other.0 {
            for value in values {
                self.insert(axis.clone(), value.clone());
            }
        }
    }

    /// The scalar form, if every axis has exactly one candidate.
    pub fn to_tags(&self) -> Option<Tags> {
        self.0
            .iter()
            .map(|(axis, values)| match values.as_slice() {
                [value] => Some((axis.clone(), value.clone())),
                _ => None,
            })
            .collect()
    }
}

impl From<&Tags> for Dictkey {
    fn from(tags: &Tags) -> Self {
        Self(
            tags.iter()
                .map(|(k, v)| (k.clone(), vec![v.clone()]))
                .collect(),
        )
    }
}

impl<K, V> FromIterator<(K, V)> for Dictkey
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut key = Dictkey::new();
        for (axis, value) in iter {
            key.insert(axis, value);
        }
        key
    }
}

impl fmt::Display for Dictkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (axis, values)) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", axis, values.join("|"))?;
        }
        write!(f, "}}")
    }
}

/// Ordered tuple of concrete values, one per axis of an indexing.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tuplekey(Vec<String>);

impl Tuplekey {
    pub fn new(values: Vec<String>) -> Self {
        Self(values)
    }

    pub fn values(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for Tuplekey {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for Tuplekey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.0.join(", "))
    }
}
