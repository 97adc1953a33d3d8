//! Error types for inflection-core.

use thiserror::Error;

/// Errors raised while resolving a dictkey against an indexing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndexError {
    #[error("missing axes: {}", .axes.join(", "))]
    MissingAxis { axes: Vec<String> },
}

/// Errors raised when reading from a lookup.
///
/// `NotFound` is expected for sparse paradigms and is recovered by callers.
/// `Ambiguous` always indicates a table whose axes fail to distinguish rows.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("{lookup}: no entry for {key}{}", describe_not_found(.attempted, .missing))]
    NotFound {
        lookup: String,
        key: String,
        attempted: Vec<String>,
        missing: Vec<String>,
    },

    #[error("{lookup}: ambiguous key {key}, matches {}", .matches.join("; "))]
    Ambiguous {
        lookup: String,
        key: String,
        matches: Vec<String>,
    },
}

impl LookupError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_ambiguous(&self) -> bool {
        matches!(self, Self::Ambiguous { .. })
    }
}

fn describe_not_found(attempted: &[String], missing: &[String]) -> String {
    let mut description = String::new();
    if !missing.is_empty() {
        description.push_str(&format!(" (missing axes: {})", missing.join(", ")));
    }
    if !attempted.is_empty() {
        description.push_str(&format!(", tried {}", attempted.join("; ")));
    }
    description
}

/// Errors raised when writing to or combining point containers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("{lookup}: conflicting values at {key}: {old} vs {new}")]
    Conflict {
        lookup: String,
        key: String,
        old: String,
        new: String,
    },

    #[error("{lookup}: cannot store {key}, missing axes: {}", .axes.join(", "))]
    MissingAxis {
        lookup: String,
        key: String,
        axes: Vec<String>,
    },

    #[error("axes overlap: {}", .axes.join(", "))]
    AxisOverlap { axes: Vec<String> },

    #[error("axes differ: [{}] vs [{}]", .left.join(", "), .right.join(", "))]
    AxisMismatch { left: Vec<String>, right: Vec<String> },

    #[error("{operation} produced no points")]
    EmptyResult { operation: &'static str },
}

/// Errors raised by a tree-rewriting pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error("malformed tree at {opcode}: {reason}")]
    Malformed { opcode: String, reason: String },
}

/// Errors raised while annotating or populating tables.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PopulationError {
    #[error("annotation {key} lacks a single value for {axis} (cell {cell:?})")]
    MissingKey {
        axis: String,
        key: String,
        cell: String,
    },

    #[error("no lookup for {axis} = {value}")]
    UnknownLookup { axis: String, value: String },

    #[error("unknown term {term:?} at row {row}, column {column}")]
    UnknownTerm {
        term: String,
        row: usize,
        column: usize,
    },

    #[error("row {row} has {found} cells, header has {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("no column named {0}")]
    MissingColumn(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors raised when parsing bracket templates.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unexpected ']' at {position}")]
    UnexpectedClose { position: usize },

    #[error("unclosed '[' opened at {position}")]
    Unclosed { position: usize },

    #[error("empty template")]
    Empty,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_lists_attempts() {
        let error = LookupError::NotFound {
            lookup: "finite-conjugations".to_string(),
            key: "{person: 2}".to_string(),
            attempted: vec!["{person: 2, verb: be}".to_string()],
            missing: vec![],
        };
        assert_eq!(
            error.to_string(),
            "finite-conjugations: no entry for {person: 2}, tried {person: 2, verb: be}"
        );
        assert!(error.is_not_found());
    }

    #[test]
    fn not_found_names_missing_axes() {
        let error = LookupError::NotFound {
            lookup: "articles".to_string(),
            key: "{}".to_string(),
            attempted: vec![],
            missing: vec!["definiteness".to_string()],
        };
        assert_eq!(
            error.to_string(),
            "articles: no entry for {} (missing axes: definiteness)"
        );
    }

    #[test]
    fn axis_overlap_names_axes() {
        let error = StoreError::AxisOverlap {
            axes: vec!["tense".to_string(), "voice".to_string()],
        };
        assert_eq!(error.to_string(), "axes overlap: tense, voice");
    }
}
