//! Error handling for the card generator

use std::path::PathBuf;

use inflection_core::{ParseError, PopulationError, StoreError, TreeError};
use thiserror::Error;

/// Generator error types
#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid JSON in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Table error in {}: {source}", .path.display())]
    Table {
        path: PathBuf,
        source: PopulationError,
    },

    #[error("Template error in deck {deck}: {source}")]
    Template { deck: String, source: ParseError },

    #[error("Generation error in deck {deck}: {source}")]
    Generation { deck: String, source: TreeError },

    #[error("Traversal error in deck {deck}: {source}")]
    Traversal { deck: String, source: StoreError },

    #[error("Invalid definition: {0}")]
    Definition(String),
}

impl GeneratorError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for generator operations
pub type Result<T> = std::result::Result<T, GeneratorError>;
