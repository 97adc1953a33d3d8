//! Run manifest written next to the generated decks.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cards::DeckReport;
use crate::error::{GeneratorError, Result};

pub const MANIFEST_FILE: &str = "manifest.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub generated_at: DateTime<Utc>,
    pub languages: Vec<LanguageReport>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageReport {
    pub name: String,
    pub decks: Vec<DeckReport>,
}

impl Manifest {
    pub fn new() -> Self {
        Self {
            generated_at: Utc::now(),
            languages: Vec::new(),
        }
    }

    /// Total cards written across every deck.
    pub fn generated(&self) -> usize {
        self.languages
            .iter()
            .flat_map(|language| &language.decks)
            .map(|deck| deck.generated)
            .sum()
    }

    pub fn write(&self, directory: &Path) -> Result<()> {
        let path = directory.join(MANIFEST_FILE);
        let json = serde_json::to_string_pretty(self).map_err(|source| GeneratorError::Json {
            path: path.clone(),
            source,
        })?;
        std::fs::write(&path, json).map_err(|e| GeneratorError::io(&path, e))
    }
}

impl Default for Manifest {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_serialization() {
        let mut manifest = Manifest::new();
        manifest.languages.push(LanguageReport {
            name: "english".to_string(),
            decks: vec![
                DeckReport {
                    output: "be.html".to_string(),
                    generated: 5,
                    skipped: 1,
                },
                DeckReport {
                    output: "eat.html".to_string(),
                    generated: 3,
                    skipped: 0,
                },
            ],
        });
        assert_eq!(manifest.generated(), 8);

        let json = serde_json::to_value(&manifest).unwrap();
        assert_eq!(json["languages"][0]["decks"][0]["skipped"], 1);
        assert!(json["generated_at"].is_string());

        let parsed: Manifest = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, manifest);
    }
}
