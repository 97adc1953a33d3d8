//! Common test utilities and fixtures for integration tests.
//!
//! This module provides shared test infrastructure including:
//! - TestContext owning a scratch data and output directory
//! - Fixture writers for a small English language directory

pub mod fixtures;

use std::path::{Path, PathBuf};

use uuid::Uuid;

use inflection_cards::config::GeneratorConfig;

/// Test context owning a temporary directory tree.
///
/// The directory is removed when the context is dropped.
pub struct TestContext {
    root: PathBuf,
}

impl TestContext {
    /// Create a new, empty test context.
    pub fn new() -> Self {
        let root = std::env::temp_dir().join(format!("inflection-cards-{}", Uuid::new_v4()));
        std::fs::create_dir_all(root.join("data")).expect("Failed to create data directory");
        Self { root }
    }

    /// Create a test context with the English fixture language installed.
    pub fn with_english() -> Self {
        let ctx = Self::new();
        fixtures::write_english(&ctx.language_dir("english"));
        ctx
    }

    pub fn data_dir(&self) -> PathBuf {
        self.root.join("data")
    }

    pub fn output_dir(&self) -> PathBuf {
        self.root.join("output")
    }

    pub fn language_dir(&self, name: &str) -> PathBuf {
        self.data_dir().join(name)
    }

    pub fn config(&self) -> GeneratorConfig {
        GeneratorConfig {
            data_dir: self.data_dir(),
            output_dir: self.output_dir(),
            languages: None,
        }
    }

    /// Read a generated file, one entry per line.
    pub fn read_lines(&self, path: impl AsRef<Path>) -> Vec<String> {
        let content = std::fs::read_to_string(self.output_dir().join(path))
            .expect("Failed to read generated file");
        content.lines().map(str::to_string).collect()
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.root);
    }
}
