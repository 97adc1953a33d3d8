pub mod cards;
pub mod config;
pub mod definition;
pub mod error;
pub mod loader;
pub mod manifest;

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cards::{CardFormatting, Deck};
use crate::config::GeneratorConfig;
use crate::definition::DEFINITION_FILE;
use crate::error::{GeneratorError, Result};
use crate::loader::load_language;
use crate::manifest::{LanguageReport, Manifest};

pub fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = GeneratorConfig::from_env();
    info!(
        data = %config.data_dir.display(),
        output = %config.output_dir.display(),
        "Generating cards..."
    );

    let manifest = generate_all(&config).context("card generation failed")?;
    info!(
        languages = manifest.languages.len(),
        cards = manifest.generated(),
        "Done"
    );
    Ok(())
}

/// Generate every deck of every selected language and write the manifest.
///
/// A language that fails to load aborts the run.
pub fn generate_all(config: &GeneratorConfig) -> Result<Manifest> {
    let mut manifest = Manifest::new();
    for directory in language_directories(config)? {
        let loaded = load_language(&directory)?;
        let name = loaded.definition.name.clone();
        info!(language = %name, "Loaded language");

        let output_dir = config.output_dir.join(&name);
        let mut decks = Vec::with_capacity(loaded.definition.decks.len());
        for definition in &loaded.definition.decks {
            let deck = Deck::compile(definition)?;
            let (rendered, report) = cards::generate(&loaded.language, &deck)?;
            if rendered.is_empty() {
                warn!(language = %name, deck = %deck.output, "Deck produced no cards");
            }
            let rows = CardFormatting::new(deck.axes.clone()).rows(&rendered);
            let path = cards::write(&output_dir.join(&deck.output), &rows)?;
            info!(
                file = %path.display(),
                generated = report.generated,
                skipped = report.skipped,
                "Wrote deck"
            );
            decks.push(report);
        }
        manifest.languages.push(LanguageReport { name, decks });
    }

    std::fs::create_dir_all(&config.output_dir)
        .map_err(|e| GeneratorError::io(&config.output_dir, e))?;
    manifest.write(&config.output_dir)?;
    Ok(manifest)
}

/// Selected language directories, or every directory holding a definition.
fn language_directories(config: &GeneratorConfig) -> Result<Vec<PathBuf>> {
    if let Some(names) = &config.languages {
        return Ok(names.iter().map(|name| config.data_dir.join(name)).collect());
    }
    let entries = std::fs::read_dir(&config.data_dir)
        .map_err(|e| GeneratorError::io(&config.data_dir, e))?;
    let mut directories = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| GeneratorError::io(&config.data_dir, e))?.path();
        if has_definition(&path) {
            directories.push(path);
        }
    }
    directories.sort();
    Ok(directories)
}

fn has_definition(path: &Path) -> bool {
    path.is_dir() && path.join(DEFINITION_FILE).is_file()
}
