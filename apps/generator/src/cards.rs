//! Traversing a deck and rendering its cards.

use std::path::{Path, PathBuf};

use inflection_core::{parse_template, DictList, DictSpace, Language, Node, StoreError, Tags};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::definition::DeckDefinition;
use crate::error::{GeneratorError, Result};

/// A deck with its template parsed and its traversal resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct Deck {
    pub output: String,
    pub template: Node,
    /// Traversal axes in display order.
    pub axes: Vec<String>,
    pub points: DictList,
    pub tags: Tags,
}

impl Deck {
    pub fn compile(definition: &DeckDefinition) -> Result<Self> {
        let template = parse_template(&definition.template).map_err(|source| GeneratorError::Template {
            deck: definition.output.clone(),
            source,
        })?;
        let traversal_error = |source| GeneratorError::Traversal {
            deck: definition.output.clone(),
            source,
        };

        let axes: Vec<String> = definition.traversal.iter().map(|(axis, _)| axis.clone()).collect();
        let mut points = DictSpace::new(definition.traversal.clone()).to_list();
        for exclude in &definition.exclude {
            if exclude.keys().any(|axis| !axes.contains(axis)) {
                return Err(traversal_error(StoreError::AxisMismatch {
                    left: axes,
                    right: exclude.keys().cloned().collect(),
                }));
            }
            let region = DictSpace::new(
                exclude
                    .iter()
                    .map(|(axis, value)| (axis.clone(), [value.clone()])),
            );
            points = points.difference(&region).map_err(traversal_error)?;
        }

        Ok(Self {
            output: definition.output.clone(),
            template,
            axes,
            points,
            tags: definition.tags.clone(),
        })
    }
}

/// One rendered sentence and the point it was rendered at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub point: Tags,
    pub sentence: String,
}

/// Counts for one deck, as recorded in the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckReport {
    pub output: String,
    pub generated: usize,
    pub skipped: usize,
}

/// Render every point of `deck`. Points with a missing form are skipped.
pub fn generate(language: &Language, deck: &Deck) -> Result<(Vec<Card>, DeckReport)> {
    let mut cards = Vec::new();
    let mut skipped = 0;
    for point in deck.points.iter().filter_map(|point| point.to_tags()) {
        let mut memory = deck.tags.clone();
        memory.extend(point.clone());
        let sentence = language
            .map(&deck.template, &memory)
            .map_err(|source| GeneratorError::Generation {
                deck: deck.output.clone(),
                source,
            })?;
        match sentence {
            Some(sentence) => cards.push(Card { point, sentence }),
            None => {
                debug!(deck = %deck.output, ?point, "no sentence for point");
                skipped += 1;
            }
        }
    }
    let report = DeckReport {
        output: deck.output.clone(),
        generated: cards.len(),
        skipped,
    };
    Ok((cards, report))
}

/// Renders cards as HTML rows for flashcard import.
#[derive(Debug, Clone, Default)]
pub struct CardFormatting {
    axes: Vec<String>,
}

impl CardFormatting {
    /// Point values are shown in `axes` order.
    pub fn new(axes: Vec<String>) -> Self {
        Self { axes }
    }

    pub fn row(&self, card: &Card) -> String {
        let point = self
            .axes
            .iter()
            .filter_map(|axis| card.point.get(axis))
            .map(String::as_str)
            .map(escape)
            .collect::<Vec<_>>()
            .join(" ");
        format!(
            r#"<div class="point">{}</div><div class="sentence">{}</div>"#,
            point,
            escape(&card.sentence)
        )
    }

    pub fn rows(&self, cards: &[Card]) -> Vec<String> {
        cards.iter().map(|card| self.row(card)).collect()
    }
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Overwrite `path` with one row per line, creating parent directories.
pub fn write(path: &Path, rows: &[String]) -> Result<PathBuf> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| GeneratorError::io(parent, e))?;
    }
    let mut content = rows.join("\n");
    if !content.is_empty() {
        content.push('\n');
    }
    std::fs::write(path, content).map_err(|e| GeneratorError::io(path, e))?;
    Ok(path.to_path_buf())
}
