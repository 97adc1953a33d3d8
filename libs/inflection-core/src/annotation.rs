//! Turning table rows into `(annotation, cell)` pairs.

use crate::error::PopulationError;
use crate::types::{Dictkey, Tags};
use std::collections::BTreeMap;

/// Invert `axis -> terms` into `term -> axis`.
pub fn tagaxis<I, A, T, S>(axes: I) -> BTreeMap<String, String>
where
    I: IntoIterator<Item = (A, T)>,
    A: Into<String>,
    T: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut inverted = BTreeMap::new();
    for (axis, terms) in axes {
        let axis = axis.into();
        for term in terms {
            inverted.insert(term.into(), axis.clone());
        }
    }
    inverted
}

/// Tables whose header row names an axis per column and one column holds
/// the values.
///
/// Axis cells may list several space-separated values; the row then
/// applies to each of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableAnnotation {
    pub value_column: String,
    /// Added to every row.
    pub tags: Tags,
}

impl TableAnnotation {
    pub fn new(value_column: impl Into<String>) -> Self {
        Self {
            value_column: value_column.into(),
            tags: Tags::new(),
        }
    }

    pub fn with_tags(mut self, tags: Tags) -> Self {
        self.tags = tags;
        self
    }

    pub fn annotate(&self, rows: &[Vec<String>]) -> Result<Vec<(Dictkey, String)>, PopulationError> {
        let Some((header, body)) = rows.split_first() else {
            return Ok(Vec::new());
        };
        let value_index = header
            .iter()
            .position(|axis| *axis == self.value_column)
            .ok_or_else(|| PopulationError::MissingColumn(self.value_column.clone()))?;

        let mut pairs = Vec::with_capacity(body.len());
        for (i, row) in body.iter().enumerate() {
            if row.len() != header.len() {
                return Err(PopulationError::RaggedRow {
                    row: i + 1,
                    expected: header.len(),
                    found: row.len(),
                });
            }
            let mut key = Dictkey::from(&self.tags);
            for (column, (axis, cell)) in header.iter().zip(row).enumerate() {
                if column == value_index || cell.is_empty() {
                    continue;
                }
                key.set(axis.clone(), cell.split_whitespace().map(str::to_string).collect());
            }
            pairs.push((key, row[value_index].clone()));
        }
        Ok(pairs)
    }
}

/// Grid tables: header rows and header columns hold grammatical terms that
/// locate every body cell.
///
/// Terms are resolved to axes through `tagaxis`. Header columns listed in
/// `key_columns` hold raw values of the named axis instead, e.g. a lemma
/// column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellAnnotation {
    pub tagaxis: BTreeMap<String, String>,
    pub header_rows: usize,
    pub header_columns: usize,
    pub key_columns: BTreeMap<usize, String>,
    pub tags: Tags,
}

impl CellAnnotation {
    pub fn new(tagaxis: BTreeMap<String, String>, header_rows: usize, header_columns: usize) -> Self {
        Self {
            tagaxis,
            header_rows,
            header_columns,
            key_columns: BTreeMap::new(),
            tags: Tags::new(),
        }
    }

    pub fn with_key_column(mut self, column: usize, axis: impl Into<String>) -> Self {
        self.key_columns.insert(column, axis.into());
        self
    }

    pub fn with_tags(mut self, tags: Tags) -> Self {
        self.tags = tags;
        self
    }

    fn annotate_terms(&self, key: &mut Dictkey, cell: &str, row: usize, column: usize) -> Result<(), PopulationError> {
        for term in cell.split_whitespace() {
            let axis = self
                .tagaxis
                .get(term)
                .ok_or_else(|| PopulationError::UnknownTerm {
                    term: term.to_string(),
                    row,
                    column,
                })?;
            key.insert(axis.clone(), term);
        }
        Ok(())
    }

    pub fn annotate(&self, rows: &[Vec<String>]) -> Result<Vec<(Dictkey, String)>, PopulationError> {
        let headers = &rows[..self.header_rows.min(rows.len())];
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);

        let mut column_keys = Vec::with_capacity(width);
        for column in 0..width {
            let mut key = Dictkey::new();
            if column >= self.header_columns {
                for (row, header) in headers.iter().enumerate() {
                    if let Some(cell) = header.get(column) {
                        self.annotate_terms(&mut key, cell, row, column)?;
                    }
                }
            }
            column_keys.push(key);
        }

        let mut pairs = Vec::new();
        for (row, cells) in rows.iter().enumerate().skip(self.header_rows) {
            let mut row_key = Dictkey::from(&self.tags);
            for (column, cell) in cells.iter().enumerate().take(self.header_columns) {
                match self.key_columns.get(&column) {
                    Some(axis) => {
                        if !cell.is_empty() {
                            row_key.set(axis.clone(), cell.split_whitespace().map(str::to_string).collect());
                        }
                    }
                    None => self.annotate_terms(&mut row_key, cell, row, column)?,
                }
            }
            for (column, cell) in cells.iter().enumerate().skip(self.header_columns) {
                pairs.push((row_key.merge(&column_keys[column]), cell.clone()));
            }
        }
        Ok(pairs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::tags;
    use pretty_assertions::assert_eq;

    fn rows(text: &[&[&str]]) -> Vec<Vec<String>> {
        text.iter()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect())
            .collect()
    }

    #[test]
    fn table_rows_become_keyed_cells() {
        let table = rows(&[
            &["verb", "person", "number", "form"],
            &["be", "1", "singular", "am"],
            &["be", "1 2 3", "plural", "are"],
        ]);
        let annotation = TableAnnotation::new("form").with_tags(tags([("verb-form", "finite")]));
        let pairs = annotation.annotate(&table).unwrap();

        assert_eq!(pairs.len(), 2);
        assert_eq!(
            pairs[0].0,
            Dictkey::new()
                .with("verb", "be")
                .with("person", "1")
                .with("number", "singular")
                .with("verb-form", "finite")
        );
        assert_eq!(pairs[1].0.get("person").unwrap(), ["1", "2", "3"]);
        assert_eq!(pairs[1].1, "are");
    }

    #[test]
    fn table_rejects_ragged_rows_and_missing_column() {
        let table = rows(&[&["verb", "form"], &["be"]]);
        assert!(matches!(
            TableAnnotation::new("form").annotate(&table),
            Err(PopulationError::RaggedRow { row: 1, expected: 2, found: 1 })
        ));
        assert!(matches!(
            TableAnnotation::new("value").annotate(&table),
            Err(PopulationError::MissingColumn(_))
        ));
    }

    fn grid_vocabulary() -> BTreeMap<String, String> {
        tagaxis([
            ("number", vec!["singular", "plural"]),
            ("case", vec!["nominative", "oblique"]),
            ("person", vec!["1", "3"]),
        ])
    }

    #[test]
    fn grid_cells_combine_row_and_column_headers() {
        let table = rows(&[
            &["", "", "singular", "plural"],
            &["1", "nominative", "I", "we"],
            &["1", "oblique", "me", "us"],
        ]);
        let annotation = CellAnnotation::new(grid_vocabulary(), 1, 2).with_tags(tags([("noun-form", "pronoun")]));
        let pairs = annotation.annotate(&table).unwrap();
        assert_eq!(pairs.len(), 4);
        assert_eq!(
            pairs[3],
            (
                Dictkey::new()
                    .with("person", "1")
                    .with("case", "oblique")
                    .with("number", "plural")
                    .with("noun-form", "pronoun"),
                "us".to_string()
            )
        );
    }

    #[test]
    fn key_columns_hold_raw_values() {
        let table = rows(&[&["", "singular", "plural"], &["man", "man", "men"]]);
        let annotation = CellAnnotation::new(grid_vocabulary(), 1, 1).with_key_column(0, "noun");
        let pairs = annotation.annotate(&table).unwrap();
        assert_eq!(pairs[1].0, Dictkey::new().with("noun", "man").with("number", "plural"));
        assert_eq!(pairs[1].1, "men");
    }

    #[test]
    fn unknown_header_terms_fail() {
        let table = rows(&[&["", "dual"], &["1", "x"]]);
        assert!(matches!(
            CellAnnotation::new(grid_vocabulary(), 1, 1).annotate(&table),
            Err(PopulationError::UnknownTerm { row: 0, column: 1, .. })
        ));
    }
}
