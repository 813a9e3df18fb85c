//! # Categorical Feature Encoding
//!
//! One-hot expansion of categorical columns. The fitted encoder is a
//! data-dependent parameter of the model: it is serialized inside the
//! trained artifact so that prediction-time encoding reproduces the
//! training-time layout exactly.
//!
//! - Order Independence: category tables are sorted lexicographically at fit
//!   time, so the encoded layout does not depend on row order in the
//!   training data.
//! - Lenient Transform: a value unseen at fit time encodes to an all-zero
//!   block rather than an error.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("Cannot fit an encoder on categorical column {0}: it contains no values.")]
    EmptyColumn(usize),
    #[error(
        "Row has {found} categorical values, but the encoder was fitted on {expected} columns."
    )]
    MismatchedColumnCount { found: usize, expected: usize },
}

/// One-hot encoder over a fixed set of categorical columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OneHotEncoder {
    /// Sorted, deduplicated category table per column.
    categories: Vec<Vec<String>>,
}

impl OneHotEncoder {
    /// Learns one category table per column from training values.
    pub fn fit(columns: &[Vec<String>]) -> Result<Self, EncodeError> {
        let mut categories = Vec::with_capacity(columns.len());
        for (index, column) in columns.iter().enumerate() {
            if column.is_empty() {
                return Err(EncodeError::EmptyColumn(index));
            }
            let mut table = column.clone();
            table.sort_unstable();
            table.dedup();
            categories.push(table);
        }
        Ok(Self { categories })
    }

    /// Total width of the one-hot expansion across all columns.
    pub fn width(&self) -> usize {
        self.categories.iter().map(Vec::len).sum()
    }

    /// The fitted category tables, in column order.
    pub fn categories(&self) -> &[Vec<String>] {
        &self.categories
    }

    /// Encodes one row of categorical values into a dense 0/1 block.
    ///
    /// An unknown value leaves its column's block at zero; a wrong number of
    /// values is a hard error because it means the caller and the fitted
    /// encoder disagree about the schema.
    pub fn transform_row(&self, row: &[&str]) -> Result<Vec<f64>, EncodeError> {
        if row.len() != self.categories.len() {
            return Err(EncodeError::MismatchedColumnCount {
                found: row.len(),
                expected: self.categories.len(),
            });
        }
        let mut encoded = vec![0.0; self.width()];
        let mut offset = 0;
        for (table, &value) in self.categories.iter().zip(row) {
            if let Ok(position) = table.binary_search_by(|category| category.as_str().cmp(value)) {
                encoded[offset + position] = 1.0;
            }
            offset += table.len();
        }
        Ok(encoded)
    }
}
