//! Contingency tables by explicit two-key aggregation
//!
//! Cross-tabulates a feature column against an outcome column: counts of
//! each (feature value, outcome value) pair are accumulated into an ordered
//! map, then materialized as a label-sorted count matrix. Only values
//! observed in the data become rows or columns, so cross-tabulated tables
//! never carry empty margins.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::dataset::{Category, PrDataset};
use crate::error::{AnalysisError, AnalysisResult};

/// A matrix of counts cross-tabulating two categorical variables.
#[derive(Debug, Clone, Serialize)]
pub struct ContingencyTable {
    pub feature_column: String,
    pub outcome_column: String,
    /// Sorted distinct feature values, one per matrix row.
    pub row_labels: Vec<Category>,
    /// Sorted distinct outcome values, one per matrix column.
    pub col_labels: Vec<Category>,
    /// `counts[i][j]` is the number of rows with feature `row_labels[i]`
    /// and outcome `col_labels[j]`.
    pub counts: Vec<Vec<u64>>,
}

impl ContingencyTable {
    /// Build a table directly from a count matrix. Row and column labels
    /// are the matrix indices.
    ///
    /// The matrix must be rectangular and non-empty.
    pub fn from_counts(
        feature_column: impl Into<String>,
        outcome_column: impl Into<String>,
        counts: Vec<Vec<u64>>,
    ) -> AnalysisResult<Self> {
        if counts.is_empty() || counts[0].is_empty() {
            return Err(AnalysisError::EmptyTable);
        }
        let cols = counts[0].len();
        for (row, cells) in counts.iter().enumerate() {
            if cells.len() != cols {
                return Err(AnalysisError::RaggedRow {
                    row,
                    expected: cols,
                    actual: cells.len(),
                });
            }
        }
        let row_labels = (0..counts.len() as i64).map(Category::Int).collect();
        let col_labels = (0..cols as i64).map(Category::Int).collect();
        Ok(ContingencyTable {
            feature_column: feature_column.into(),
            outcome_column: outcome_column.into(),
            row_labels,
            col_labels,
            counts,
        })
    }

    /// Total sample size: the sum of all cells.
    pub fn n(&self) -> u64 {
        self.counts.iter().flatten().sum()
    }

    /// (rows, columns).
    pub fn shape(&self) -> (usize, usize) {
        let rows = self.counts.len();
        let cols = self.counts.first().map_or(0, Vec::len);
        (rows, cols)
    }

    /// Per-row marginal totals.
    pub fn row_totals(&self) -> Vec<u64> {
        self.counts.iter().map(|row| row.iter().sum()).collect()
    }

    /// Per-column marginal totals.
    pub fn col_totals(&self) -> Vec<u64> {
        let (_, cols) = self.shape();
        let mut totals = vec![0u64; cols];
        for row in &self.counts {
            for (total, &cell) in totals.iter_mut().zip(row) {
                *total += cell;
            }
        }
        totals
    }
}

impl fmt::Display for ContingencyTable {
    /// Aligned grid: outcome name and column labels on the first line, the
    /// feature name on the second, then one line per row label.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let row_names: Vec<String> = self.row_labels.iter().map(Category::to_string).collect();
        let stub_width = row_names
            .iter()
            .map(String::len)
            .chain([self.feature_column.len(), self.outcome_column.len()])
            .max()
            .unwrap_or(0);

        let col_names: Vec<String> = self.col_labels.iter().map(Category::to_string).collect();
        let col_widths: Vec<usize> = col_names
            .iter()
            .enumerate()
            .map(|(j, name)| {
                self.counts
                    .iter()
                    .map(|row| row[j].to_string().len())
                    .chain([name.len()])
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        write!(f, "{:<stub_width$}", self.outcome_column)?;
        for (name, &width) in col_names.iter().zip(&col_widths) {
            write!(f, "  {name:>width$}")?;
        }
        writeln!(f)?;
        writeln!(f, "{}", self.feature_column)?;
        for (name, row) in row_names.iter().zip(&self.counts) {
            write!(f, "{name:<stub_width$}")?;
            for (&cell, &width) in row.iter().zip(&col_widths) {
                write!(f, "  {cell:>width$}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Cross-tabulate `feature` against `outcome`.
///
/// Rows whose feature or outcome value is NaN are dropped, matching the
/// usual dataframe cross-tabulation behavior. An empty dataset yields an
/// empty (0 x 0) table.
pub fn crosstab(
    dataset: &PrDataset,
    feature: &str,
    outcome: &str,
) -> AnalysisResult<ContingencyTable> {
    let feature_values = dataset.category_column(feature)?;
    let outcome_values = dataset.category_column(outcome)?;

    let is_nan = |c: &Category| matches!(c, Category::Float(v) if v.is_nan());
    let mut pair_counts: BTreeMap<(Category, Category), u64> = BTreeMap::new();
    let mut row_set: BTreeSet<Category> = BTreeSet::new();
    let mut col_set: BTreeSet<Category> = BTreeSet::new();
    for (fv, ov) in feature_values.into_iter().zip(outcome_values) {
        if is_nan(&fv) || is_nan(&ov) {
            continue;
        }
        row_set.insert(fv.clone());
        col_set.insert(ov.clone());
        *pair_counts.entry((fv, ov)).or_insert(0) += 1;
    }

    let row_labels: Vec<Category> = row_set.into_iter().collect();
    let col_labels: Vec<Category> = col_set.into_iter().collect();
    let counts: Vec<Vec<u64>> = row_labels
        .iter()
        .map(|r| {
            col_labels
                .iter()
                .map(|c| {
                    pair_counts
                        .get(&(r.clone(), c.clone()))
                        .copied()
                        .unwrap_or(0)
                })
                .collect()
        })
        .collect();
    tracing::debug!(
        feature,
        outcome,
        rows = row_labels.len(),
        cols = col_labels.len(),
        "contingency table built"
    );

    Ok(ContingencyTable {
        feature_column: feature.to_string(),
        outcome_column: outcome.to_string(),
        row_labels,
        col_labels,
        counts,
    })
}
