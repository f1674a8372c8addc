//! Top-N% multi-column outlier filtering
//!
//! For each requested numeric column the rows at or above the
//! (100 - percent)-th percentile form that column's exclusion set; the
//! union of all exclusion sets is dropped from the dataset. The threshold
//! comparison is inclusive, so ties at the boundary can exclude more than
//! exactly N% of rows.

use serde::Serialize;
use std::collections::BTreeSet;

use crate::dataset::PrDataset;
use crate::describe::percentile_of_sorted;
use crate::error::{AnalysisError, AnalysisResult};

/// Default share of each column's upper tail to exclude, in percent.
pub const DEFAULT_FILTER_PERCENT: f64 = 10.0;

/// Exclusion summary for one column.
#[derive(Debug, Clone, Serialize)]
pub struct ColumnExclusion {
    pub column: String,
    /// Value at the (100 - percent)-th percentile of the column, NaN when
    /// the column holds no comparable values.
    pub threshold: f64,
    pub excluded: usize,
}

/// Result of the outlier filter: per-column exclusions, their union, and
/// the surviving dataset.
#[derive(Debug, Clone, Serialize)]
pub struct FilterOutcome {
    pub percent: f64,
    pub per_column: Vec<ColumnExclusion>,
    pub excluded_ids: BTreeSet<i64>,
    pub dataset: PrDataset,
}

impl FilterOutcome {
    pub fn to_report_string(&self) -> String {
        let mut report = String::new();
        for exclusion in &self.per_column {
            report.push_str(&format!(
                "PRs to exclude for {}: {}\n",
                exclusion.column, exclusion.excluded
            ));
        }
        report.push_str(&format!("Total Rows to Filter: {}\n", self.excluded_ids.len()));
        report
    }

    pub fn print_summary(&self) {
        print!("{}", self.to_report_string());
    }

    /// Consume the outcome, keeping only the filtered dataset.
    pub fn into_dataset(self) -> PrDataset {
        self.dataset
    }
}

/// Drop the rows falling in the top `percent` of any listed column.
///
/// Thresholds interpolate linearly and skip NaN values; NaN cells never
/// compare at or above a threshold and are never excluded. Rows are matched
/// by their `id` value and survivors keep their original order. Fails on an
/// empty column list, a percentage outside [0, 100], or a missing/non-numeric
/// column.
pub fn filter_top_percent(
    dataset: &PrDataset,
    columns: &[&str],
    percent: f64,
) -> AnalysisResult<FilterOutcome> {
    if columns.is_empty() {
        return Err(AnalysisError::EmptyColumnList);
    }
    if !(0.0..=100.0).contains(&percent) {
        return Err(AnalysisError::InvalidPercent(percent));
    }
    let ids = dataset.ids()?;

    let mut excluded_ids: BTreeSet<i64> = BTreeSet::new();
    let mut per_column = Vec::with_capacity(columns.len());
    for &column in columns {
        let values = dataset.numeric_column(column)?;
        let mut sorted: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
        sorted.sort_by(f64::total_cmp);
        let threshold = percentile_of_sorted(&sorted, 100.0 - percent);

        let column_ids: BTreeSet<i64> = ids
            .iter()
            .zip(&values)
            .filter(|&(_, &value)| value >= threshold)
            .map(|(&id, _)| id)
            .collect();
        tracing::debug!(
            column,
            threshold,
            excluded = column_ids.len(),
            "column exclusion set computed"
        );
        per_column.push(ColumnExclusion {
            column: column.to_string(),
            threshold,
            excluded: column_ids.len(),
        });
        excluded_ids.extend(column_ids);
    }

    let mask: Vec<bool> = ids.iter().map(|id| !excluded_ids.contains(id)).collect();
    let dataset = dataset.select(&mask)?;
    Ok(FilterOutcome {
        percent,
        per_column,
        excluded_ids,
        dataset,
    })
}
