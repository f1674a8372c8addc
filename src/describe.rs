//! Descriptive statistics over numeric columns
//!
//! NaN-skipping f64 kernel (mean, median, sample standard deviation,
//! linear-interpolated percentiles) plus the per-outcome column summary
//! that reports a numeric column separately for accepted and rejected PRs.

use serde::Serialize;
use std::fmt::Write as _;

use crate::dataset::PrDataset;
use crate::error::AnalysisResult;

/// Summary statistics for one set of values.
///
/// `count` is the number of non-NaN values. All other fields are NaN when
/// `count` is 0; `std_dev` is additionally NaN when `count` is 1 (sample
/// standard deviation needs at least two values).
#[derive(Debug, Clone, Copy, Serialize)]
pub struct DescriptiveSummary {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

/// Compute summary statistics, skipping NaN values first.
pub fn describe(values: &[f64]) -> DescriptiveSummary {
    let mut retained: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    let count = retained.len();
    if count == 0 {
        return DescriptiveSummary {
            count: 0,
            mean: f64::NAN,
            median: f64::NAN,
            std_dev: f64::NAN,
            min: f64::NAN,
            max: f64::NAN,
        };
    }

    let mean = retained.iter().sum::<f64>() / count as f64;
    let std_dev = if count < 2 {
        f64::NAN
    } else {
        let variance = retained
            .iter()
            .map(|v| (v - mean).powi(2))
            .sum::<f64>()
            / (count - 1) as f64;
        variance.sqrt()
    };

    retained.sort_by(f64::total_cmp);
    DescriptiveSummary {
        count,
        mean,
        median: percentile_of_sorted(&retained, 50.0),
        std_dev,
        min: retained[0],
        max: retained[count - 1],
    }
}

/// Value at the given percentile of an ascending-sorted slice, using linear
/// interpolation between closest ranks. Returns NaN for an empty slice.
pub fn percentile_of_sorted(sorted: &[f64], percentile: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    if sorted.len() == 1 {
        return sorted[0];
    }

    let index = (percentile / 100.0) * (sorted.len() - 1) as f64;
    let lower = index.floor() as usize;
    let upper = index.ceil() as usize;

    if lower == upper {
        sorted[lower]
    } else {
        let weight = index - lower as f64;
        sorted[lower] * (1.0 - weight) + sorted[upper] * weight
    }
}

/// Per-outcome summary of one numeric column.
#[derive(Debug, Clone, Serialize)]
pub struct ColumnStatistics {
    pub column: String,
    pub accepted: DescriptiveSummary,
    pub rejected: DescriptiveSummary,
}

impl ColumnStatistics {
    /// Render the report block.
    pub fn to_report_string(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Accepted PR Statistics for '{}':", self.column);
        Self::write_summary(&mut out, &self.accepted);
        let _ = writeln!(out);
        let _ = writeln!(out, "Rejected PR Statistics for '{}':", self.column);
        Self::write_summary(&mut out, &self.rejected);
        out
    }

    fn write_summary(out: &mut String, s: &DescriptiveSummary) {
        let _ = writeln!(out, "Mean = {}", s.mean);
        let _ = writeln!(out, "Median = {}", s.median);
        let _ = writeln!(out, "Standard Deviation = {}", s.std_dev);
        let _ = writeln!(out, "Min = {}", s.min);
        let _ = writeln!(out, "Max = {}", s.max);
    }

    /// Print the report to stdout.
    pub fn print_summary(&self) {
        print!("{}", self.to_report_string());
    }
}

/// Summarize a numeric column separately for accepted and for rejected PRs.
///
/// The two partitions are independent boolean filters over the `accepted`
/// and `rejected` columns. They need not cover the dataset (a PR can be
/// neither) and an empty partition yields NaN statistics.
pub fn column_statistics(dataset: &PrDataset, column: &str) -> AnalysisResult<ColumnStatistics> {
    let accepted_mask = dataset.bool_column("accepted")?;
    let rejected_mask = dataset.bool_column("rejected")?;
    let values = dataset.numeric_column(column)?;

    let partition = |mask: &[bool]| -> Vec<f64> {
        values
            .iter()
            .zip(mask)
            .filter(|(_, &keep)| keep)
            .map(|(&v, _)| v)
            .collect()
    };
    let accepted_values = partition(accepted_mask);
    let rejected_values = partition(rejected_mask);
    tracing::debug!(
        column,
        accepted = accepted_values.len(),
        rejected = rejected_values.len(),
        "summarizing column by outcome"
    );

    Ok(ColumnStatistics {
        column: column.to_string(),
        accepted: describe(&accepted_values),
        rejected: describe(&rejected_values),
    })
}
