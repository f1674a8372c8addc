//! Proportion and conditional acceptance-rate reporting
//!
//! Two reporters over a boolean feature column: the share of PRs where the
//! column is true, and the acceptance rate inside / outside that group.
//! Zero denominators report a rate of 0 instead of failing.

use serde::Serialize;

use crate::dataset::PrDataset;
use crate::error::AnalysisResult;

/// Share of rows where a boolean column is true.
#[derive(Debug, Clone, Serialize)]
pub struct ConditionRate {
    pub column: String,
    pub matching: usize,
    pub total: usize,
    pub percent: f64,
}

impl ConditionRate {
    pub fn to_report_string(&self) -> String {
        format!(
            "Percentage of PRs with {}: {:.2}% ({}/{})\n",
            self.column, self.percent, self.matching, self.total
        )
    }

    pub fn print_summary(&self) {
        print!("{}", self.to_report_string());
    }
}

/// Compute the percentage of PRs for which `column` is true.
///
/// An empty dataset reports 0% with counts 0/0.
pub fn percent_meeting_condition(
    dataset: &PrDataset,
    column: &str,
) -> AnalysisResult<ConditionRate> {
    let flags = dataset.bool_column(column)?;
    let matching = flags.iter().filter(|&&b| b).count();
    let total = dataset.len();
    let percent = if total > 0 {
        matching as f64 / total as f64 * 100.0
    } else {
        0.0
    };
    tracing::debug!(column, matching, total, "proportion computed");
    Ok(ConditionRate {
        column: column.to_string(),
        matching,
        total,
        percent,
    })
}

/// Acceptance counts and rate for one partition.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct GroupAcceptance {
    pub accepted: usize,
    pub total: usize,
    /// accepted / total, 0 when the partition is empty.
    pub rate: f64,
}

impl GroupAcceptance {
    fn from_counts(accepted: usize, total: usize) -> Self {
        let rate = if total > 0 {
            accepted as f64 / total as f64
        } else {
            0.0
        };
        GroupAcceptance {
            accepted,
            total,
            rate,
        }
    }
}

/// Acceptance rate for PRs with and without a boolean condition.
#[derive(Debug, Clone, Serialize)]
pub struct ConditionalAcceptance {
    pub column: String,
    pub with_condition: GroupAcceptance,
    pub without_condition: GroupAcceptance,
}

impl ConditionalAcceptance {
    pub fn to_report_string(&self) -> String {
        let mut report = String::new();
        report.push_str(&format!(
            "Acceptance rate for PRs with {}: {:.2}% ({}/{})\n",
            self.column,
            self.with_condition.rate * 100.0,
            self.with_condition.accepted,
            self.with_condition.total
        ));
        report.push_str(&format!(
            "Acceptance rate for PRs without {}: {:.2}% ({}/{})\n",
            self.column,
            self.without_condition.rate * 100.0,
            self.without_condition.accepted,
            self.without_condition.total
        ));
        report
    }

    pub fn print_summary(&self) {
        print!("{}", self.to_report_string());
    }
}

/// Partition rows by a boolean column and compute the acceptance rate of
/// each partition.
///
/// The two partition sizes always sum to the dataset row count.
pub fn conditional_acceptance_rate(
    dataset: &PrDataset,
    column: &str,
) -> AnalysisResult<ConditionalAcceptance> {
    let flags = dataset.bool_column(column)?;
    let accepted = dataset.bool_column("accepted")?;

    let mut with_total = 0;
    let mut with_accepted = 0;
    let mut without_total = 0;
    let mut without_accepted = 0;
    for (&flag, &acc) in flags.iter().zip(accepted) {
        if flag {
            with_total += 1;
            with_accepted += usize::from(acc);
        } else {
            without_total += 1;
            without_accepted += usize::from(acc);
        }
    }
    tracing::debug!(
        column,
        with_total,
        without_total,
        "acceptance partitions computed"
    );

    Ok(ConditionalAcceptance {
        column: column.to_string(),
        with_condition: GroupAcceptance::from_counts(with_accepted, with_total),
        without_condition: GroupAcceptance::from_counts(without_accepted, without_total),
    })
}
