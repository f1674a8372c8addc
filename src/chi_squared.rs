//! Chi-squared test of independence with Cramér's V effect size
//!
//! Pearson statistic over an r x c contingency table, p-value from the
//! chi-squared survival function, and Cramér's V derived from the same
//! statistic. Yates' continuity correction is available for 2x2 tables but
//! off by default so the reported effect size stays consistent with the
//! uncorrected statistic.

use serde::Serialize;
use statrs::distribution::{ChiSquared, ContinuousCDF};

use crate::contingency::{crosstab, ContingencyTable};
use crate::dataset::PrDataset;
use crate::error::{AnalysisError, AnalysisResult};

/// Options for the chi-squared test.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChiSquaredOptions {
    /// Apply Yates' continuity correction, off by default. Only takes
    /// effect for tables with one degree of freedom (2x2).
    pub correction: bool,
}

/// Chi-squared test result for a feature column against acceptance.
#[derive(Debug, Clone, Serialize)]
pub struct ChiSquaredTest {
    pub table: ContingencyTable,
    pub statistic: f64,
    pub p_value: f64,
    pub dof: usize,
    /// Total sample size: sum of all table cells.
    pub n: u64,
    /// Expected frequencies under independence.
    pub expected: Vec<Vec<f64>>,
    /// sqrt(chi2 / (N * (k - 1))) with k = min(rows, cols). NaN when
    /// k <= 1 or N = 0.
    pub cramers_v: f64,
}

impl ChiSquaredTest {
    /// Run the test on an existing contingency table.
    ///
    /// A table with a single observed row or column (or none at all, from
    /// an empty dataset) has zero degrees of freedom: the statistic is 0,
    /// the p-value 1 and Cramér's V NaN. A zero expected frequency is an
    /// error; it can only arise from directly constructed tables with an
    /// all-zero margin, never from cross-tabulated data.
    pub fn from_table(
        table: ContingencyTable,
        options: &ChiSquaredOptions,
    ) -> AnalysisResult<Self> {
        let (rows, cols) = table.shape();
        let n = table.n();
        if rows == 0 || cols == 0 {
            return Ok(ChiSquaredTest {
                table,
                statistic: 0.0,
                p_value: 1.0,
                dof: 0,
                n,
                expected: Vec::new(),
                cramers_v: f64::NAN,
            });
        }
        if n == 0 {
            return Err(AnalysisError::ZeroExpectedFrequency { row: 0, col: 0 });
        }

        let row_totals = table.row_totals();
        let col_totals = table.col_totals();
        let mut expected = vec![vec![0.0; cols]; rows];
        for (i, row) in expected.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                let e = row_totals[i] as f64 * col_totals[j] as f64 / n as f64;
                if e == 0.0 {
                    return Err(AnalysisError::ZeroExpectedFrequency { row: i, col: j });
                }
                *cell = e;
            }
        }

        let dof = (rows - 1) * (cols - 1);
        let (statistic, p_value) = if dof == 0 {
            (0.0, 1.0)
        } else {
            let correct = options.correction && dof == 1;
            let mut chi2 = 0.0;
            for (obs_row, exp_row) in table.counts.iter().zip(&expected) {
                for (&obs, &exp) in obs_row.iter().zip(exp_row) {
                    let mut diff = (obs as f64 - exp).abs();
                    if correct {
                        diff = (diff - 0.5).max(0.0);
                    }
                    chi2 += diff * diff / exp;
                }
            }
            let dist = ChiSquared::new(dof as f64)
                .map_err(|e| AnalysisError::Numeric(e.to_string()))?;
            (chi2, dist.sf(chi2))
        };

        let k = rows.min(cols);
        let cramers_v = if k <= 1 {
            f64::NAN
        } else {
            (statistic / (n as f64 * (k - 1) as f64)).sqrt()
        };
        tracing::debug!(statistic, p_value, dof, n, "chi-squared test computed");

        Ok(ChiSquaredTest {
            table,
            statistic,
            p_value,
            dof,
            n,
            expected,
            cramers_v,
        })
    }

    pub fn to_report_string(&self) -> String {
        let mut report = String::new();
        report.push_str(&format!(
            "Chi-squared Test for '{}' vs '{}'\n",
            self.table.feature_column, self.table.outcome_column
        ));
        report.push_str("\nContingency Table:\n");
        report.push_str(&self.table.to_string());
        report.push_str(&format!("\nChi-squared statistic: {:.4}\n", self.statistic));
        report.push_str(&format!("P-value: {:.15}\n", self.p_value));
        report.push_str(&format!("Degrees of freedom: {}\n", self.dof));
        report.push_str(&format!("N: {}\n", self.n));
        report.push_str(&format!("Cramér's V: {:.4}\n", self.cramers_v));
        let p_rendered = if self.p_value < 0.001 {
            "< 0.001".to_string()
        } else {
            format!("= {:.3}", self.p_value)
        };
        report.push_str(&format!(
            "Summary: χ² = {:.2}, p {}, Cramér's V = {:.3}\n",
            self.statistic, p_rendered, self.cramers_v
        ));
        report
    }

    pub fn print_summary(&self) {
        print!("{}", self.to_report_string());
    }
}

/// Cross-tabulate a feature column against `accepted` and run the
/// chi-squared test of independence, without continuity correction.
pub fn chi_squared_test(
    dataset: &PrDataset,
    feature_column: &str,
) -> AnalysisResult<ChiSquaredTest> {
    let table = crosstab(dataset, feature_column, "accepted")?;
    ChiSquaredTest::from_table(table, &ChiSquaredOptions::default())
}
