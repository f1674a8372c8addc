//! Fisher's exact test for 2x2 contingency tables
//!
//! Sample odds ratio plus the conditional two-sided p-value: hypergeometric
//! point probabilities are summed over every table with the observed margins
//! whose probability does not exceed the observed table's. Point
//! probabilities use log-binomial coefficients to stay stable for large
//! cell counts.

use serde::Serialize;
use statrs::function::gamma::ln_gamma;

use crate::contingency::{crosstab, ContingencyTable};
use crate::dataset::PrDataset;
use crate::error::{AnalysisError, AnalysisResult};

/// Tables more extreme by at most this relative factor still count as the
/// observed probability (guards against ties lost to rounding).
const RELATIVE_ERROR: f64 = 1.0 + 1e-7;

/// Fisher's exact test result for a feature column against acceptance.
#[derive(Debug, Clone, Serialize)]
pub struct FisherExactTest {
    pub table: ContingencyTable,
    /// Sample odds ratio `(a*d)/(b*c)`. Infinite when only `b*c` is zero,
    /// NaN when both products are zero.
    pub odds_ratio: f64,
    /// Two-sided p-value.
    pub p_value: f64,
}

impl FisherExactTest {
    /// Run the test on an existing 2x2 table.
    pub fn from_table(table: ContingencyTable) -> AnalysisResult<Self> {
        let (rows, cols) = table.shape();
        if rows != 2 || cols != 2 {
            return Err(AnalysisError::NotTwoByTwo { rows, cols });
        }
        let a = table.counts[0][0];
        let b = table.counts[0][1];
        let c = table.counts[1][0];
        let d = table.counts[1][1];

        let odds_ratio = (a as f64 * d as f64) / (b as f64 * c as f64);
        let p_value = two_sided_p(a, b, c, d);
        tracing::debug!(a, b, c, d, p_value, "Fisher's exact test computed");

        Ok(FisherExactTest {
            table,
            odds_ratio,
            p_value,
        })
    }

    pub fn to_report_string(&self) -> String {
        let mut report = String::new();
        report.push_str(&format!(
            "Fisher's Exact Test for '{}' vs '{}'\n",
            self.table.feature_column, self.table.outcome_column
        ));
        report.push_str("\nContingency Table:\n");
        report.push_str(&self.table.to_string());
        report.push_str(&format!("\nOdds Ratio: {:.4}\n", self.odds_ratio));
        report.push_str(&format!("P-value: {:.4}\n", self.p_value));
        report
    }

    pub fn print_summary(&self) {
        print!("{}", self.to_report_string());
    }
}

/// Cross-tabulate a feature column against `accepted` and run Fisher's
/// exact test. The feature must take exactly two observed values.
pub fn fishers_exact_test(
    dataset: &PrDataset,
    feature_column: &str,
) -> AnalysisResult<FisherExactTest> {
    let table = crosstab(dataset, feature_column, "accepted")?;
    FisherExactTest::from_table(table)
}

fn ln_binomial(n: u64, k: u64) -> f64 {
    ln_gamma(n as f64 + 1.0) - ln_gamma(k as f64 + 1.0) - ln_gamma((n - k) as f64 + 1.0)
}

/// Hypergeometric log-probability of drawing `x` successes in `draws` from
/// a population of `n` containing `successes`.
fn hypergeom_ln_pmf(x: u64, n: u64, successes: u64, draws: u64) -> f64 {
    ln_binomial(successes, x) + ln_binomial(n - successes, draws - x) - ln_binomial(n, draws)
}

/// Two-sided p-value conditional on the table margins: the sum of P(x) over
/// the support where P(x) does not exceed the observed probability.
fn two_sided_p(a: u64, b: u64, c: u64, d: u64) -> f64 {
    let row1 = a + b;
    let col1 = a + c;
    let n = a + b + c + d;

    let lo = (row1 + col1).saturating_sub(n);
    let hi = row1.min(col1);
    let p_observed = hypergeom_ln_pmf(a, n, col1, row1).exp();

    let mut p = 0.0;
    for x in lo..=hi {
        let p_x = hypergeom_ln_pmf(x, n, col1, row1).exp();
        if p_x <= p_observed * RELATIVE_ERROR {
            p += p_x;
        }
    }
    p.min(1.0)
}
