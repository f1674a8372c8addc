//! Property-based tests for the analysis utilities
//!
//! Core properties covered:
//! - proportion and acceptance-rate invariants (bounds, partition sums)
//! - contingency-table marginal consistency
//! - hypothesis-test outputs stay in their valid ranges
//! - outlier filter never keeps an excluded id and never grows the dataset
//! - reporting functions never mutate their input (fingerprint check)

use proptest::prelude::*;

use cribar::chi_squared::{chi_squared_test, ChiSquaredOptions, ChiSquaredTest};
use cribar::contingency::{crosstab, ContingencyTable};
use cribar::dataset::{ColumnData, PrDataset};
use cribar::describe::{describe, percentile_of_sorted};
use cribar::filter::filter_top_percent;
use cribar::fisher::FisherExactTest;
use cribar::rates::{conditional_acceptance_rate, percent_meeting_condition};

/// Dataset with one boolean feature column and an accepted column.
fn flag_dataset(rows: &[(bool, bool)]) -> PrDataset {
    let (flags, accepted): (Vec<bool>, Vec<bool>) = rows.iter().copied().unzip();
    PrDataset::new()
        .with_column("has_review", ColumnData::Bool(flags))
        .unwrap()
        .with_column("accepted", ColumnData::Bool(accepted))
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_percent_stays_in_bounds(
        rows in prop::collection::vec(any::<(bool, bool)>(), 0..200),
    ) {
        let ds = flag_dataset(&rows);
        let rate = percent_meeting_condition(&ds, "has_review").unwrap();

        prop_assert!(rate.matching <= rate.total);
        prop_assert!((0.0..=100.0).contains(&rate.percent));
        if rate.total == 0 {
            prop_assert_eq!(rate.percent, 0.0);
        }
    }

    #[test]
    fn prop_partition_sizes_sum_to_total(
        rows in prop::collection::vec(any::<(bool, bool)>(), 0..200),
    ) {
        let ds = flag_dataset(&rows);
        let rates = conditional_acceptance_rate(&ds, "has_review").unwrap();

        prop_assert_eq!(
            rates.with_condition.total + rates.without_condition.total,
            ds.len()
        );
        prop_assert!(rates.with_condition.rate >= 0.0 && rates.with_condition.rate <= 1.0);
        prop_assert!(rates.without_condition.rate >= 0.0 && rates.without_condition.rate <= 1.0);
    }

    #[test]
    fn prop_crosstab_marginals_consistent(
        rows in prop::collection::vec(any::<(bool, bool)>(), 1..200),
    ) {
        let ds = flag_dataset(&rows);
        let table = crosstab(&ds, "has_review", "accepted").unwrap();

        prop_assert_eq!(table.n(), rows.len() as u64);
        prop_assert_eq!(table.row_totals().iter().sum::<u64>(), table.n());
        prop_assert_eq!(table.col_totals().iter().sum::<u64>(), table.n());

        // every observed row label carries at least one count
        for total in table.row_totals() {
            prop_assert!(total > 0);
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_fisher_p_in_unit_interval(
        a in 0u64..200, b in 0u64..200, c in 0u64..200, d in 0u64..200,
    ) {
        let table = ContingencyTable::from_counts(
            "feature", "accepted",
            vec![vec![a, b], vec![c, d]],
        ).unwrap();
        let result = FisherExactTest::from_table(table).unwrap();

        prop_assert!(result.p_value >= 0.0);
        prop_assert!(result.p_value <= 1.0);
    }

    #[test]
    fn prop_chi_squared_outputs_valid(
        a in 1u64..200, b in 1u64..200, c in 1u64..200, d in 1u64..200,
        correction in any::<bool>(),
    ) {
        let table = ContingencyTable::from_counts(
            "feature", "accepted",
            vec![vec![a, b], vec![c, d]],
        ).unwrap();
        let result = ChiSquaredTest::from_table(table, &ChiSquaredOptions { correction }).unwrap();

        prop_assert!(result.statistic >= 0.0);
        prop_assert!(result.p_value >= 0.0 && result.p_value <= 1.0 + 1e-12);
        prop_assert_eq!(result.dof, 1);
        prop_assert!(result.cramers_v >= 0.0);
        prop_assert!(result.cramers_v <= 1.0 + 1e-9);
    }

    #[test]
    fn prop_describe_bounds(values in prop::collection::vec(-1e9f64..1e9, 1..100)) {
        let summary = describe(&values);

        prop_assert_eq!(summary.count, values.len());
        prop_assert!(summary.min <= summary.mean + 1e-3);
        prop_assert!(summary.mean <= summary.max + 1e-3);
        prop_assert!(summary.min <= summary.median + 1e-9);
        prop_assert!(summary.median <= summary.max + 1e-9);
        if summary.count >= 2 {
            prop_assert!(summary.std_dev >= 0.0);
        }
    }

    #[test]
    fn prop_percentile_monotonic(
        mut values in prop::collection::vec(-1e6f64..1e6, 1..50),
        p1 in 0.0f64..=100.0,
        p2 in 0.0f64..=100.0,
    ) {
        values.sort_by(f64::total_cmp);
        let (lo, hi) = if p1 <= p2 { (p1, p2) } else { (p2, p1) };
        prop_assert!(
            percentile_of_sorted(&values, lo) <= percentile_of_sorted(&values, hi) + 1e-9
        );
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_filter_survivors_disjoint_from_exclusions(
        values in prop::collection::vec(-1e6f64..1e6, 1..100),
        percent in 0.0f64..=100.0,
    ) {
        let ids: Vec<i64> = (0..values.len() as i64).collect();
        let ds = PrDataset::new()
            .with_column("id", ColumnData::Int(ids))
            .unwrap()
            .with_column("size", ColumnData::Float(values.clone()))
            .unwrap();

        let outcome = filter_top_percent(&ds, &["size"], percent).unwrap();

        prop_assert!(outcome.dataset.len() <= ds.len());
        prop_assert_eq!(outcome.dataset.len() + outcome.excluded_ids.len(), ds.len());
        for id in outcome.dataset.ids().unwrap() {
            prop_assert!(!outcome.excluded_ids.contains(id));
        }
    }

    #[test]
    fn prop_reporting_never_mutates_dataset(
        rows in prop::collection::vec(any::<(bool, bool)>(), 1..100),
        sizes_seed in prop::collection::vec(-1e6f64..1e6, 100),
    ) {
        let mut ds = flag_dataset(&rows);
        let rejected: Vec<bool> = rows.iter().map(|&(_, acc)| !acc).collect();
        let sizes: Vec<f64> = sizes_seed[..rows.len()].to_vec();
        ds.insert_column("rejected", ColumnData::Bool(rejected)).unwrap();
        ds.insert_column("size", ColumnData::Float(sizes)).unwrap();

        let before = ds.fingerprint();
        let rate = percent_meeting_condition(&ds, "has_review").unwrap();
        let _ = rate.to_report_string();
        let _ = conditional_acceptance_rate(&ds, "has_review").unwrap().to_report_string();
        let _ = cribar::describe::column_statistics(&ds, "size").unwrap().to_report_string();
        let _ = chi_squared_test(&ds, "has_review").unwrap().to_report_string();
        prop_assert_eq!(ds.fingerprint(), before);
    }

    #[test]
    fn prop_reports_render_identically_on_repeat(
        rows in prop::collection::vec(any::<(bool, bool)>(), 1..100),
    ) {
        let ds = flag_dataset(&rows);
        let first = conditional_acceptance_rate(&ds, "has_review").unwrap().to_report_string();
        let second = conditional_acceptance_rate(&ds, "has_review").unwrap().to_report_string();
        prop_assert_eq!(first, second);
    }
}
