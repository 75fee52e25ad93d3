//! Property tests for the statistics primitives.

use proptest::prelude::*;

use survey_stats::{CrossTab, average_ranks, pearson, spearman};

proptest! {
    #[test]
    fn pearson_is_bounded(pairs in prop::collection::vec((1i64..=5, 1i64..=5), 3..60)) {
        let x: Vec<f64> = pairs.iter().map(|(a, _)| *a as f64).collect();
        let y: Vec<f64> = pairs.iter().map(|(_, b)| *b as f64).collect();
        if let Some(r) = pearson(&x, &y) {
            prop_assert!((-1.0..=1.0).contains(&r));
            let swapped = pearson(&y, &x).unwrap();
            prop_assert!((r - swapped).abs() < 1e-12);
        }
    }

    #[test]
    fn monotone_data_correlates_perfectly(
        values in prop::collection::btree_set(-1000i64..1000, 3..40)
    ) {
        let x: Vec<f64> = values.iter().map(|v| *v as f64).collect();
        let up: Vec<f64> = x.iter().map(|v| v * 3.0 + 1.0).collect();
        let down: Vec<f64> = x.iter().map(|v| -v).collect();
        prop_assert!((pearson(&x, &up).unwrap() - 1.0).abs() < 1e-9);
        prop_assert!((pearson(&x, &down).unwrap() + 1.0).abs() < 1e-9);
        let cubed: Vec<f64> = x.iter().map(|v| v.powi(3)).collect();
        prop_assert!((spearman(&x, &cubed).unwrap() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn ranks_sum_to_triangular_number(values in prop::collection::vec(0i64..6, 1..50)) {
        let x: Vec<f64> = values.iter().map(|v| *v as f64).collect();
        let n = x.len() as f64;
        let total: f64 = average_ranks(&x).iter().sum();
        prop_assert!((total - n * (n + 1.0) / 2.0).abs() < 1e-9);
    }

    #[test]
    fn crosstab_cells_sum_to_pairs(pairs in prop::collection::vec((0usize..5, 0usize..2), 0..200)) {
        let rows: Vec<String> = (1..=5).map(|i| i.to_string()).collect();
        let cols = vec!["No".to_string(), "Yes".to_string()];
        let table = CrossTab::from_pairs(rows, cols, pairs.iter().copied());
        prop_assert_eq!(table.total(), pairs.len());
        if let Some(test) = table.chi_square() {
            prop_assert!(test.statistic >= 0.0);
            prop_assert!((0.0..=1.0).contains(&test.p_value));
            prop_assert!(test.cramers_v <= 1.0 + 1e-9);
        }
    }
}
