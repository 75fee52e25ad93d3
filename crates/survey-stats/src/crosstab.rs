//! Outcome-by-factor contingency tables and the chi-square test of
//! independence.

use statrs::distribution::{ChiSquared, ContinuousCDF};

/// Counts of respondents per (outcome level, factor level) pair.
///
/// Rows follow the outcome scale, columns the factor levels, both in level
/// order and including levels nobody chose.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrossTab {
    pub row_labels: Vec<String>,
    pub col_labels: Vec<String>,
    /// `counts[row][col]`.
    pub counts: Vec<Vec<usize>>,
}

impl CrossTab {
    pub fn new(row_labels: Vec<String>, col_labels: Vec<String>) -> Self {
        let counts = vec![vec![0; col_labels.len()]; row_labels.len()];
        Self {
            row_labels,
            col_labels,
            counts,
        }
    }

    /// Tabulate index pairs; out-of-range pairs are ignored.
    pub fn from_pairs(
        row_labels: Vec<String>,
        col_labels: Vec<String>,
        pairs: impl IntoIterator<Item = (usize, usize)>,
    ) -> Self {
        let mut table = Self::new(row_labels, col_labels);
        for (row, col) in pairs {
            if let Some(cell) = table.counts.get_mut(row).and_then(|r| r.get_mut(col)) {
                *cell += 1;
            }
        }
        table
    }

    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }

    pub fn row_totals(&self) -> Vec<usize> {
        self.counts.iter().map(|row| row.iter().sum()).collect()
    }

    pub fn col_totals(&self) -> Vec<usize> {
        (0..self.col_labels.len())
            .map(|col| self.counts.iter().map(|row| row[col]).sum())
            .collect()
    }

    /// Pearson chi-square test of independence.
    ///
    /// Rows and columns with a zero margin are dropped first. `None` when
    /// fewer than two rows or two columns remain.
    pub fn chi_square(&self) -> Option<ChiSquareTest> {
        let row_totals = self.row_totals();
        let col_totals = self.col_totals();
        let rows: Vec<usize> = (0..row_totals.len()).filter(|r| row_totals[*r] > 0).collect();
        let cols: Vec<usize> = (0..col_totals.len()).filter(|c| col_totals[*c] > 0).collect();
        if rows.len() < 2 || cols.len() < 2 {
            return None;
        }

        let n = self.total() as f64;
        let mut statistic = 0.0;
        for &r in &rows {
            for &c in &cols {
                let expected = row_totals[r] as f64 * col_totals[c] as f64 / n;
                let diff = self.counts[r][c] as f64 - expected;
                statistic += diff * diff / expected;
            }
        }

        let dof = (rows.len() - 1) * (cols.len() - 1);
        let distribution = ChiSquared::new(dof as f64).ok()?;
        let p_value = distribution.sf(statistic).clamp(0.0, 1.0);
        let k = rows.len().min(cols.len()) - 1;
        let cramers_v = (statistic / (n * k as f64)).sqrt();

        Some(ChiSquareTest {
            statistic,
            dof,
            p_value,
            cramers_v,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChiSquareTest {
    pub statistic: f64,
    pub dof: usize,
    pub p_value: f64,
    /// Effect size in `[0, 1]`.
    pub cramers_v: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(n: usize) -> Vec<String> {
        (1..=n).map(|i| i.to_string()).collect()
    }

    #[test]
    fn independent_table_has_zero_statistic() {
        let mut table = CrossTab::new(labels(2), labels(2));
        table.counts = vec![vec![10, 20], vec![20, 40]];
        let test = table.chi_square().unwrap();
        assert!(test.statistic.abs() < 1e-9);
        assert_eq!(test.dof, 1);
        assert!((test.p_value - 1.0).abs() < 1e-6);
        assert!(test.cramers_v.abs() < 1e-4);
    }

    #[test]
    fn known_statistic() {
        let mut table = CrossTab::new(labels(2), labels(2));
        table.counts = vec![vec![20, 10], vec![10, 20]];
        let test = table.chi_square().unwrap();
        // expected 15 everywhere: 4 * 25 / 15
        assert!((test.statistic - 100.0 / 15.0).abs() < 1e-9);
        assert!((test.p_value - 0.009_823).abs() < 1e-5);
        assert!((test.cramers_v - (100.0f64 / 15.0 / 60.0).sqrt()).abs() < 1e-9);
    }

    #[test]
    fn zero_margins_are_dropped() {
        let mut table = CrossTab::new(labels(3), labels(3));
        table.counts = vec![vec![5, 0, 3], vec![0, 0, 0], vec![2, 0, 6]];
        let test = table.chi_square().unwrap();
        assert_eq!(test.dof, 1);
    }

    #[test]
    fn degenerate_table_has_no_test() {
        let mut table = CrossTab::new(labels(3), labels(2));
        table.counts = vec![vec![4, 0], vec![7, 0], vec![1, 0]];
        assert_eq!(table.chi_square(), None);
        assert_eq!(CrossTab::new(labels(2), labels(2)).chi_square(), None);
    }

    #[test]
    fn from_pairs_counts_and_ignores_out_of_range() {
        let table = CrossTab::from_pairs(labels(2), labels(2), [(0, 0), (0, 0), (1, 1), (5, 0)]);
        assert_eq!(table.counts, vec![vec![2, 0], vec![0, 1]]);
        assert_eq!(table.total(), 3);
        assert_eq!(table.row_totals(), vec![2, 1]);
        assert_eq!(table.col_totals(), vec![2, 1]);
    }
}
