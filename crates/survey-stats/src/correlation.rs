//! Correlation between the outcome and an ordered factor.

use survey_model::CorrelationMethod;

/// Minimum number of pairs for a correlation to be reported.
pub const MIN_PAIRS: usize = 3;

/// Pearson product-moment correlation.
///
/// `None` when fewer than [`MIN_PAIRS`] pairs exist, the slices differ in
/// length, or either side has zero variance.
pub fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    if x.len() != y.len() || x.len() < MIN_PAIRS {
        return None;
    }
    let n = x.len() as f64;
    let mx = x.iter().sum::<f64>() / n;
    let my = y.iter().sum::<f64>() / n;
    let mut num = 0.0;
    let mut den_x = 0.0;
    let mut den_y = 0.0;
    for (a, b) in x.iter().zip(y) {
        let dx = a - mx;
        let dy = b - my;
        num += dx * dy;
        den_x += dx * dx;
        den_y += dy * dy;
    }
    if den_x == 0.0 || den_y == 0.0 {
        return None;
    }
    let r = num / (den_x.sqrt() * den_y.sqrt());
    Some(r.clamp(-1.0, 1.0))
}

/// Ranks starting at 1, ties sharing the average of their positions.
pub fn average_ranks(values: &[f64]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|a, b| values[*a].total_cmp(&values[*b]));
    let mut ranks = vec![0.0; values.len()];
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && values[order[end]] == values[order[start]] {
            end += 1;
        }
        // positions start..end hold ties; 1-based ranks start+1..=end
        let rank = (start + 1 + end) as f64 / 2.0;
        for idx in &order[start..end] {
            ranks[*idx] = rank;
        }
        start = end;
    }
    ranks
}

/// Spearman rank correlation (Pearson over average ranks).
pub fn spearman(x: &[f64], y: &[f64]) -> Option<f64> {
    if x.len() != y.len() {
        return None;
    }
    pearson(&average_ranks(x), &average_ranks(y))
}

pub fn correlate(method: CorrelationMethod, x: &[f64], y: &[f64]) -> Option<f64> {
    match method {
        CorrelationMethod::Pearson => pearson(x, y),
        CorrelationMethod::Spearman => spearman(x, y),
    }
}
