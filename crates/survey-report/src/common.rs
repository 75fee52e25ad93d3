//! Fixed-precision number formatting shared by tables and the report.

/// Decimals for means, medians, correlations and test statistics.
pub const STAT_DECIMALS: usize = 3;
/// Decimals for percentages.
pub const PCT_DECIMALS: usize = 1;
/// Decimals for p-values and rates.
pub const P_DECIMALS: usize = 4;

/// Format with a fixed number of decimals, writing negative zero as zero.
pub fn format_fixed(value: f64, decimals: usize) -> String {
    let text = format!("{value:.decimals$}");
    match text.strip_prefix('-') {
        Some(rest) if rest.chars().all(|ch| ch == '0' || ch == '.') => rest.to_string(),
        _ => text,
    }
}

fn format_opt(value: Option<f64>, decimals: usize) -> String {
    value
        .filter(|v| v.is_finite())
        .map(|v| format_fixed(v, decimals))
        .unwrap_or_default()
}

pub fn format_stat(value: Option<f64>) -> String {
    format_opt(value, STAT_DECIMALS)
}

pub fn format_pct(value: Option<f64>) -> String {
    format_opt(value, PCT_DECIMALS)
}

pub fn format_p(value: Option<f64>) -> String {
    format_opt(value, P_DECIMALS)
}

/// Percentage of `count` in `total`; `None` when `total` is zero.
pub fn percent(count: usize, total: usize) -> Option<f64> {
    (total > 0).then(|| count as f64 / total as f64 * 100.0)
}
