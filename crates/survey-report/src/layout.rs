//! Output-relative artifact paths.

use survey_model::artifact_stem;

pub const TABLES_DIR: &str = "tables";
pub const FIGURES_DIR: &str = "figures";

pub const FACTOR_SUMMARY: &str = "tables/factor_summary.csv";
pub const OUTCOME_DISTRIBUTION: &str = "tables/outcome_distribution.csv";
pub const DATA_DICTIONARY: &str = "tables/data_dictionary.csv";
pub const CORRELATION_CHART: &str = "figures/factor_correlations.png";
pub const REPORT: &str = "report.md";
pub const MANIFEST: &str = "manifest.json";

pub fn crosstab_path(field: &str) -> String {
    format!("{TABLES_DIR}/crosstab_{}.csv", artifact_stem(field))
}

pub fn group_means_path(field: &str) -> String {
    format!("{TABLES_DIR}/group_means_{}.csv", artifact_stem(field))
}

pub fn outcome_chart_path(field: &str) -> String {
    format!("{FIGURES_DIR}/outcome_by_{}.png", artifact_stem(field))
}
