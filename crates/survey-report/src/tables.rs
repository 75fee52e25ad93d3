//! CSV tables.
//!
//! Tables are built in memory and encoded in one go so the bytes written to
//! disk are the bytes recorded in the manifest.

use std::path::Path;

use serde_json::{Map, Value};

use survey_stats::{DictionaryEntry, FactorResult, LevelCount, SurveyAnalysis};

use crate::common::{format_fixed, format_p, format_pct, format_stat, percent, P_DECIMALS};
use crate::error::{ReportError, Result};

/// A rectangular table of formatted cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    fn new(headers: &[&str]) -> Self {
        Self {
            headers: headers.iter().map(|h| (*h).to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// Encode as CSV; `path` is only used for error reporting.
    pub fn to_csv(&self, path: &Path) -> Result<Vec<u8>> {
        let csv_error = |source| ReportError::Csv {
            path: path.to_path_buf(),
            source,
        };
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(&self.headers).map_err(csv_error)?;
        for row in &self.rows {
            writer.write_record(row).map_err(csv_error)?;
        }
        writer
            .into_inner()
            .map_err(|err| ReportError::io("encode", path, err.into_error()))
    }
}

pub const FACTOR_SUMMARY_HEADERS: &[&str] = &[
    "factor_field",
    "factor_label",
    "kind",
    "n",
    "mean",
    "median",
    "top_box_pct",
    "correlation",
    "abs_corr",
    "chi_square",
    "dof",
    "p_value",
    "cramers_v",
    "distribution",
];

/// One row per analysed factor, in analysis order.
pub fn factor_summary(analysis: &SurveyAnalysis) -> Table {
    let mut table = Table::new(FACTOR_SUMMARY_HEADERS);
    for factor in &analysis.factors {
        let chi = factor.chi_square.as_ref();
        table.rows.push(vec![
            factor.field.clone(),
            factor.label.clone(),
            factor.kind.to_string(),
            factor.n.to_string(),
            format_stat(factor.mean),
            format_stat(factor.median),
            format_pct(factor.top_box_pct),
            format_stat(factor.correlation),
            format_stat(factor.abs_correlation()),
            format_stat(chi.map(|c| c.statistic)),
            chi.map(|c| c.dof.to_string()).unwrap_or_default(),
            format_p(chi.map(|c| c.p_value)),
            format_stat(chi.map(|c| c.cramers_v)),
            distribution_json(&factor.distribution),
        ]);
    }
    table
}

/// Level counts as a compact JSON object keyed by code, or by label for
/// levels without a code.
pub fn distribution_json(levels: &[LevelCount]) -> String {
    let map: Map<String, Value> = levels
        .iter()
        .map(|level| {
            let key = level
                .code
                .map(|code| code.to_string())
                .unwrap_or_else(|| level.label.clone());
            (key, Value::from(level.count))
        })
        .collect();
    Value::Object(map).to_string()
}

pub fn outcome_distribution(analysis: &SurveyAnalysis) -> Table {
    let outcome = &analysis.outcome;
    let mut table = Table::new(&["code", "label", "count", "percent"]);
    for level in &outcome.levels {
        table.rows.push(vec![
            level.code.map(|c| c.to_string()).unwrap_or_default(),
            level.label.clone(),
            level.count.to_string(),
            format_pct(percent(level.count, outcome.n)),
        ]);
    }
    table
}

/// Outcome-level rows by factor-level columns.
pub fn crosstab(analysis: &SurveyAnalysis, factor: &FactorResult) -> Table {
    let mut headers = vec![analysis.outcome.field.clone()];
    headers.extend(factor.crosstab.col_labels.iter().cloned());
    let rows = factor
        .crosstab
        .row_labels
        .iter()
        .zip(&factor.crosstab.counts)
        .map(|(label, counts)| {
            std::iter::once(label.clone())
                .chain(counts.iter().map(ToString::to_string))
                .collect()
        })
        .collect();
    Table { headers, rows }
}

pub fn group_means(factor: &FactorResult) -> Table {
    let mut table = Table::new(&[
        "factor_code",
        "factor_level",
        "n",
        "outcome_mean",
        "outcome_median",
        "outcome_sd",
    ]);
    for group in &factor.groups {
        table.rows.push(vec![
            group.code.map(|c| c.to_string()).unwrap_or_default(),
            group.label.clone(),
            group.n.to_string(),
            format_stat(group.mean),
            format_stat(group.median),
            format_stat(group.std_dev),
        ]);
    }
    table
}

pub fn data_dictionary(entries: &[DictionaryEntry]) -> Table {
    let mut table = Table::new(&[
        "field_name",
        "question_text",
        "type",
        "value_labels",
        "missing_rate",
    ]);
    for entry in entries {
        table.rows.push(vec![
            entry.field.clone(),
            entry.question.clone(),
            entry.field_type.as_str().to_string(),
            entry.values.join(" | "),
            entry
                .missing_rate
                .map(|rate| format_fixed(rate, P_DECIMALS))
                .unwrap_or_default(),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distribution_keys_by_code_or_label() {
        let coded = vec![
            LevelCount {
                code: Some(0),
                label: "No".to_string(),
                count: 3,
            },
            LevelCount {
                code: Some(1),
                label: "Yes".to_string(),
                count: 7,
            },
        ];
        assert_eq!(distribution_json(&coded), r#"{"0":3,"1":7}"#);

        let labelled = vec![LevelCount {
            code: None,
            label: "Full-time".to_string(),
            count: 2,
        }];
        assert_eq!(distribution_json(&labelled), r#"{"Full-time":2}"#);
    }

    #[test]
    fn csv_encoding_quotes_when_needed() {
        let mut table = Table::new(&["field", "text"]);
        table
            .rows
            .push(vec!["Q1".to_string(), "a, b".to_string()]);
        let bytes = table.to_csv(Path::new("t.csv")).unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), "field,text\nQ1,\"a, b\"\n");
    }
}
