//! The Markdown report.

use std::fmt::Write;

use survey_stats::{FactorResult, SurveyAnalysis};

use crate::common::{format_p, format_pct, format_stat, percent};
use crate::layout::{CORRELATION_CHART, outcome_chart_path};
use crate::tables;

/// Everything the report shows besides the analysis itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportContext {
    /// Dataset files, as displayed.
    pub sources: Vec<String>,
    /// Output-relative paths of the tables and figures, in write order.
    pub artifacts: Vec<String>,
}

fn escape_cell(value: &str) -> String {
    value.replace('|', "\\|").replace('\n', " ")
}

fn push_table(out: &mut String, headers: &[&str], rows: &[Vec<String>]) {
    let headers: Vec<String> = headers.iter().map(|header| escape_cell(header)).collect();
    let _ = writeln!(out, "| {} |", headers.join(" | "));
    let separators: Vec<&str> = headers.iter().map(|_| "---").collect();
    let _ = writeln!(out, "| {} |", separators.join(" | "));
    for row in rows {
        let cells: Vec<String> = row.iter().map(|cell| escape_cell(cell)).collect();
        let _ = writeln!(out, "| {} |", cells.join(" | "));
    }
    out.push('\n');
}

/// Render the report. The output depends only on its inputs.
pub fn render_report(analysis: &SurveyAnalysis, context: &ReportContext) -> String {
    let mut out = String::new();
    let outcome = &analysis.outcome;

    out.push_str("# Survey analysis report\n\n");

    out.push_str("## Dataset\n\n");
    let _ = writeln!(out, "- Sources: {}", context.sources.join(", "));
    let _ = writeln!(out, "- Responses read: {}", analysis.rows_read);
    let scope = if analysis.completion_filtered {
        "completed responses"
    } else {
        "all responses"
    };
    let _ = writeln!(out, "- Responses analysed: {} ({scope})", analysis.rows_analyzed);
    let _ = writeln!(
        out,
        "- Correlation method: {}",
        analysis.correlation_method.as_str()
    );
    out.push('\n');

    let _ = writeln!(out, "## Outcome: {}\n", heading(&outcome.field, &outcome.label));
    let rows: Vec<Vec<String>> = outcome
        .levels
        .iter()
        .map(|level| {
            vec![
                level.code.map(|c| c.to_string()).unwrap_or_default(),
                level.label.clone(),
                level.count.to_string(),
                format_pct(percent(level.count, outcome.n)),
            ]
        })
        .collect();
    push_table(&mut out, &["Code", "Level", "Count", "%"], &rows);
    let _ = writeln!(
        out,
        "Valid answers: {}. Mean {}, median {}, top box {}%.\n",
        outcome.n,
        or_dash(format_stat(outcome.mean)),
        or_dash(format_stat(outcome.median)),
        or_dash(format_pct(outcome.top_box_pct)),
    );

    out.push_str("## Factors\n\n");
    if analysis.factors.is_empty() {
        out.push_str("No quantitative factors were analysed.\n\n");
    } else {
        let rows: Vec<Vec<String>> = analysis.factors.iter().map(summary_row).collect();
        push_table(
            &mut out,
            &[
                "Field",
                "Factor",
                "Kind",
                "n",
                "Mean",
                "Top box %",
                "r",
                "Chi-square",
                "p",
                "Cramér's V",
            ],
            &rows,
        );
    }

    out.push_str("## Strongest associations\n\n");
    let top: Vec<&FactorResult> = analysis.top_factors().collect();
    if top.is_empty() {
        out.push_str("No factor had a defined correlation with the outcome.\n\n");
    } else {
        for (rank, factor) in top.iter().enumerate() {
            let _ = writeln!(
                out,
                "{}. {}: r = {}",
                rank + 1,
                heading(&factor.field, &factor.label),
                format_stat(factor.correlation)
            );
        }
        out.push('\n');
    }
    let _ = writeln!(
        out,
        "![Absolute correlation of the strongest factors]({CORRELATION_CHART})\n"
    );

    out.push_str("## Factor detail\n\n");
    for factor in &analysis.factors {
        push_factor_detail(&mut out, analysis, factor);
    }

    out.push_str("## Free-text fields\n\n");
    if analysis.excluded_free_text.is_empty() {
        out.push_str("None.\n\n");
    } else {
        let _ = writeln!(
            out,
            "Left for manual review and not summarised: {}.\n",
            analysis.excluded_free_text.join(", ")
        );
    }

    out.push_str("## Artifacts\n\n");
    for path in &context.artifacts {
        let _ = writeln!(out, "- [{path}]({path})");
    }
    out
}

fn heading(field: &str, label: &str) -> String {
    if label.is_empty() || label == field {
        field.to_string()
    } else {
        format!("{field} ({label})")
    }
}

fn or_dash(value: String) -> String {
    if value.is_empty() { "-".to_string() } else { value }
}

fn summary_row(factor: &FactorResult) -> Vec<String> {
    let chi = factor.chi_square.as_ref();
    vec![
        factor.field.clone(),
        factor.label.clone(),
        factor.kind.to_string(),
        factor.n.to_string(),
        or_dash(format_stat(factor.mean)),
        or_dash(format_pct(factor.top_box_pct)),
        or_dash(format_stat(factor.correlation)),
        or_dash(format_stat(chi.map(|c| c.statistic))),
        or_dash(format_p(chi.map(|c| c.p_value))),
        or_dash(format_stat(chi.map(|c| c.cramers_v))),
    ]
}

fn push_factor_detail(out: &mut String, analysis: &SurveyAnalysis, factor: &FactorResult) {
    let _ = writeln!(out, "### {}\n", heading(&factor.field, &factor.label));
    if let Some(chi) = &factor.chi_square {
        let _ = writeln!(
            out,
            "Chi-square {} on {} df, p = {}, Cramér's V = {}.\n",
            format_stat(Some(chi.statistic)),
            chi.dof,
            format_p(Some(chi.p_value)),
            format_stat(Some(chi.cramers_v)),
        );
    }

    let crosstab = tables::crosstab(analysis, factor);
    let headers: Vec<&str> = crosstab.headers.iter().map(String::as_str).collect();
    push_table(out, &headers, &crosstab.rows);

    let rows: Vec<Vec<String>> = factor
        .groups
        .iter()
        .map(|group| {
            vec![
                group.label.clone(),
                group.n.to_string(),
                or_dash(format_stat(group.mean)),
                or_dash(format_stat(group.median)),
                or_dash(format_stat(group.std_dev)),
            ]
        })
        .collect();
    push_table(out, &["Level", "n", "Outcome mean", "Median", "SD"], &rows);
    let _ = writeln!(
        out,
        "![Mean outcome by level]({})\n",
        outcome_chart_path(&factor.field)
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_headers_and_cells_are_escaped() {
        let mut out = String::new();
        push_table(
            &mut out,
            &["Q29 \\ Full|Part", "Level"],
            &[vec!["A|B".to_string(), "two\nlines".to_string()]],
        );
        assert_eq!(
            out,
            "| Q29 \\ Full\\|Part | Level |\n| --- | --- |\n| A\\|B | two lines |\n\n"
        );
    }
}
