//! Outcome-versus-factor analysis over a loaded survey.

use std::cmp::Ordering;

use tracing::{debug, info, info_span};

use survey_ingest::SurveyFrame;
use survey_model::{CorrelationMethod, FieldRole, ResolvedFactor, ResolvedKind, ResolvedPlan, Scale};

use crate::correlation::correlate;
use crate::crosstab::{ChiSquareTest, CrossTab};
use crate::descriptive::{mean, median, std_dev, top_box_pct};
use crate::error::Result;
use crate::select::{decode_categorical, decode_scaled, select_rows, validate_schema};

/// Respondent count for one answer option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelCount {
    /// Scale code; `None` for categorical levels.
    pub code: Option<i64>,
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutcomeSummary {
    pub field: String,
    pub label: String,
    pub scale: Scale,
    /// Respondents with a valid outcome answer.
    pub n: usize,
    pub levels: Vec<LevelCount>,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub top_box_pct: Option<f64>,
}

/// Outcome statistics among respondents who chose one factor level.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupStats {
    pub code: Option<i64>,
    pub label: String,
    pub n: usize,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub std_dev: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FactorResult {
    pub field: String,
    pub label: String,
    pub kind: &'static str,
    /// Respondents with both a factor and an outcome answer.
    pub n: usize,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub top_box_pct: Option<f64>,
    pub correlation: Option<f64>,
    /// Factor answer counts among the `n` paired respondents.
    pub distribution: Vec<LevelCount>,
    pub crosstab: CrossTab,
    pub chi_square: Option<ChiSquareTest>,
    pub groups: Vec<GroupStats>,
}

impl FactorResult {
    pub fn abs_correlation(&self) -> Option<f64> {
        self.correlation.map(f64::abs)
    }
}

/// Everything the report writers need.
#[derive(Debug, Clone, PartialEq)]
pub struct SurveyAnalysis {
    pub outcome: OutcomeSummary,
    /// Sorted by absolute correlation, strongest first; factors without a
    /// correlation last; ties by field code.
    pub factors: Vec<FactorResult>,
    /// Free-text fields left out of the quantitative analysis.
    pub excluded_free_text: Vec<String>,
    pub correlation_method: CorrelationMethod,
    pub top_n: usize,
    pub rows_read: usize,
    pub rows_analyzed: usize,
    /// Zero-based frame rows that passed the completion filter.
    pub selected_rows: Vec<usize>,
    pub completion_filtered: bool,
}

impl SurveyAnalysis {
    /// The strongest `top_n` factors with a defined correlation.
    pub fn top_factors(&self) -> impl Iterator<Item = &FactorResult> {
        self.factors
            .iter()
            .filter(|f| f.correlation.is_some())
            .take(self.top_n)
    }
}

/// Validate the dataset against the plan and compute every statistic.
///
/// Nothing is written; a schema failure leaves no trace.
pub fn analyze(frame: &SurveyFrame, plan: &ResolvedPlan) -> Result<SurveyAnalysis> {
    let _span = info_span!("analyze", outcome = %plan.outcome.field).entered();
    validate_schema(frame, plan)?;

    let selection = select_rows(frame, plan.completion.as_ref())?;
    let rows = &selection.rows;

    let outcome_codes = decode_scaled(
        frame,
        rows,
        &plan.outcome.field,
        FieldRole::Outcome,
        &plan.outcome.scale,
    )?;
    let outcome = summarize_outcome(plan, &outcome_codes);
    debug!(n = outcome.n, "outcome decoded");

    let mut factors = Vec::new();
    for factor in plan.quantitative_factors() {
        let result = match &factor.kind {
            ResolvedKind::Ordinal(scale) | ResolvedKind::Binary(scale) => {
                let codes = decode_scaled(frame, rows, &factor.field, FieldRole::Factor, scale)?;
                analyze_scaled(plan, factor, scale, &outcome_codes, &codes)
            }
            ResolvedKind::Categorical(levels) => {
                let values = frame.values(&factor.field)?;
                let indices = decode_categorical(&values, rows, levels);
                analyze_categorical(plan, factor, levels, &outcome_codes, &indices)
            }
            ResolvedKind::FreeText => continue,
        };
        debug!(
            field = %result.field,
            n = result.n,
            correlation = ?result.correlation,
            "factor analysed"
        );
        factors.push(result);
    }
    factors.sort_by(compare_factors);

    let excluded_free_text: Vec<String> = plan.free_text_fields().map(str::to_string).collect();
    info!(
        rows_read = frame.height(),
        rows_analyzed = rows.len(),
        factors = factors.len(),
        free_text = excluded_free_text.len(),
        "analysis complete"
    );

    Ok(SurveyAnalysis {
        outcome,
        factors,
        excluded_free_text,
        correlation_method: plan.correlation,
        top_n: plan.top_n,
        rows_read: frame.height(),
        rows_analyzed: rows.len(),
        completion_filtered: selection.filtered,
        selected_rows: selection.rows,
    })
}

fn compare_factors(a: &FactorResult, b: &FactorResult) -> Ordering {
    match (a.abs_correlation(), b.abs_correlation()) {
        (Some(x), Some(y)) => y.total_cmp(&x).then_with(|| a.field.cmp(&b.field)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.field.cmp(&b.field),
    }
}

fn summarize_outcome(plan: &ResolvedPlan, codes: &[Option<i64>]) -> OutcomeSummary {
    let scale = &plan.outcome.scale;
    let valid: Vec<i64> = codes.iter().flatten().copied().collect();
    let as_f64: Vec<f64> = valid.iter().map(|c| *c as f64).collect();
    let levels = scale
        .levels
        .iter()
        .map(|level| LevelCount {
            code: Some(level.code),
            label: level.label.clone(),
            count: valid.iter().filter(|c| **c == level.code).count(),
        })
        .collect();
    OutcomeSummary {
        field: plan.outcome.field.clone(),
        label: plan.outcome.label.clone(),
        scale: scale.clone(),
        n: valid.len(),
        levels,
        mean: mean(&as_f64),
        median: median(&as_f64),
        top_box_pct: top_box_pct(&as_f64, scale.top_box_min as f64),
    }
}

fn outcome_row(plan: &ResolvedPlan, code: i64) -> Option<usize> {
    plan.outcome.scale.levels.iter().position(|l| l.code == code)
}

fn outcome_labels(plan: &ResolvedPlan) -> Vec<String> {
    plan.outcome
        .scale
        .levels
        .iter()
        .map(|l| l.label.clone())
        .collect()
}

fn group_stats(code: Option<i64>, label: &str, outcomes: &[f64]) -> GroupStats {
    GroupStats {
        code,
        label: label.to_string(),
        n: outcomes.len(),
        mean: mean(outcomes),
        median: median(outcomes),
        std_dev: std_dev(outcomes),
    }
}

fn analyze_scaled(
    plan: &ResolvedPlan,
    factor: &ResolvedFactor,
    scale: &Scale,
    outcome: &[Option<i64>],
    codes: &[Option<i64>],
) -> FactorResult {
    let pairs: Vec<(i64, i64)> = outcome
        .iter()
        .zip(codes)
        .filter_map(|(o, f)| Some(((*o)?, (*f)?)))
        .collect();
    let factor_values: Vec<f64> = pairs.iter().map(|(_, f)| *f as f64).collect();
    let outcome_values: Vec<f64> = pairs.iter().map(|(o, _)| *o as f64).collect();

    let distribution = scale
        .levels
        .iter()
        .map(|level| LevelCount {
            code: Some(level.code),
            label: level.label.clone(),
            count: pairs.iter().filter(|(_, f)| *f == level.code).count(),
        })
        .collect();

    let crosstab = CrossTab::from_pairs(
        outcome_labels(plan),
        scale.levels.iter().map(|l| l.label.clone()).collect(),
        pairs.iter().filter_map(|(o, f)| {
            let col = scale.levels.iter().position(|l| l.code == *f)?;
            Some((outcome_row(plan, *o)?, col))
        }),
    );

    let groups = scale
        .levels
        .iter()
        .map(|level| {
            let within: Vec<f64> = pairs
                .iter()
                .filter(|(_, f)| *f == level.code)
                .map(|(o, _)| *o as f64)
                .collect();
            group_stats(Some(level.code), &level.label, &within)
        })
        .collect();

    FactorResult {
        field: factor.field.clone(),
        label: factor.display_label().to_string(),
        kind: factor.kind.name(),
        n: pairs.len(),
        mean: mean(&factor_values),
        median: median(&factor_values),
        top_box_pct: top_box_pct(&factor_values, scale.top_box_min as f64),
        correlation: correlate(plan.correlation, &factor_values, &outcome_values),
        distribution,
        chi_square: crosstab.chi_square(),
        crosstab,
        groups,
    }
}

fn analyze_categorical(
    plan: &ResolvedPlan,
    factor: &ResolvedFactor,
    levels: &[String],
    outcome: &[Option<i64>],
    indices: &[Option<usize>],
) -> FactorResult {
    let pairs: Vec<(i64, usize)> = outcome
        .iter()
        .zip(indices)
        .filter_map(|(o, f)| Some(((*o)?, (*f)?)))
        .collect();

    let distribution = levels
        .iter()
        .enumerate()
        .map(|(idx, level)| LevelCount {
            code: None,
            label: level.clone(),
            count: pairs.iter().filter(|(_, f)| *f == idx).count(),
        })
        .collect();

    let crosstab = CrossTab::from_pairs(
        outcome_labels(plan),
        levels.to_vec(),
        pairs
            .iter()
            .filter_map(|(o, f)| Some((outcome_row(plan, *o)?, *f))),
    );

    let groups = levels
        .iter()
        .enumerate()
        .map(|(idx, level)| {
            let within: Vec<f64> = pairs
                .iter()
                .filter(|(_, f)| *f == idx)
                .map(|(o, _)| *o as f64)
                .collect();
            group_stats(None, level, &within)
        })
        .collect();

    FactorResult {
        field: factor.field.clone(),
        label: factor.display_label().to_string(),
        kind: factor.kind.name(),
        n: pairs.len(),
        mean: None,
        median: None,
        top_box_pct: None,
        correlation: None,
        distribution,
        chi_square: crosstab.chi_square(),
        crosstab,
        groups,
    }
}
