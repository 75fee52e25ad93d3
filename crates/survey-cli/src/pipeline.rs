//! Survey analysis pipeline with explicit stages.
//!
//! 1. **Ingest**: locate the dataset and load it into a survey frame
//! 2. **Analyze**: validate the schema and compute every statistic in memory
//! 3. **Output**: write tables, charts, the report and the manifest
//!
//! Nothing touches the output directory before the analysis stage succeeds.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Result;
use chrono::Utc;
use tracing::{info, info_span};

use survey_ingest::{SurveyFrame, resolve_dataset_paths};
use survey_model::{AnalysisPlan, CorrelationMethod, ResolvedPlan, default_plan, load_plan};
use survey_report::{OutputSummary, RunInfo, write_outputs};
use survey_stats::{DictionaryEntry, SurveyAnalysis, analyze, build_dictionary};

pub const TOOL_NAME: &str = "survey-analysis";
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// Command-line adjustments applied on top of a plan.
#[derive(Debug, Clone, Default)]
pub struct PlanOverrides {
    pub method: Option<CorrelationMethod>,
    pub top_n: Option<usize>,
    pub include_incomplete: bool,
}

/// Load the plan file (or the built-in plan) and apply overrides.
pub fn effective_plan(plan_file: Option<&Path>, overrides: &PlanOverrides) -> Result<AnalysisPlan> {
    let mut plan = match plan_file {
        Some(path) => load_plan(path)?,
        None => default_plan(),
    };
    if let Some(method) = overrides.method {
        plan.correlation = method;
    }
    if let Some(top_n) = overrides.top_n {
        plan.top_n = top_n;
    }
    if overrides.include_incomplete {
        plan.completion = None;
    }
    Ok(plan)
}

#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Dataset file or directory; discovered under `base_dir` when absent.
    pub data: Option<PathBuf>,
    pub base_dir: PathBuf,
    pub output_dir: PathBuf,
    pub plan: ResolvedPlan,
}

#[derive(Debug)]
pub struct RunResult {
    pub sources: Vec<String>,
    pub analysis: SurveyAnalysis,
    pub output: OutputSummary,
}

// ============================================================================
// Stage 1: Ingest
// ============================================================================

pub fn ingest(data: Option<&Path>, base_dir: &Path) -> Result<SurveyFrame> {
    let span = info_span!("ingest");
    let _guard = span.enter();
    let start = Instant::now();
    let paths = resolve_dataset_paths(data, base_dir)?;
    let frame = SurveyFrame::load(&paths)?;
    info!(
        files = paths.len(),
        rows = frame.height(),
        duration_ms = start.elapsed().as_millis(),
        "ingest complete"
    );
    Ok(frame)
}

// ============================================================================
// Stage 2: Analyze
// ============================================================================

pub fn analyze_survey(
    frame: &SurveyFrame,
    plan: &ResolvedPlan,
) -> Result<(SurveyAnalysis, Vec<DictionaryEntry>)> {
    let span = info_span!("analyze");
    let _guard = span.enter();
    let start = Instant::now();
    let analysis = analyze(frame, plan)?;
    let dictionary = build_dictionary(frame, plan, &analysis.selected_rows)?;
    info!(
        factors = analysis.factors.len(),
        fields = dictionary.len(),
        duration_ms = start.elapsed().as_millis(),
        "analysis stage complete"
    );
    Ok((analysis, dictionary))
}

// ============================================================================
// Stage 3: Output
// ============================================================================

pub fn output(
    output_dir: &Path,
    analysis: &SurveyAnalysis,
    dictionary: &[DictionaryEntry],
    run: &RunInfo,
) -> Result<OutputSummary> {
    let span = info_span!("output", output_dir = %output_dir.display());
    let _guard = span.enter();
    let start = Instant::now();
    let summary = write_outputs(output_dir, analysis, dictionary, run)?;
    info!(
        artifacts = summary.artifacts.len(),
        removed = summary.removed.len(),
        duration_ms = start.elapsed().as_millis(),
        "output complete"
    );
    Ok(summary)
}

/// Run all stages.
pub fn run(options: &RunOptions) -> Result<RunResult> {
    let run_span = info_span!("run", outcome = %options.plan.outcome.field);
    let _run_guard = run_span.enter();

    let frame = ingest(options.data.as_deref(), &options.base_dir)?;
    let (analysis, dictionary) = analyze_survey(&frame, &options.plan)?;

    let sources = frame.source_names(&options.base_dir);
    let run_info = RunInfo {
        tool: TOOL_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        generated_at: Utc::now(),
        sources: sources.clone(),
    };
    let output = output(&options.output_dir, &analysis, &dictionary, &run_info)?;

    Ok(RunResult {
        sources,
        analysis,
        output,
    })
}
