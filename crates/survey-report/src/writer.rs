//! Writes every artifact of a run and the manifest that indexes them.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use tracing::{debug, info, info_span};

use survey_model::{ArtifactKind, ArtifactRecord, DatasetSummary, Manifest};
use survey_stats::{DictionaryEntry, SurveyAnalysis};

use crate::charts::bar_chart;
use crate::error::{ReportError, Result};
use crate::layout::{
    CORRELATION_CHART, DATA_DICTIONARY, FACTOR_SUMMARY, FIGURES_DIR, MANIFEST, OUTCOME_DISTRIBUTION,
    REPORT, TABLES_DIR, crosstab_path, group_means_path, outcome_chart_path,
};
use crate::manifest::{read_previous_manifest, remove_stale, sha256_hex, write_manifest};
use crate::markdown::{ReportContext, render_report};
use crate::tables::{self, Table};

/// Run metadata recorded in the manifest.
#[derive(Debug, Clone)]
pub struct RunInfo {
    pub tool: String,
    pub version: String,
    pub generated_at: DateTime<Utc>,
    /// Dataset files, as displayed.
    pub sources: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct OutputSummary {
    pub output_dir: PathBuf,
    pub manifest_path: PathBuf,
    pub artifacts: Vec<ArtifactRecord>,
    /// Files from a previous run that were deleted.
    pub removed: Vec<String>,
}

struct ArtifactSink<'a> {
    root: &'a Path,
    records: Vec<ArtifactRecord>,
}

impl ArtifactSink<'_> {
    fn write(&mut self, relative: &str, kind: ArtifactKind, fields: &[&str], bytes: &[u8]) -> Result<()> {
        let path = self.root.join(relative);
        fs::write(&path, bytes).map_err(|e| ReportError::io("write", &path, e))?;
        debug!(path = relative, bytes = bytes.len(), "artifact written");
        self.push(relative, kind, fields, sha256_hex(bytes));
        Ok(())
    }

    fn write_table(&mut self, relative: &str, fields: &[&str], table: &Table) -> Result<()> {
        let bytes = table.to_csv(&self.root.join(relative))?;
        self.write(relative, ArtifactKind::Table, fields, &bytes)
    }

    fn chart(
        &mut self,
        relative: &str,
        fields: &[&str],
        title: &str,
        values: &[Option<f64>],
        y_max: f64,
    ) -> Result<()> {
        let bytes = bar_chart(&self.root.join(relative), title, values, y_max)?;
        debug!(path = relative, bars = values.len(), title, "chart rendered");
        self.write(relative, ArtifactKind::Figure, fields, &bytes)
    }

    fn push(&mut self, relative: &str, kind: ArtifactKind, fields: &[&str], sha256: String) {
        self.records.push(ArtifactRecord {
            path: relative.to_string(),
            kind,
            fields: fields.iter().map(|f| (*f).to_string()).collect(),
            sha256,
        });
    }
}

fn create_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|e| ReportError::io("create directory", path, e))
}

/// Write tables, charts, the report and the manifest under `output_dir`.
///
/// Same-named files are overwritten. Files recorded by a previous manifest
/// that this run does not produce are removed.
pub fn write_outputs(
    output_dir: &Path,
    analysis: &SurveyAnalysis,
    dictionary: &[DictionaryEntry],
    run: &RunInfo,
) -> Result<OutputSummary> {
    let _span = info_span!("write_outputs", output_dir = %output_dir.display()).entered();
    let previous = read_previous_manifest(output_dir);

    create_dir(output_dir)?;
    create_dir(&output_dir.join(TABLES_DIR))?;
    create_dir(&output_dir.join(FIGURES_DIR))?;

    let outcome_field = analysis.outcome.field.as_str();
    let factor_fields: Vec<&str> = analysis.factors.iter().map(|f| f.field.as_str()).collect();
    let mut sink = ArtifactSink {
        root: output_dir,
        records: Vec::new(),
    };

    let mut summary_fields = vec![outcome_field];
    summary_fields.extend(&factor_fields);
    sink.write_table(FACTOR_SUMMARY, &summary_fields, &tables::factor_summary(analysis))?;
    sink.write_table(
        OUTCOME_DISTRIBUTION,
        &[outcome_field],
        &tables::outcome_distribution(analysis),
    )?;
    let dictionary_fields: Vec<&str> = dictionary.iter().map(|e| e.field.as_str()).collect();
    sink.write_table(DATA_DICTIONARY, &dictionary_fields, &tables::data_dictionary(dictionary))?;

    for factor in &analysis.factors {
        let fields = [outcome_field, factor.field.as_str()];
        sink.write_table(&crosstab_path(&factor.field), &fields, &tables::crosstab(analysis, factor))?;
        sink.write_table(&group_means_path(&factor.field), &fields, &tables::group_means(factor))?;
    }

    let top: Vec<_> = analysis.top_factors().collect();
    let top_fields: Vec<&str> = top.iter().map(|f| f.field.as_str()).collect();
    let top_values: Vec<Option<f64>> = top.iter().map(|f| f.abs_correlation()).collect();
    let title = format!(
        "Absolute correlation with {outcome_field}: {}",
        top_fields.join(", ")
    );
    sink.chart(CORRELATION_CHART, &top_fields, &title, &top_values, 1.0)?;

    let outcome_max = analysis
        .outcome
        .scale
        .codes()
        .max()
        .map_or(1.0, |code| code as f64);
    for factor in &analysis.factors {
        let means: Vec<Option<f64>> = factor.groups.iter().map(|g| g.mean).collect();
        let levels: Vec<&str> = factor.groups.iter().map(|g| g.label.as_str()).collect();
        let title = format!(
            "Mean {outcome_field} by {} level: {}",
            factor.field,
            levels.join(", ")
        );
        sink.chart(
            &outcome_chart_path(&factor.field),
            &[outcome_field, factor.field.as_str()],
            &title,
            &means,
            outcome_max,
        )?;
    }

    let context = ReportContext {
        sources: run.sources.clone(),
        artifacts: sink.records.iter().map(|r| r.path.clone()).collect(),
    };
    let report = render_report(analysis, &context);
    let mut report_fields = vec![outcome_field];
    report_fields.extend(&factor_fields);
    sink.write(REPORT, ArtifactKind::Report, &report_fields, report.as_bytes())?;

    let produced: BTreeSet<String> = sink.records.iter().map(|r| r.path.clone()).collect();
    let removed = match &previous {
        Some(previous) => remove_stale(output_dir, previous, &produced)?,
        None => Vec::new(),
    };

    let manifest = Manifest {
        tool: run.tool.clone(),
        version: run.version.clone(),
        generated_at: run.generated_at.to_rfc3339_opts(SecondsFormat::Secs, true),
        correlation: analysis.correlation_method.as_str().to_string(),
        dataset: DatasetSummary {
            sources: run.sources.clone(),
            rows_read: analysis.rows_read,
            rows_analyzed: analysis.rows_analyzed,
        },
        artifacts: sink.records,
    };
    write_manifest(output_dir, &manifest)?;

    info!(
        artifacts = manifest.artifacts.len(),
        removed = removed.len(),
        "outputs written"
    );
    Ok(OutputSummary {
        output_dir: output_dir.to_path_buf(),
        manifest_path: output_dir.join(MANIFEST),
        artifacts: manifest.artifacts,
        removed,
    })
}
