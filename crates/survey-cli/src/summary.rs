use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use survey_model::ArtifactKind;
use survey_report::common::{format_p, format_stat};
use survey_stats::FactorResult;

use survey_cli::pipeline::RunResult;

const SHORT_DIGEST: usize = 12;

pub fn print_summary(result: &RunResult) {
    let analysis = &result.analysis;
    println!("Dataset: {}", result.sources.join(", "));
    println!(
        "Responses: {} read, {} analysed",
        analysis.rows_read, analysis.rows_analyzed
    );
    println!(
        "Outcome: {} (n = {}, mean {})",
        analysis.outcome.field,
        analysis.outcome.n,
        dash_if_empty(format_stat(analysis.outcome.mean))
    );
    println!("Output: {}", result.output.output_dir.display());

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Field"),
        header_cell("Factor"),
        header_cell("Kind"),
        header_cell("n"),
        header_cell(correlation_header(analysis.correlation_method.as_str())),
        header_cell("p"),
        header_cell("V"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 3..7 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for factor in &analysis.factors {
        table.add_row(factor_row(factor));
    }
    println!("{table}");

    if !analysis.excluded_free_text.is_empty() {
        println!(
            "Free-text fields left for manual review: {}",
            analysis.excluded_free_text.join(", ")
        );
    }

    print_artifact_table(result);
    if !result.output.removed.is_empty() {
        println!("Removed stale files:");
        for path in &result.output.removed {
            println!("- {path}");
        }
    }
}

fn correlation_header(method: &str) -> &'static str {
    match method {
        "spearman" => "rho",
        _ => "r",
    }
}

fn factor_row(factor: &FactorResult) -> Vec<Cell> {
    let chi = factor.chi_square.as_ref();
    vec![
        Cell::new(&factor.field)
            .fg(Color::Blue)
            .add_attribute(Attribute::Bold),
        Cell::new(&factor.label),
        dim_cell(factor.kind),
        Cell::new(factor.n),
        stat_cell(format_stat(factor.correlation)),
        stat_cell(format_p(chi.map(|c| c.p_value))),
        stat_cell(format_stat(chi.map(|c| c.cramers_v))),
    ]
}

fn print_artifact_table(result: &RunResult) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Artifact"),
        header_cell("Kind"),
        header_cell("SHA-256"),
    ]);
    apply_table_style(&mut table);
    for artifact in &result.output.artifacts {
        let kind = match artifact.kind {
            ArtifactKind::Table => "table",
            ArtifactKind::Figure => "figure",
            ArtifactKind::Report => "report",
        };
        let digest: String = artifact.sha256.chars().take(SHORT_DIGEST).collect();
        table.add_row(vec![
            Cell::new(&artifact.path),
            Cell::new(kind),
            dim_cell(digest),
        ]);
    }
    println!("{table}");
    println!("Manifest: {}", result.output.manifest_path.display());
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(140);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

pub fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn stat_cell(value: String) -> Cell {
    if value.is_empty() {
        dim_cell("-")
    } else {
        Cell::new(value)
    }
}

pub fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

fn dash_if_empty(value: String) -> String {
    if value.is_empty() { "-".to_string() } else { value }
}
