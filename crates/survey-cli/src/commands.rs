use std::path::PathBuf;

use anyhow::{Result, anyhow};
use comfy_table::{Cell, Table};
use tracing::debug;

use survey_cli::pipeline::{
    DEFAULT_OUTPUT_DIR, PlanOverrides, RunOptions, RunResult, effective_plan, run,
};
use survey_model::{FieldRole, ResolvedKind, ResolvedPlan};

use crate::cli::{PlanArgs, RunArgs};
use crate::summary::{apply_table_style, dim_cell, header_cell};

pub fn run_analysis(args: &RunArgs) -> Result<RunResult> {
    let overrides = PlanOverrides {
        method: args.method.map(Into::into),
        top_n: args.top,
        include_incomplete: args.include_incomplete,
    };
    let plan = effective_plan(args.plan.as_deref(), &overrides)?.resolve()?;
    let base_dir = std::env::current_dir()
        .map_err(|e| anyhow!("failed to read the current directory: {e}"))?;
    let output_dir = args
        .output_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));
    debug!(
        output_dir = %output_dir.display(),
        factors = plan.factors.len(),
        method = plan.correlation.as_str(),
        "plan resolved"
    );
    run(&RunOptions {
        data: args.data.clone(),
        base_dir,
        output_dir,
        plan,
    })
}

pub fn run_plan(args: &PlanArgs) -> Result<()> {
    let plan = effective_plan(args.plan.as_deref(), &PlanOverrides::default())?;
    let resolved = plan.resolve()?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
        return Ok(());
    }
    println!("{}", plan_table(&resolved));
    println!("Correlation: {}", resolved.correlation.as_str());
    match &resolved.completion {
        Some(filter) => println!(
            "Completion filter: {} in [{}]",
            filter.field,
            filter.accepted.join(", ")
        ),
        None => println!("Completion filter: none"),
    }
    println!("Chart top N: {}", resolved.top_n);
    Ok(())
}

fn plan_table(plan: &ResolvedPlan) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Field"),
        header_cell("Role"),
        header_cell("Kind"),
        header_cell("Scale or levels"),
        header_cell("Label"),
    ]);
    apply_table_style(&mut table);
    let outcome = &plan.outcome;
    table.add_row(vec![
        Cell::new(&outcome.field),
        Cell::new(FieldRole::Outcome),
        Cell::new("ordinal"),
        Cell::new(&outcome.scale.name),
        Cell::new(&outcome.label),
    ]);
    for factor in &plan.factors {
        let values = match &factor.kind {
            ResolvedKind::Ordinal(scale) | ResolvedKind::Binary(scale) => {
                Cell::new(&scale.name)
            }
            ResolvedKind::Categorical(levels) => Cell::new(levels.join(", ")),
            ResolvedKind::FreeText => dim_cell("-"),
        };
        table.add_row(vec![
            Cell::new(&factor.field),
            Cell::new(FieldRole::Factor),
            Cell::new(factor.kind.name()),
            values,
            Cell::new(factor.display_label()),
        ]);
    }
    table
}
