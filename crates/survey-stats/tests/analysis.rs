//! Analysis over in-memory survey frames.

use std::path::PathBuf;

use survey_ingest::{SurveyFrame, SurveyTable};
use survey_model::{
    AnalysisPlan, CompletionFilter, DataSchemaError, FactorKind, FactorSpec, FieldRole,
    OutcomeSpec, ResolvedPlan, ScaleRef,
};
use survey_stats::{AnalysisError, FieldType, analyze, build_dictionary};

fn frame(headers: &[&str], rows: Vec<Vec<String>>) -> SurveyFrame {
    let table = SurveyTable::new(headers.iter().map(|h| h.to_string()).collect(), rows);
    SurveyFrame::from_tables(vec![(PathBuf::from("survey.csv"), table)]).expect("frame")
}

fn rows(data: &[&[&str]]) -> Vec<Vec<String>> {
    data.iter()
        .map(|row| row.iter().map(|v| v.to_string()).collect())
        .collect()
}

fn factor(field: &str, kind: FactorKind) -> FactorSpec {
    FactorSpec {
        field: field.to_string(),
        label: String::new(),
        kind,
    }
}

fn named(scale: &str) -> ScaleRef {
    ScaleRef::Named(scale.to_string())
}

fn plan(factors: Vec<FactorSpec>, completion: Option<CompletionFilter>) -> ResolvedPlan {
    AnalysisPlan {
        outcome: OutcomeSpec {
            field: "Q29".to_string(),
            label: "Likelihood of pursuing CPA licensure".to_string(),
            scale: named("likelihood5"),
        },
        factors,
        correlation: Default::default(),
        completion,
        top_n: 5,
    }
    .resolve()
    .expect("valid plan")
}

fn binary_plan() -> ResolvedPlan {
    plan(
        vec![factor(
            "Q53",
            FactorKind::Binary {
                scale: named("yes_no"),
            },
        )],
        None,
    )
}

#[test]
fn hundred_rows_give_five_by_two_crosstab() {
    let data: Vec<Vec<String>> = (0..100)
        .map(|i| vec![((i % 5) + 1).to_string(), (i % 2).to_string()])
        .collect();
    let frame = frame(&["Q29", "Q53"], data);
    let analysis = analyze(&frame, &binary_plan()).expect("analysis");

    let result = &analysis.factors[0];
    assert_eq!(result.crosstab.counts.len(), 5);
    assert!(result.crosstab.counts.iter().all(|row| row.len() == 2));
    assert_eq!(result.crosstab.total(), 100);
    assert_eq!(result.crosstab.col_labels, vec!["No", "Yes"]);
    assert_eq!(result.n, 100);
    assert_eq!(analysis.outcome.n, 100);
    assert!(analysis.outcome.levels.iter().all(|level| level.count == 20));
    assert_eq!(analysis.rows_read, 100);
    assert_eq!(analysis.rows_analyzed, 100);
}

#[test]
fn missing_factor_field_is_named() {
    let frame = frame(&["Q29"], rows(&[&["5"]]));
    let err = analyze(&frame, &binary_plan()).unwrap_err();
    assert_eq!(
        err.as_schema(),
        Some(&DataSchemaError::MissingField {
            field: "Q53".to_string(),
            role: FieldRole::Factor,
        })
    );
}

#[test]
fn missing_outcome_is_reported_first() {
    let frame = frame(&["Q1"], rows(&[&["x"]]));
    let err = analyze(&frame, &binary_plan()).unwrap_err();
    assert!(matches!(
        err,
        AnalysisError::Schema(DataSchemaError::MissingField {
            role: FieldRole::Outcome,
            ..
        })
    ));
    assert!(err.to_string().contains("'Q29'"));
}

#[test]
fn off_scale_value_fails_with_file_row() {
    let frame = frame(
        &["Q29", "Q53"],
        rows(&[&["Very likely", "Yes"], &["2", "Perhaps"]]),
    );
    let err = analyze(&frame, &binary_plan()).unwrap_err();
    assert_eq!(
        err.as_schema(),
        Some(&DataSchemaError::InvalidValue {
            field: "Q53".to_string(),
            role: FieldRole::Factor,
            scale: "yes_no".to_string(),
            file: "survey.csv".to_string(),
            row: 3,
            value: "Perhaps".to_string(),
        })
    );
    assert!(err.to_string().contains("survey.csv row 3"));
}

#[test]
fn off_scale_value_in_second_file_names_that_file() {
    let first = SurveyTable::new(
        vec!["Q29".to_string(), "Q53".to_string()],
        rows(&[&["Very likely", "Yes"], &["2", "No"]]),
    );
    let mut second = SurveyTable::new(
        vec!["Q29".to_string(), "Q53".to_string()],
        rows(&[&["4", "Yes"], &["Somewhat", "No"]]),
    );
    // Qualtrics header rows and a blank line precede these responses.
    second.row_numbers = vec![4, 6];
    let frame = SurveyFrame::from_tables(vec![
        (PathBuf::from("data/wave1.csv"), first),
        (PathBuf::from("data/wave2.csv"), second),
    ])
    .expect("frame");

    let err = analyze(&frame, &binary_plan()).unwrap_err();
    assert_eq!(
        err.as_schema(),
        Some(&DataSchemaError::InvalidValue {
            field: "Q29".to_string(),
            role: FieldRole::Outcome,
            scale: "likelihood5".to_string(),
            file: "wave2.csv".to_string(),
            row: 6,
            value: "Somewhat".to_string(),
        })
    );
}

#[test]
fn completion_filter_drops_unfinished_rows() {
    let completion = Some(CompletionFilter {
        field: "Finished".to_string(),
        accepted: vec!["1".to_string(), "true".to_string()],
    });
    let plan = plan(
        vec![factor(
            "Q53",
            FactorKind::Binary {
                scale: named("yes_no"),
            },
        )],
        completion,
    );
    let frame = frame(
        &["Finished", "Q29", "Q53"],
        rows(&[
            &["1", "5", "Yes"],
            &["0", "Not a scale value", "Yes"],
            &["TRUE", "1", "No"],
        ]),
    );
    let analysis = analyze(&frame, &plan).expect("unfinished rows are never decoded");
    assert!(analysis.completion_filtered);
    assert_eq!(analysis.rows_read, 3);
    assert_eq!(analysis.rows_analyzed, 2);
    assert_eq!(analysis.selected_rows, vec![0, 2]);
}

#[test]
fn absent_completion_field_keeps_every_row() {
    let completion = Some(CompletionFilter {
        field: "Finished".to_string(),
        accepted: vec!["1".to_string()],
    });
    let plan = plan(
        vec![factor(
            "Q53",
            FactorKind::Binary {
                scale: named("yes_no"),
            },
        )],
        completion,
    );
    let frame = frame(&["Q29", "Q53"], rows(&[&["5", "Yes"], &["1", "No"]]));
    let analysis = analyze(&frame, &plan).expect("analysis");
    assert!(!analysis.completion_filtered);
    assert_eq!(analysis.rows_analyzed, 2);
}

fn mixed_plan() -> ResolvedPlan {
    plan(
        vec![
            factor(
                "Q16",
                FactorKind::Categorical {
                    levels: vec!["Full-time".to_string(), "Part-time".to_string()],
                },
            ),
            factor(
                "Q53",
                FactorKind::Binary {
                    scale: named("yes_no"),
                },
            ),
            factor(
                "Q39_1",
                FactorKind::Ordinal {
                    scale: named("likelihood5"),
                },
            ),
            factor("Q32", FactorKind::FreeText),
        ],
        None,
    )
}

fn mixed_frame() -> SurveyFrame {
    let outcome = ["1", "2", "3", "4", "5", "1", "2", "3", "4", "5"];
    let binary = ["0", "0", "1", "1", "1", "0", "0", "1", "1", "1"];
    let status = [
        "Full-time", "Part-time", "Full-time", "Retired", "Part-time", "Full-time", "",
        "Part-time", "full-time", "Part-time",
    ];
    let data = (0..10)
        .map(|i| {
            vec![
                outcome[i].to_string(),
                binary[i].to_string(),
                outcome[i].to_string(),
                status[i].to_string(),
                format!("comment {i}"),
            ]
        })
        .collect();
    frame(&["Q29", "Q53", "Q39_1", "Q16", "Q32"], data)
}

#[test]
fn factors_sorted_by_strength_with_undefined_last() {
    let analysis = analyze(&mixed_frame(), &mixed_plan()).expect("analysis");
    let order: Vec<&str> = analysis.factors.iter().map(|f| f.field.as_str()).collect();
    assert_eq!(order, vec!["Q39_1", "Q53", "Q16"]);

    let identical = &analysis.factors[0];
    assert!((identical.correlation.unwrap() - 1.0).abs() < 1e-12);
    let binary = &analysis.factors[1];
    assert!((binary.correlation.unwrap() - 6.0 / 48f64.sqrt()).abs() < 1e-12);
    assert_eq!(binary.top_box_pct, Some(60.0));

    let categorical = &analysis.factors[2];
    assert_eq!(categorical.kind, "categorical");
    assert_eq!(categorical.correlation, None);
    assert_eq!(categorical.mean, None);
    // "Retired" and the blank answer are ignored
    assert_eq!(categorical.n, 8);
    let counts: Vec<usize> = categorical.distribution.iter().map(|l| l.count).collect();
    assert_eq!(counts, vec![4, 4]);
}

#[test]
fn free_text_is_excluded_from_results() {
    let analysis = analyze(&mixed_frame(), &mixed_plan()).expect("analysis");
    assert_eq!(analysis.excluded_free_text, vec!["Q32"]);
    assert!(analysis.factors.iter().all(|f| f.field != "Q32"));
    assert_eq!(analysis.top_factors().count(), 2);
}

#[test]
fn group_statistics_per_factor_level() {
    let analysis = analyze(&mixed_frame(), &mixed_plan()).expect("analysis");
    let binary = analysis
        .factors
        .iter()
        .find(|f| f.field == "Q53")
        .expect("binary factor");
    let no = &binary.groups[0];
    assert_eq!((no.code, no.label.as_str(), no.n), (Some(0), "No", 4));
    assert_eq!(no.mean, Some(1.5));
    let yes = &binary.groups[1];
    assert_eq!(yes.n, 6);
    assert_eq!(yes.mean, Some(4.0));
    assert_eq!(yes.median, Some(4.0));
}

#[test]
fn dictionary_describes_every_column() {
    let frame = mixed_frame();
    let plan = mixed_plan();
    let rows: Vec<usize> = (0..frame.height()).collect();
    let dictionary = build_dictionary(&frame, &plan, &rows).expect("dictionary");

    let fields: Vec<&str> = dictionary.iter().map(|e| e.field.as_str()).collect();
    assert_eq!(fields, vec!["Q16", "Q29", "Q32", "Q39_1", "Q53"]);

    let status = &dictionary[0];
    assert_eq!(status.field_type, FieldType::MultiChoice);
    assert_eq!(status.question, "Q16");
    assert_eq!(status.missing_rate, Some(0.1));
    assert_eq!(
        status.values,
        vec!["Full-time", "Part-time", "Retired", "full-time"]
    );

    let comments = &dictionary[2];
    assert_eq!(comments.field_type, FieldType::Text);
    assert!(comments.values.is_empty());
    assert_eq!(comments.missing_rate, None);

    let outcome = &dictionary[1];
    assert_eq!(outcome.field_type, FieldType::MultiChoice);
    assert_eq!(outcome.values, vec!["1", "2", "3", "4", "5"]);
    assert_eq!(outcome.missing_rate, Some(0.0));
}
