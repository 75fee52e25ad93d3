//! Schema validation, completion filtering and variable decoding.

use tracing::{debug, warn};

use survey_ingest::{RowOrigin, SurveyFrame};
use survey_model::{CompletionFilter, DataSchemaError, FieldRole, ResolvedPlan, Scale};

use crate::error::Result;

/// Fail on the first plan field the dataset does not carry.
///
/// Fields are checked outcome first, then factors in plan order.
pub fn validate_schema(frame: &SurveyFrame, plan: &ResolvedPlan) -> Result<()> {
    for (field, role) in plan.required_fields() {
        if !frame.has_field(field) {
            return Err(DataSchemaError::MissingField {
                field: field.to_string(),
                role,
            }
            .into());
        }
    }
    Ok(())
}

/// Rows retained for analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowSelection {
    /// Zero-based frame row indices, ascending.
    pub rows: Vec<usize>,
    /// Whether the completion filter was applied.
    pub filtered: bool,
}

/// Select completed responses.
///
/// With no filter, or when the dataset lacks the filter column, every row is
/// kept.
pub fn select_rows(
    frame: &SurveyFrame,
    filter: Option<&CompletionFilter>,
) -> Result<RowSelection> {
    let all = || (0..frame.height()).collect::<Vec<_>>();
    let Some(filter) = filter else {
        return Ok(RowSelection {
            rows: all(),
            filtered: false,
        });
    };
    if !frame.has_field(&filter.field) {
        warn!(
            field = %filter.field,
            "completion field not found; analysing all responses"
        );
        return Ok(RowSelection {
            rows: all(),
            filtered: false,
        });
    }
    let values = frame.values(&filter.field)?;
    let rows: Vec<usize> = values
        .iter()
        .enumerate()
        .filter(|(_, value)| filter.accepts(value))
        .map(|(idx, _)| idx)
        .collect();
    debug!(
        field = %filter.field,
        kept = rows.len(),
        dropped = values.len() - rows.len(),
        "completion filter applied"
    );
    Ok(RowSelection {
        rows,
        filtered: true,
    })
}

/// Decode the selected rows of a scaled column.
///
/// Empty cells decode to `None`. Any other value off the scale fails with
/// the export file and the row within that file it was found on.
pub fn decode_scaled(
    frame: &SurveyFrame,
    rows: &[usize],
    field: &str,
    role: FieldRole,
    scale: &Scale,
) -> Result<Vec<Option<i64>>> {
    let values = frame.values(field)?;
    let mut decoded = Vec::with_capacity(rows.len());
    for &idx in rows {
        let raw = values.get(idx).map(String::as_str).unwrap_or_default();
        if raw.is_empty() {
            decoded.push(None);
            continue;
        }
        let Some(code) = scale.decode(raw) else {
            let origin = frame.row_origin(idx).unwrap_or_else(|| RowOrigin {
                source: "dataset".to_string(),
                row: idx + 1,
            });
            return Err(DataSchemaError::InvalidValue {
                field: field.to_string(),
                role,
                scale: scale.name.clone(),
                file: origin.source,
                row: origin.row,
                value: raw.to_string(),
            }
            .into());
        };
        decoded.push(Some(code));
    }
    Ok(decoded)
}

/// Map the selected rows of a categorical column onto level indices.
///
/// Matching ignores ASCII case. Values outside `levels` are treated as
/// missing.
pub fn decode_categorical(values: &[String], rows: &[usize], levels: &[String]) -> Vec<Option<usize>> {
    rows.iter()
        .map(|&idx| {
            let raw = values.get(idx).map(String::as_str).unwrap_or_default();
            if raw.is_empty() {
                return None;
            }
            levels.iter().position(|level| level.eq_ignore_ascii_case(raw))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use survey_ingest::SurveyTable;
    use survey_model::builtin_scale;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn frame(field: &str, tables: Vec<(&str, Vec<usize>, &[&str])>) -> SurveyFrame {
        let tables = tables
            .into_iter()
            .map(|(name, row_numbers, values)| {
                let mut table = SurveyTable::new(
                    vec![field.to_string()],
                    values.iter().map(|v| vec![v.to_string()]).collect(),
                );
                table.row_numbers = row_numbers;
                (PathBuf::from(name), table)
            })
            .collect();
        SurveyFrame::from_tables(tables).unwrap()
    }

    #[test]
    fn decodes_labels_codes_and_blanks() {
        let scale = builtin_scale("yes_no").unwrap();
        let frame = frame("Q53", vec![("s.csv", vec![2, 3, 4, 5], &["Yes", "", "0", "no"])]);
        let decoded = decode_scaled(&frame, &[0, 1, 2, 3], "Q53", FieldRole::Factor, &scale)
            .unwrap();
        assert_eq!(decoded, vec![Some(1), None, Some(0), Some(0)]);
    }

    #[test]
    fn invalid_value_reports_file_and_file_row() {
        let scale = builtin_scale("likelihood5").unwrap();
        let frame = frame(
            "Q29",
            vec![
                ("wave1.csv", vec![2, 3], &["1", "2"]),
                ("wave2.csv", vec![4, 9], &["3", "Maybe"]),
            ],
        );
        let err = decode_scaled(&frame, &[0, 2, 3], "Q29", FieldRole::Outcome, &scale).unwrap_err();
        assert_eq!(
            err.as_schema(),
            Some(&DataSchemaError::InvalidValue {
                field: "Q29".to_string(),
                role: FieldRole::Outcome,
                scale: "likelihood5".to_string(),
                file: "wave2.csv".to_string(),
                row: 9,
                value: "Maybe".to_string(),
            })
        );
        assert!(err.to_string().contains("wave2.csv row 9"));
    }

    #[test]
    fn categorical_ignores_unknown_values() {
        let levels = strings(&["Full-time", "Part-time"]);
        let values = strings(&["full-time", "Retired", "", "Part-time"]);
        assert_eq!(
            decode_categorical(&values, &[0, 1, 2, 3], &levels),
            vec![Some(0), None, None, Some(1)]
        );
    }
}
