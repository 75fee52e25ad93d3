//! Data dictionary: one descriptive row per dataset column.

use std::collections::BTreeSet;

use survey_ingest::SurveyFrame;
use survey_model::scale::YES_NO;
use survey_model::{BUILTIN_SCALES, ResolvedKind, ResolvedPlan, Scale, builtin_scale};

use crate::error::Result;

/// Values listed per field.
pub const MAX_LISTED_VALUES: usize = 12;

/// Answers longer than this mark a field as free text.
const TEXT_LENGTH_THRESHOLD: usize = 120;

const TEXT_PROMPTS: &[&str] = &["Please explain", "Please briefly", "Please share"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Likert,
    MultiChoice,
    Text,
    Other,
}

impl FieldType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Likert => "Likert",
            Self::MultiChoice => "multi-choice",
            Self::Text => "text",
            Self::Other => "other",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DictionaryEntry {
    pub field: String,
    /// Question text, or the field code when the export has none.
    pub question: String,
    pub field_type: FieldType,
    /// First distinct non-empty values in row order; empty for text fields.
    pub values: Vec<String>,
    /// Share of empty answers; `None` for text fields or when no rows were
    /// analysed.
    pub missing_rate: Option<f64>,
}

/// Describe every column over the analysed rows, sorted by field code.
///
/// Fields the plan marks as free text are always typed as text.
pub fn build_dictionary(
    frame: &SurveyFrame,
    plan: &ResolvedPlan,
    rows: &[usize],
) -> Result<Vec<DictionaryEntry>> {
    let scales = likert_scales(plan);
    let free_text: BTreeSet<&str> = plan.free_text_fields().collect();
    let mut fields = frame.field_names();
    fields.sort();

    let mut entries = Vec::with_capacity(fields.len());
    for field in fields {
        let all = frame.values(&field)?;
        let values: Vec<&str> = rows
            .iter()
            .filter_map(|idx| all.get(*idx))
            .map(String::as_str)
            .collect();
        let question = frame
            .question_text(&field)
            .unwrap_or(field.as_str())
            .to_string();
        let field_type = if free_text.contains(field.as_str()) {
            FieldType::Text
        } else {
            classify_field(&field, &question, &values, &scales)
        };

        let (listed, missing_rate) = if field_type == FieldType::Text {
            (Vec::new(), None)
        } else {
            let missing = values.iter().filter(|v| v.is_empty()).count();
            let rate = (!values.is_empty()).then(|| missing as f64 / values.len() as f64);
            (distinct_values(&values), rate)
        };

        entries.push(DictionaryEntry {
            field,
            question,
            field_type,
            values: listed,
            missing_rate,
        });
    }
    Ok(entries)
}

/// Multi-level answer scales known to the analysis.
fn likert_scales(plan: &ResolvedPlan) -> Vec<Scale> {
    let mut scales: Vec<Scale> = BUILTIN_SCALES
        .iter()
        .copied()
        .filter(|name| *name != YES_NO)
        .filter_map(builtin_scale)
        .collect();
    scales.push(plan.outcome.scale.clone());
    for factor in &plan.factors {
        if let ResolvedKind::Ordinal(scale) = &factor.kind {
            scales.push(scale.clone());
        }
    }
    scales
}

fn distinct_values(values: &[&str]) -> Vec<String> {
    let mut seen = BTreeSet::new();
    let mut listed = Vec::new();
    for value in values {
        if value.is_empty() || !seen.insert(*value) {
            continue;
        }
        listed.push((*value).to_string());
        if listed.len() == MAX_LISTED_VALUES {
            break;
        }
    }
    listed
}

/// Infer a field's type from its name, question text and answers.
pub fn classify_field(name: &str, question: &str, values: &[&str], scales: &[Scale]) -> FieldType {
    let answered: BTreeSet<&str> = values.iter().copied().filter(|v| !v.is_empty()).collect();
    if answered.is_empty() {
        return FieldType::Other;
    }
    let longest = answered.iter().map(|v| v.chars().count()).max().unwrap_or(0);
    if name.ends_with("_TEXT")
        || TEXT_PROMPTS.iter().any(|prompt| question.contains(prompt))
        || longest > TEXT_LENGTH_THRESHOLD
    {
        return FieldType::Text;
    }
    if answered
        .iter()
        .all(|value| scales.iter().any(|scale| scale.has_label(value)))
    {
        return FieldType::Likert;
    }
    let yes_no = answered.iter().all(|v| *v == "Yes" || *v == "No");
    if yes_no || answered.len() <= 10 {
        return FieldType::MultiChoice;
    }
    FieldType::Other
}

#[cfg(test)]
mod tests {
    use super::*;
    use survey_model::scale::LIKELIHOOD5;

    fn likelihood() -> Vec<Scale> {
        vec![builtin_scale(LIKELIHOOD5).unwrap()]
    }

    #[test]
    fn classifies_text_fields() {
        let scales = likelihood();
        assert_eq!(
            classify_field("Q9_TEXT", "", &["short"], &scales),
            FieldType::Text
        );
        assert_eq!(
            classify_field("Q32", "Please explain your answer", &["a"], &scales),
            FieldType::Text
        );
        let long = "x".repeat(121);
        assert_eq!(
            classify_field("Q1", "", &[long.as_str()], &scales),
            FieldType::Text
        );
    }

    #[test]
    fn classifies_scaled_and_choice_fields() {
        let scales = likelihood();
        assert_eq!(
            classify_field("Q29", "", &["Very likely", "", "Somewhat unlikely"], &scales),
            FieldType::Likert
        );
        assert_eq!(
            classify_field("Q53", "", &["Yes", "No"], &scales),
            FieldType::MultiChoice
        );
        let many: Vec<String> = (0..11).map(|i| format!("option {i}")).collect();
        let many: Vec<&str> = many.iter().map(String::as_str).collect();
        assert_eq!(classify_field("Q2", "", &many, &scales), FieldType::Other);
        assert_eq!(classify_field("Q3", "", &["", ""], &scales), FieldType::Other);
    }

    #[test]
    fn lists_at_most_twelve_distinct_values() {
        let values: Vec<String> = (0..20).map(|i| (i % 15).to_string()).collect();
        let values: Vec<&str> = values.iter().map(String::as_str).collect();
        let listed = distinct_values(&values);
        assert_eq!(listed.len(), MAX_LISTED_VALUES);
        assert_eq!(listed[0], "0");
        assert_eq!(listed[11], "11");
    }
}
