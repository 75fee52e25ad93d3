//! Answer scales for coded survey questions.
//!
//! A scale maps the answer labels shown to respondents onto ordered integer
//! codes. Exports carry either the label text or the code, so decoding
//! accepts both.

use serde::{Deserialize, Serialize};

use crate::error::PlanError;

/// One answer option of a scale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScaleLevel {
    pub code: i64,
    pub label: String,
}

impl ScaleLevel {
    pub fn new(code: i64, label: impl Into<String>) -> Self {
        Self {
            code,
            label: label.into(),
        }
    }
}

/// An ordered answer scale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scale {
    pub name: String,
    /// Levels in ascending code order.
    pub levels: Vec<ScaleLevel>,
    /// Lowest code counted as a "top box" answer.
    pub top_box_min: i64,
}

impl Scale {
    pub fn new(name: impl Into<String>, levels: Vec<ScaleLevel>, top_box_min: i64) -> Self {
        let mut levels = levels;
        levels.sort_by_key(|level| level.code);
        Self {
            name: name.into(),
            levels,
            top_box_min,
        }
    }

    fn from_labels(name: &str, first_code: i64, labels: &[&str], top_box_min: i64) -> Self {
        let levels = labels
            .iter()
            .zip(first_code..)
            .map(|(label, code)| ScaleLevel::new(code, *label))
            .collect();
        Self::new(name, levels, top_box_min)
    }

    /// Decode a raw cell into a scale code.
    ///
    /// Returns `None` for values that are neither a level label nor a level
    /// code. Callers treat empty cells as missing before calling this.
    pub fn decode(&self, raw: &str) -> Option<i64> {
        let value = raw.trim();
        if value.is_empty() {
            return None;
        }
        if let Some(level) = self
            .levels
            .iter()
            .find(|level| level.label.eq_ignore_ascii_case(value))
        {
            return Some(level.code);
        }
        let code = parse_code(value)?;
        self.levels
            .iter()
            .any(|level| level.code == code)
            .then_some(code)
    }

    pub fn label_for(&self, code: i64) -> Option<&str> {
        self.levels
            .iter()
            .find(|level| level.code == code)
            .map(|level| level.label.as_str())
    }

    pub fn codes(&self) -> impl Iterator<Item = i64> + '_ {
        self.levels.iter().map(|level| level.code)
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// True when `value` matches one of this scale's labels.
    pub fn has_label(&self, value: &str) -> bool {
        self.levels
            .iter()
            .any(|level| level.label.eq_ignore_ascii_case(value.trim()))
    }

    pub(crate) fn validate(&self) -> Result<(), PlanError> {
        if self.levels.is_empty() {
            return Err(PlanError::EmptyScale {
                scale: self.name.clone(),
            });
        }
        for (idx, level) in self.levels.iter().enumerate() {
            for other in &self.levels[idx + 1..] {
                if other.code == level.code {
                    return Err(PlanError::DuplicateLevel {
                        scale: self.name.clone(),
                        what: "code",
                        value: level.code.to_string(),
                    });
                }
                if other.label.eq_ignore_ascii_case(&level.label) {
                    return Err(PlanError::DuplicateLevel {
                        scale: self.name.clone(),
                        what: "label",
                        value: level.label.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Accepts integer codes, including spreadsheet-style `4.0`.
fn parse_code(value: &str) -> Option<i64> {
    if let Ok(code) = value.parse::<i64>() {
        return Some(code);
    }
    let float = value.parse::<f64>().ok()?;
    if float.is_finite() && float.fract() == 0.0 {
        Some(float as i64)
    } else {
        None
    }
}

/// A scale given by built-in name or spelled out inline in a plan file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScaleRef {
    Named(String),
    Inline(Scale),
}

impl ScaleRef {
    pub fn resolve(&self) -> Result<Scale, PlanError> {
        match self {
            Self::Named(name) => builtin_scale(name).ok_or_else(|| PlanError::UnknownScale {
                name: name.clone(),
            }),
            Self::Inline(scale) => Ok(Scale::new(
                scale.name.clone(),
                scale.levels.clone(),
                scale.top_box_min,
            )),
        }
    }
}

pub const LIKELIHOOD5: &str = "likelihood5";
pub const AGREEMENT5: &str = "agreement5";
pub const IMPORTANCE5: &str = "importance5";
pub const DEFINITELY5: &str = "definitely5";
pub const SENTIMENT5: &str = "sentiment5";
pub const CREDIT_INFLUENCE5: &str = "credit_influence5";
pub const YES_NO: &str = "yes_no";

/// Names of all built-in scales, in a stable order.
pub const BUILTIN_SCALES: &[&str] = &[
    LIKELIHOOD5,
    AGREEMENT5,
    IMPORTANCE5,
    DEFINITELY5,
    SENTIMENT5,
    CREDIT_INFLUENCE5,
    YES_NO,
];

/// Look up one of the survey instrument's answer scales.
pub fn builtin_scale(name: &str) -> Option<Scale> {
    let scale = match name {
        LIKELIHOOD5 => Scale::from_labels(
            LIKELIHOOD5,
            1,
            &[
                "Very unlikely",
                "Somewhat unlikely",
                "Neither likely nor unlikely",
                "Somewhat likely",
                "Very likely",
            ],
            4,
        ),
        AGREEMENT5 => Scale::from_labels(
            AGREEMENT5,
            1,
            &[
                "Strongly disagree",
                "Somewhat disagree",
                "Neither agree nor disagree",
                "Somewhat agree",
                "Strongly agree",
            ],
            4,
        ),
        IMPORTANCE5 => Scale::from_labels(
            IMPORTANCE5,
            1,
            &[
                "Not at all important",
                "Slightly important",
                "Moderately important",
                "Very important",
                "Extremely important",
            ],
            4,
        ),
        DEFINITELY5 => Scale::from_labels(
            DEFINITELY5,
            1,
            &[
                "Definitely not",
                "Probably not",
                "Might or might not",
                "Probably yes",
                "Definitely yes",
            ],
            4,
        ),
        SENTIMENT5 => Scale::from_labels(
            SENTIMENT5,
            1,
            &[
                "Very Negative",
                "Somewhat Negative",
                "Neutral",
                "Somewhat Positive",
                "Very Positive",
            ],
            4,
        ),
        CREDIT_INFLUENCE5 => Scale::from_labels(
            CREDIT_INFLUENCE5,
            1,
            &[
                "It had no influence on my decision to pursue a graduate program.",
                "It was a minor factor in my decision to pursue a graduate program.",
                "It was a significant factor among others in my decision to pursue a graduate program.",
                "It was the primary factor in my decision to pursue a graduate program.",
                "It was the only reason I chose to pursue a graduate program.",
            ],
            4,
        ),
        YES_NO => Scale::from_labels(YES_NO, 0, &["No", "Yes"], 1),
        _ => return None,
    };
    Some(scale)
}
