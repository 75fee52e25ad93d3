//! Analysis plan: which survey fields are analysed and how.
//!
//! The plan is the executable form of the variable-selection note. A built-in
//! default covers the licensure-intent survey; a JSON file with the same shape
//! can replace it.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::PlanError;
use crate::scale::{
    CREDIT_INFLUENCE5, DEFINITELY5, IMPORTANCE5, LIKELIHOOD5, Scale, ScaleRef, SENTIMENT5, YES_NO,
};

/// Role a field plays in the analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldRole {
    Outcome,
    Factor,
}

impl fmt::Display for FieldRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Outcome => f.write_str("outcome"),
            Self::Factor => f.write_str("factor"),
        }
    }
}

/// Association measure between the outcome and an ordered factor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CorrelationMethod {
    #[default]
    Pearson,
    Spearman,
}

impl CorrelationMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pearson => "pearson",
            Self::Spearman => "spearman",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeSpec {
    pub field: String,
    pub label: String,
    pub scale: ScaleRef,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FactorKind {
    Ordinal { scale: ScaleRef },
    Binary { scale: ScaleRef },
    Categorical { levels: Vec<String> },
    FreeText,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactorSpec {
    pub field: String,
    #[serde(default)]
    pub label: String,
    #[serde(flatten)]
    pub kind: FactorKind,
}

/// Restricts the analysis to completed responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionFilter {
    pub field: String,
    pub accepted: Vec<String>,
}

impl CompletionFilter {
    pub fn accepts(&self, value: &str) -> bool {
        let value = value.trim();
        self.accepted
            .iter()
            .any(|accepted| accepted.eq_ignore_ascii_case(value))
    }
}

fn default_top_n() -> usize {
    5
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisPlan {
    pub outcome: OutcomeSpec,
    pub factors: Vec<FactorSpec>,
    #[serde(default)]
    pub correlation: CorrelationMethod,
    #[serde(default)]
    pub completion: Option<CompletionFilter>,
    /// Number of factors shown in the correlation chart.
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

impl Default for AnalysisPlan {
    fn default() -> Self {
        default_plan()
    }
}

/// The licensure-intent survey plan.
pub fn default_plan() -> AnalysisPlan {
    let scaled = |field: &str, label: &str, scale: &str| FactorSpec {
        field: field.to_string(),
        label: label.to_string(),
        kind: FactorKind::Ordinal {
            scale: ScaleRef::Named(scale.to_string()),
        },
    };
    let binary = |field: &str, label: &str| FactorSpec {
        field: field.to_string(),
        label: label.to_string(),
        kind: FactorKind::Binary {
            scale: ScaleRef::Named(YES_NO.to_string()),
        },
    };
    let free_text = |field: &str| FactorSpec {
        field: field.to_string(),
        label: String::new(),
        kind: FactorKind::FreeText,
    };

    let mut factors = vec![
        scaled(
            "Q30",
            "150-credit education requirement influenced graduate enrollment",
            CREDIT_INFLUENCE5,
        ),
        scaled(
            "Q39_1",
            "Importance of CPA exam preparation in program value",
            IMPORTANCE5,
        ),
        scaled(
            "Q55",
            "Belief that graduate degree increases lifetime earnings (ROI)",
            DEFINITELY5,
        ),
        binary("Q53", "Awareness of alternative CPA pathway before survey"),
        binary("Q49", "Employer requires/encourages graduate degree"),
        scaled(
            "Q6",
            "Perception of alternative pathway (fewer credits + extra work year)",
            SENTIMENT5,
        ),
        FactorSpec {
            field: "Q16".to_string(),
            label: "Enrollment status".to_string(),
            kind: FactorKind::Categorical {
                levels: vec!["Full-time".to_string(), "Part-time".to_string()],
            },
        },
    ];
    factors.extend(
        ["Q32", "Q36", "Q38", "Q45", "Q50", "Q56", "Q59", "Q9"]
            .into_iter()
            .map(free_text),
    );

    AnalysisPlan {
        outcome: OutcomeSpec {
            field: "Q29".to_string(),
            label: "Likelihood of pursuing CPA licensure".to_string(),
            scale: ScaleRef::Named(LIKELIHOOD5.to_string()),
        },
        factors,
        correlation: CorrelationMethod::Pearson,
        completion: Some(CompletionFilter {
            field: "Finished".to_string(),
            accepted: vec!["1".to_string(), "true".to_string()],
        }),
        top_n: default_top_n(),
    }
}

/// Load a plan from a JSON file.
pub fn load_plan(path: &Path) -> Result<AnalysisPlan, PlanError> {
    let text = std::fs::read_to_string(path).map_err(|e| PlanError::io(path, e))?;
    serde_json::from_str(&text).map_err(|source| PlanError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// File-name stem for artifacts about `field`: lower-case, with every
/// character outside `[a-z0-9]` replaced by `_`.
pub fn artifact_stem(field: &str) -> String {
    field
        .trim()
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() {
                ch.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect()
}

/// Factor kind with scales resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedKind {
    Ordinal(Scale),
    Binary(Scale),
    Categorical(Vec<String>),
    FreeText,
}

impl ResolvedKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Ordinal(_) => "ordinal",
            Self::Binary(_) => "binary",
            Self::Categorical(_) => "categorical",
            Self::FreeText => "free_text",
        }
    }

    pub fn scale(&self) -> Option<&Scale> {
        match self {
            Self::Ordinal(scale) | Self::Binary(scale) => Some(scale),
            Self::Categorical(_) | Self::FreeText => None,
        }
    }

    pub fn is_quantitative(&self) -> bool {
        !matches!(self, Self::FreeText)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFactor {
    pub field: String,
    pub label: String,
    pub kind: ResolvedKind,
}

impl ResolvedFactor {
    pub fn display_label(&self) -> &str {
        if self.label.trim().is_empty() {
            &self.field
        } else {
            &self.label
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOutcome {
    pub field: String,
    pub label: String,
    pub scale: Scale,
}

/// A validated plan with every scale resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPlan {
    pub outcome: ResolvedOutcome,
    pub factors: Vec<ResolvedFactor>,
    pub correlation: CorrelationMethod,
    pub completion: Option<CompletionFilter>,
    pub top_n: usize,
}

impl ResolvedPlan {
    pub fn quantitative_factors(&self) -> impl Iterator<Item = &ResolvedFactor> {
        self.factors.iter().filter(|f| f.kind.is_quantitative())
    }

    pub fn free_text_fields(&self) -> impl Iterator<Item = &str> {
        self.factors
            .iter()
            .filter(|f| !f.kind.is_quantitative())
            .map(|f| f.field.as_str())
    }

    /// Outcome field followed by every factor field, in plan order.
    pub fn required_fields(&self) -> impl Iterator<Item = (&str, FieldRole)> {
        std::iter::once((self.outcome.field.as_str(), FieldRole::Outcome)).chain(
            self.factors
                .iter()
                .map(|f| (f.field.as_str(), FieldRole::Factor)),
        )
    }
}

impl AnalysisPlan {
    /// Check the plan and resolve its scales.
    pub fn resolve(&self) -> Result<ResolvedPlan, PlanError> {
        let outcome_field = self.outcome.field.trim();
        if outcome_field.is_empty() {
            return Err(PlanError::EmptyOutcome);
        }
        if self.top_n == 0 {
            return Err(PlanError::ZeroTopN);
        }
        let outcome_scale = self.outcome.scale.resolve()?;
        outcome_scale.validate()?;

        let mut factors = Vec::with_capacity(self.factors.len());
        let mut stems: BTreeMap<String, String> = BTreeMap::new();
        for spec in &self.factors {
            let field = spec.field.trim();
            if field.is_empty() {
                return Err(PlanError::EmptyFactor);
            }
            if field == outcome_field {
                return Err(PlanError::FactorIsOutcome {
                    field: field.to_string(),
                });
            }
            if factors.iter().any(|f: &ResolvedFactor| f.field == field) {
                return Err(PlanError::DuplicateFactor {
                    field: field.to_string(),
                });
            }
            let kind = resolve_kind(field, &spec.kind)?;
            if kind.is_quantitative() {
                let stem = artifact_stem(field);
                if let Some(first) = stems.insert(stem.clone(), field.to_string()) {
                    return Err(PlanError::ArtifactNameCollision {
                        first,
                        second: field.to_string(),
                        name: stem,
                    });
                }
            }
            factors.push(ResolvedFactor {
                field: field.to_string(),
                label: spec.label.trim().to_string(),
                kind,
            });
        }

        Ok(ResolvedPlan {
            outcome: ResolvedOutcome {
                field: outcome_field.to_string(),
                label: self.outcome.label.trim().to_string(),
                scale: outcome_scale,
            },
            factors,
            correlation: self.correlation,
            completion: self.completion.clone(),
            top_n: self.top_n,
        })
    }
}

fn resolve_kind(field: &str, kind: &FactorKind) -> Result<ResolvedKind, PlanError> {
    match kind {
        FactorKind::Ordinal { scale } => {
            let scale = scale.resolve()?;
            scale.validate()?;
            Ok(ResolvedKind::Ordinal(scale))
        }
        FactorKind::Binary { scale } => {
            let scale = scale.resolve()?;
            scale.validate()?;
            if scale.len() != 2 {
                return Err(PlanError::NotBinary {
                    field: field.to_string(),
                    scale: scale.name.clone(),
                    levels: scale.len(),
                });
            }
            Ok(ResolvedKind::Binary(scale))
        }
        FactorKind::Categorical { levels } => {
            let mut cleaned: Vec<String> = Vec::with_capacity(levels.len());
            for level in levels {
                let level = level.trim();
                if level.is_empty() {
                    continue;
                }
                if cleaned.iter().any(|l| l.eq_ignore_ascii_case(level)) {
                    return Err(PlanError::DuplicateLevel {
                        scale: field.to_string(),
                        what: "label",
                        value: level.to_string(),
                    });
                }
                cleaned.push(level.to_string());
            }
            if cleaned.is_empty() {
                return Err(PlanError::NoCategories {
                    field: field.to_string(),
                });
            }
            Ok(ResolvedKind::Categorical(cleaned))
        }
        FactorKind::FreeText => Ok(ResolvedKind::FreeText),
    }
}
