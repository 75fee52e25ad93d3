//! Shared types for the licensure-intent survey analysis.

pub mod artifact;
pub mod error;
pub mod plan;
pub mod scale;

pub use artifact::{ArtifactKind, ArtifactRecord, DatasetSummary, Manifest};
pub use error::{DataSchemaError, PlanError};
pub use plan::{
    AnalysisPlan, CompletionFilter, CorrelationMethod, FactorKind, FactorSpec, FieldRole,
    OutcomeSpec, ResolvedFactor, ResolvedKind, ResolvedOutcome, ResolvedPlan, artifact_stem,
    default_plan, load_plan,
};
pub use scale::{BUILTIN_SCALES, Scale, ScaleLevel, ScaleRef, builtin_scale};
