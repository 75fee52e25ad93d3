use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    Table,
    Figure,
    Report,
}

/// One generated file, relative to the output directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactRecord {
    /// Output-relative path using `/` separators.
    pub path: String,
    pub kind: ArtifactKind,
    /// Survey fields the artifact summarises.
    #[serde(default)]
    pub fields: Vec<String>,
    pub sha256: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub sources: Vec<String>,
    pub rows_read: usize,
    pub rows_analyzed: usize,
}

/// Index of a run's outputs, written last as `manifest.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub tool: String,
    pub version: String,
    pub generated_at: String,
    pub correlation: String,
    pub dataset: DatasetSummary,
    pub artifacts: Vec<ArtifactRecord>,
}

impl Manifest {
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.artifacts.iter().map(|a| a.path.as_str())
    }
}
