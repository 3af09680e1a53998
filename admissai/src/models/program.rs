//! Program catalog models (read-only reference data from the backend).

use serde::{Deserialize, Serialize};

use super::CompressionStats;

/// A university program as listed by `/api/programs`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Program {
    pub id: String,
    pub university: String,
    #[serde(default)]
    pub short_name: String,
    /// Program title, e.g. "Computer Science (B.S.)".
    pub program: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub acceptance_rate: Option<String>,
    #[serde(default)]
    pub avg_gpa: Option<String>,
    #[serde(default)]
    pub application_deadline: Option<String>,
    #[serde(default)]
    pub application_fee: Option<String>,
}

/// Response of `GET /api/programs`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProgramList {
    pub programs: Vec<Program>,
    #[serde(default)]
    pub categories: Vec<String>,
}

/// Response of `GET /api/programs/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProgramDetail {
    pub program: Program,
    #[serde(default)]
    pub compression: Option<CompressionStats>,
}
