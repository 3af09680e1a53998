//! Request and response bodies for the backend endpoints.

use serde::{Deserialize, Serialize};

use crate::models::{CompressionStats, HistoryEntry};

/// Body of `POST /api/chat`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub history: Vec<HistoryEntry>,
    /// Omitted entirely (not `null`) for general, unscoped questions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub program_id: Option<String>,
}

/// Response of `POST /api/chat`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub reply: String,
    #[serde(default)]
    pub compression_stats: Option<CompressionStats>,
    #[serde(default)]
    pub model_used: Option<String>,
}

/// Body of `POST /api/compress`.
#[derive(Debug, Clone, Serialize)]
pub struct CompressRequest<'a> {
    pub text: &'a str,
    pub ratio: f64,
}

/// Shape of a failed response body.
#[derive(Debug, Deserialize)]
pub(super) struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}
