//! HTTP client for the admissions backend.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::error::{ApiError, UNKNOWN_ERROR};
use super::types::{ChatRequest, ChatResponse, CompressRequest, ErrorBody};
use crate::models::{ChecklistData, CompressionResult, ProgramDetail, ProgramList};

/// Sends chat turns to the backend.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, ApiError>;
}

/// Fetches a program's checklist reference data.
#[async_trait]
pub trait ChecklistBackend: Send + Sync {
    async fn checklist(&self, program_id: &str) -> Result<ChecklistData, ApiError>;
}

/// Thin JSON-over-HTTP client. One instance per process.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client rooted at `base_url` (e.g. `http://127.0.0.1:5000`).
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// List programs, optionally filtered by category and free-text query.
    pub async fn programs(
        &self,
        category: Option<&str>,
        query: Option<&str>,
    ) -> Result<ProgramList, ApiError> {
        let mut params = Vec::new();
        if let Some(c) = category.filter(|c| !c.is_empty()) {
            params.push(format!("category={}", urlencoding::encode(c)));
        }
        if let Some(q) = query.filter(|q| !q.is_empty()) {
            params.push(format!("q={}", urlencoding::encode(q)));
        }

        let mut url = self.url("/api/programs");
        if !params.is_empty() {
            url = format!("{url}?{}", params.join("&"));
        }

        self.get(&url).await
    }

    /// Fetch one program with its context-compression stats.
    pub async fn program(&self, program_id: &str) -> Result<ProgramDetail, ApiError> {
        let url = self.url(&format!("/api/programs/{}", urlencoding::encode(program_id)));
        self.get(&url).await
    }

    /// Run the backend compressor over arbitrary text.
    pub async fn compress(&self, text: &str, ratio: f64) -> Result<CompressionResult, ApiError> {
        let url = self.url("/api/compress");
        debug!(%url, chars = text.len(), ratio, "POST compress");

        let resp = self
            .http
            .post(&url)
            .json(&CompressRequest { text, ratio })
            .send()
            .await
            .map_err(ApiError::Transport)?;

        Self::parse(resp).await
    }

    async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        debug!(%url, "GET");

        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(ApiError::Transport)?;

        Self::parse(resp).await
    }

    /// Decode a success body, or turn a failed response into `ApiError::Status`.
    ///
    /// A failed body is read for its `error` field; a body that is not JSON
    /// yields the generic message, JSON without `error` yields `HTTP <status>`.
    async fn parse<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ApiError> {
        let status = resp.status();

        if !status.is_success() {
            let message = match resp.json::<ErrorBody>().await {
                Ok(ErrorBody { error: Some(error) }) if !error.is_empty() => error,
                Ok(_) => format!("HTTP {}", status.as_u16()),
                Err(_) => UNKNOWN_ERROR.to_string(),
            };
            warn!(status = status.as_u16(), %message, "backend returned an error");
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        resp.json().await.map_err(ApiError::Decode)
    }
}

#[async_trait]
impl ChatBackend for ApiClient {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, ApiError> {
        let url = self.url("/api/chat");
        debug!(
            %url,
            history = request.history.len(),
            program_id = request.program_id.as_deref().unwrap_or(""),
            "POST chat"
        );

        let resp = self
            .http
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(ApiError::Transport)?;

        Self::parse(resp).await
    }
}

#[async_trait]
impl ChecklistBackend for ApiClient {
    async fn checklist(&self, program_id: &str) -> Result<ChecklistData, ApiError> {
        let url = self.url(&format!("/api/checklist/{}", urlencoding::encode(program_id)));
        self.get(&url).await
    }
}
