//! Backend API access.
//!
//! Every endpoint is single-shot JSON over HTTP. Non-success responses are
//! normalised into [`ApiError::Status`] carrying the body's `error` field.

mod client;
mod error;
mod types;

pub use client::{ApiClient, ChatBackend, ChecklistBackend};
pub use error::ApiError;
pub use types::{ChatRequest, ChatResponse};
