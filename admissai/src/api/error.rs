//! Backend error types.

use thiserror::Error;

/// Message used when a failed response carries no readable body.
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// A failed backend call.
///
/// Every failure is handled the same way by callers (display and move on);
/// the variants only exist so logs can tell them apart.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (connection refused, reset, ...).
    #[error("could not reach the backend: {0}")]
    Transport(#[source] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("{message}")]
    Status { status: u16, message: String },

    /// The backend answered 2xx but the body did not match the expected shape.
    #[error("unexpected response from the backend: {0}")]
    Decode(#[source] reqwest::Error),
}

impl ApiError {
    /// HTTP status for `Status` errors.
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
