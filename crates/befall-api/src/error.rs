//! API error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("route {0} not found")]
    UnknownRoute(String),

    #[error("testable route {0} already exists")]
    DuplicateRoute(String),

    #[error("failed to populate route with args: {0}")]
    Populate(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("request timed out")]
    Timeout,

    #[error("request cancelled")]
    Cancelled,

    #[error("request worker exited without a result")]
    WorkerLost,

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
