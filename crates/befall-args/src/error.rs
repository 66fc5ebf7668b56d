//! Decode error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("failed to convert {key}={value} to {ty}: {source}")]
    Int {
        key: String,
        value: String,
        ty: String,
        #[source]
        source: std::num::ParseIntError,
    },

    #[error("failed to convert {key}={value} to {ty}: unsigned value has a sign")]
    Sign { key: String, value: String, ty: String },

    #[error("failed to parse {key}={value} as JSON: {source}")]
    Json {
        key: String,
        value: String,
        #[source]
        source: serde_json::Error,
    },
}

impl DecodeError {
    pub fn key(&self) -> &str {
        match self {
            DecodeError::Int { key, .. }
            | DecodeError::Sign { key, .. }
            | DecodeError::Json { key, .. } => key,
        }
    }
}
