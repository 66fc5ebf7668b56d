//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error(transparent)]
    Navigation(#[from] befall_router::NavigationError),

    #[error(transparent)]
    Decode(#[from] befall_args::DecodeError),

    #[error(transparent)]
    Api(#[from] befall_api::ApiError),

    #[error("State error: {0}")]
    State(#[from] befall_state::StateError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("no {0} specified")]
    MissingArgument(&'static str),

    #[error("unsupported mode {0}")]
    UnsupportedFileMode(String),

    #[error("Invalid command line: {0}")]
    InvalidLine(String),

    #[error("Configuration error: {0}")]
    Config(String),
}
