use pegasus_client::{AuthError, ClientError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("{0}")]
    Auth(#[from] AuthError),

    #[error("Configuration error: {0:#}")]
    Config(#[from] anyhow::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("{0}")]
    NotFound(String),

    /// A page-level failure that the view model reports as state.
    #[error("{0}")]
    Failed(String),
}

impl AppError {
    /// Stable error kind for JSON output.
    pub fn kind(&self) -> String {
        match self {
            Self::Client(e) => e.kind().to_string(),
            Self::Auth(e) => e.kind().to_string(),
            Self::Config(_) => "config-error".to_string(),
            Self::Io(_) => "io-error".to_string(),
            Self::Json(_) => "json-error".to_string(),
            Self::InvalidInput(_) => "invalid-input".to_string(),
            Self::NotFound(_) => "not-found".to_string(),
            Self::Failed(_) => "request-failed".to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
