//! Error types shared by every client component.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Client-wide result type.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors raised by the gateway and every client layered on it.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport failure (DNS, connect, TLS, timeout, broken body).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-JSON response body, carried verbatim.
    #[error("server error (status {status}): {body}")]
    Server { status: u16, body: String },

    /// The API rejected the bearer token. The session has already been cleared.
    #[error("session expired or invalid - please sign in again")]
    Unauthenticated,

    /// Premium subscription required. The session is preserved.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// The operation needs a session and none is stored. No request was made.
    #[error("not authenticated")]
    NotAuthenticated,

    /// JSON error body reported by the API.
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// Client-side validation failure.
    #[error("validation error: {0}")]
    Validation(String),

    #[error("not found: {0}")]
    NotFound(String),

    /// Successful response whose body did not match the expected shape.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// 2xx response that lacks a field the caller needs.
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Stable, serializable classification of a [`ClientError`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ErrorKind {
    NetworkError,
    ServerError,
    Unauthenticated,
    Forbidden,
    NotAuthenticated,
    RequestFailed,
    ValidationError,
    NotFound,
    StorageError,
    InvalidRequest,
}

impl ClientError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    pub fn unexpected(msg: impl Into<String>) -> Self {
        Self::UnexpectedResponse(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Network(_) => ErrorKind::NetworkError,
            Self::Server { .. } | Self::Json(_) | Self::UnexpectedResponse(_) => {
                ErrorKind::ServerError
            }
            Self::Api { status, .. } if *status >= 500 => ErrorKind::ServerError,
            Self::Api { .. } => ErrorKind::RequestFailed,
            Self::Unauthenticated => ErrorKind::Unauthenticated,
            Self::Forbidden(_) => ErrorKind::Forbidden,
            Self::NotAuthenticated => ErrorKind::NotAuthenticated,
            Self::Validation(_) => ErrorKind::ValidationError,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Storage(_) => ErrorKind::StorageError,
            Self::InvalidUrl(_) => ErrorKind::InvalidRequest,
        }
    }

    /// Check if the user has to (re-)authenticate before retrying.
    pub fn requires_sign_in(&self) -> bool {
        matches!(self, Self::Unauthenticated | Self::NotAuthenticated)
    }

    /// Check if this error is transient and may be retried.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Api { status, .. } | Self::Server { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// HTTP status attached to the error, when there is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } | Self::Api { status, .. } => Some(*status),
            Self::Unauthenticated => Some(401),
            Self::Forbidden(_) => Some(403),
            Self::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Failure of a sign-in or sign-up attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("{0}")]
    InvalidCredentials(String),

    #[error("{0}")]
    ValidationFailed(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("server error: {0}")]
    Server(String),
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum AuthErrorKind {
    InvalidCredentials,
    ValidationFailed,
    NetworkError,
    ServerError,
}

impl AuthError {
    pub fn kind(&self) -> AuthErrorKind {
        match self {
            Self::InvalidCredentials(_) => AuthErrorKind::InvalidCredentials,
            Self::ValidationFailed(_) => AuthErrorKind::ValidationFailed,
            Self::Network(_) => AuthErrorKind::NetworkError,
            Self::Server(_) => AuthErrorKind::ServerError,
        }
    }
}

impl From<ClientError> for AuthError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Network(e) => AuthError::Network(e.to_string()),
            ClientError::Validation(msg) => AuthError::ValidationFailed(msg),
            other => AuthError::Server(other.to_string()),
        }
    }
}

/// `{success, data}` / `{success, error}` rendering of an operation result.
#[derive(Debug, Clone, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            error_kind: None,
        }
    }

    pub fn err(err: &ClientError) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(err.to_string()),
            error_kind: Some(err.kind()),
        }
    }
}

impl<T> From<Result<T>> for Envelope<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(e) => Self::err(&e),
        }
    }
}
