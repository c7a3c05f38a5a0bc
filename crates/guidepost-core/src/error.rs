//! Error types module
//!
//! `ClientError` is the internal failure taxonomy of the client: transport
//! faults, HTTP-level failures and everything else. At the repository
//! boundary every `ClientError` collapses into an [`ApiError`], which is the
//! only error shape controllers ever see.

use std::io;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like a 404 from the server
    Debug,
    /// Warning level - for connectivity problems the user can retry
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Coarse classification of a [`ClientError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Network,
    Api,
    Generic,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    /// DNS, refused connection, timeout, TLS or an interrupted body stream.
    #[error("Network error: {0}")]
    Network(String),

    /// The server answered outside 2xx, or answered 2xx without a body.
    #[error("{message}")]
    Api { message: String, code: Option<u16> },

    /// Malformed JSON, invalid input, local I/O.
    #[error("Error: {0}")]
    Generic(String),
}

impl ClientError {
    pub fn api(message: impl Into<String>, code: Option<u16>) -> Self {
        ClientError::Api {
            message: message.into(),
            code,
        }
    }

    pub fn invalid_input(detail: impl Into<String>) -> Self {
        ClientError::Generic(format!("Invalid input: {}", detail.into()))
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::Network(_) => ErrorKind::Network,
            ClientError::Api { .. } => ErrorKind::Api,
            ClientError::Generic(_) => ErrorKind::Generic,
        }
    }

    /// HTTP status, when the failure came from a well-formed response.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ClientError::Api { code, .. } => *code,
            _ => None,
        }
    }

    pub fn log_level(&self) -> LogLevel {
        match self {
            ClientError::Network(_) => LogLevel::Warn,
            ClientError::Api { .. } => LogLevel::Debug,
            ClientError::Generic(_) => LogLevel::Error,
        }
    }
}

impl From<io::Error> for ClientError {
    fn from(err: io::Error) -> Self {
        ClientError::Generic(err.to_string())
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Generic(err.to_string())
    }
}

/// Failure payload handed to callers: a display message and, for HTTP-level
/// failures, the status code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    pub message: String,
    pub code: Option<u16>,
}

impl ApiError {
    pub fn new(message: impl Into<String>, code: Option<u16>) -> Self {
        Self {
            message: message.into(),
            code,
        }
    }
}

impl From<ClientError> for ApiError {
    fn from(err: ClientError) -> Self {
        let code = err.status_code();
        ApiError {
            message: err.to_string(),
            code,
        }
    }
}

/// Outcome of every repository operation: `Ok` is Success, `Err` is Error.
pub type ApiResult<T> = Result<T, ApiError>;
