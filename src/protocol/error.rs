//! Error types for A2A task operations

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::status::StatusCode;

/// Coarse failure class of an [`A2AError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Missing or malformed caller input, or a request the agent rejected
    InvalidRequest,

    /// Bad or missing credential
    Unauthorized,

    /// Not enough credits to run the agent
    PaymentRequired,

    /// Too many requests
    RateLimited,

    /// The task was cancelled
    Cancelled,

    /// Remote 5xx or internal fault
    ServerError,

    /// Malformed response or stream body
    DecodeError,

    /// Transport-level failure before any response
    NetworkError,
}

impl ErrorKind {
    /// Default machine code used when the server did not supply one
    pub fn default_code(&self) -> &'static str {
        match self {
            ErrorKind::InvalidRequest => "INVALID_REQUEST",
            ErrorKind::Unauthorized => "UNAUTHORIZED",
            ErrorKind::PaymentRequired => "INSUFFICIENT_CREDITS",
            ErrorKind::RateLimited => "RATE_LIMITED",
            ErrorKind::Cancelled => "TASK_CANCELLED",
            ErrorKind::ServerError => "SERVER_ERROR",
            ErrorKind::DecodeError => "DECODE_ERROR",
            ErrorKind::NetworkError => "NETWORK_ERROR",
        }
    }

    /// Classify an HTTP status code when no structured error body is available
    pub fn from_http_status(status: u16) -> Self {
        match status {
            400 | 404 | 422 => ErrorKind::InvalidRequest,
            401 | 403 => ErrorKind::Unauthorized,
            402 => ErrorKind::PaymentRequired,
            429 => ErrorKind::RateLimited,
            _ => ErrorKind::ServerError,
        }
    }

    /// Classify a server-supplied lifecycle or error code
    ///
    /// Returns `None` for codes that carry no failure class of their own.
    pub fn from_code(code: &StatusCode) -> Option<Self> {
        match code {
            StatusCode::InvalidRequest | StatusCode::InvalidIntent => Some(ErrorKind::InvalidRequest),
            StatusCode::Unauthorized => Some(ErrorKind::Unauthorized),
            StatusCode::InsufficientCredits => Some(ErrorKind::PaymentRequired),
            StatusCode::RateLimited => Some(ErrorKind::RateLimited),
            StatusCode::TaskCancelled => Some(ErrorKind::Cancelled),
            StatusCode::TaskFailed | StatusCode::TargetUnavailable | StatusCode::Timeout => {
                Some(ErrorKind::ServerError)
            }
            _ => None,
        }
    }
}

/// The one error value every engine operation fails with
///
/// Transport faults, HTTP failures, malformed bodies and business-level
/// failures reported by the agent all end up in this shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
pub struct A2AError {
    /// Failure class
    pub kind: ErrorKind,

    /// Machine code, server-supplied when available (e.g. "RATE_LIMITED")
    pub api_code: String,

    /// Underlying HTTP status, absent for failures before any response
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_status: Option<u16>,

    /// Human-readable message
    pub message: String,

    /// Additional structured information
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl A2AError {
    /// Create a new error of the given kind with its default code
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            api_code: kind.default_code().to_string(),
            http_status: None,
            message: message.into(),
            details: None,
        }
    }

    /// Caller input rejected before any network call
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidRequest, message)
    }

    /// Malformed response or stream payload
    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::DecodeError, message)
    }

    /// Failure before any response was received
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NetworkError, message)
    }

    /// Override the machine code
    pub fn with_code(mut self, api_code: impl Into<String>) -> Self {
        self.api_code = api_code.into();
        self
    }

    /// Attach the HTTP status
    pub fn with_http_status(mut self, status: u16) -> Self {
        self.http_status = Some(status);
        self
    }

    /// Attach structured details
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Error type string used by OpenAI-style hosts for this failure class
    pub fn host_error_type(&self) -> &'static str {
        match self.kind {
            ErrorKind::InvalidRequest => "invalid_request_error",
            ErrorKind::Unauthorized => "authentication_error",
            ErrorKind::PaymentRequired => "payment_required_error",
            ErrorKind::RateLimited => "rate_limit_error",
            ErrorKind::Cancelled => "operation_canceled_error",
            ErrorKind::ServerError | ErrorKind::DecodeError | ErrorKind::NetworkError => {
                "server_error"
            }
        }
    }

    /// Whether the failure happened before the request reached the agent
    pub fn is_network(&self) -> bool {
        self.kind == ErrorKind::NetworkError
    }
}

impl fmt::Display for A2AError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.api_code, self.message)?;
        if let Some(status) = self.http_status {
            write!(f, " (HTTP {})", status)?;
        }
        Ok(())
    }
}

/// Result type alias for A2A operations
pub type A2AResult<T> = Result<T, A2AError>;

impl From<reqwest::Error> for A2AError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            A2AError::network(format!("Request timed out: {}", err)).with_code("TIMEOUT")
        } else if err.is_connect() {
            A2AError::network(format!("Connection error: {}", err))
        } else if err.is_decode() {
            A2AError::decode(err.to_string())
        } else {
            let error = A2AError::network(err.to_string());
            match err.status() {
                Some(status) => error.with_http_status(status.as_u16()),
                None => error,
            }
        }
    }
}

impl From<serde_json::Error> for A2AError {
    fn from(err: serde_json::Error) -> Self {
        A2AError::decode(format!("Response is not valid JSON: {}", err))
    }
}
