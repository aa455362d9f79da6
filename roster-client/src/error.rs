//! Client error types

use reqwest::StatusCode;
use shared::error::{AppError, ErrorBody};
use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// Input rejected; fix and resubmit
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        field: Option<String>,
    },

    /// Contact or aadhaar already taken
    #[error("Conflict: {message}")]
    Conflict {
        message: String,
        field: Option<String>,
    },

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Server could not reach its store (retried before surfacing)
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    /// Overall deadline exceeded, or the server gave up on the request
    #[error("Request timed out")]
    Timeout,

    #[error("Unexpected response ({status}): {message}")]
    Unknown { status: u16, message: String },

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl ClientError {
    /// Build from a non-success status and its body text
    pub fn from_response(status: StatusCode, text: &str) -> Self {
        match serde_json::from_str::<ErrorBody>(text) {
            Ok(body) => Self::from_app_error(AppError::from(body)),
            Err(_) => Self::from_status(status, text.to_string(), None),
        }
    }

    // the error code decides, not the transport status
    fn from_app_error(err: AppError) -> Self {
        if err.is_retryable() {
            return ClientError::Unavailable(err.message);
        }
        Self::from_status(err.http_status(), err.message, err.field)
    }

    fn from_status(status: StatusCode, message: String, field: Option<String>) -> Self {
        match status {
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                ClientError::Validation { message, field }
            }
            StatusCode::CONFLICT => ClientError::Conflict { message, field },
            StatusCode::NOT_FOUND => ClientError::NotFound(message),
            StatusCode::SERVICE_UNAVAILABLE => ClientError::Unavailable(message),
            StatusCode::GATEWAY_TIMEOUT | StatusCode::REQUEST_TIMEOUT => ClientError::Timeout,
            other => ClientError::Unknown {
                status: other.as_u16(),
                message,
            },
        }
    }

    /// Worth another attempt after a backoff
    ///
    /// A request that timed out may already have been applied, so it is
    /// only repeated when `idempotent` is set.
    pub fn is_retryable(&self, idempotent: bool) -> bool {
        match self {
            ClientError::Unavailable(_) => true,
            ClientError::Http(e) => e.is_connect() || (idempotent && e.is_timeout()),
            _ => false,
        }
    }

    /// Field named by a validation or conflict error
    pub fn field(&self) -> Option<&str> {
        match self {
            ClientError::Validation { field, .. } | ClientError::Conflict { field, .. } => {
                field.as_deref()
            }
            _ => None,
        }
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
