//! Error types and the JSON error body

use super::codes::ErrorCode;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Application error with structured error code and details
///
/// Every failure the handler reports is one of these; the code decides
/// the HTTP status and whether the caller may retry.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AppError {
    /// The error code identifying the type of error
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Offending or colliding input field
    pub field: Option<String>,
    /// Optional additional details (field lists, allowed verbs, ...)
    pub details: Option<HashMap<String, Value>>,
}

impl AppError {
    /// Create a new error with the default message for the error code
    pub fn new(code: ErrorCode) -> Self {
        Self {
            message: code.message().to_string(),
            code,
            field: None,
            details: None,
        }
    }

    /// Create a new error with a custom message
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            field: None,
            details: None,
        }
    }

    /// Attach the name of the field this error is about
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Add a detail entry to this error
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Get the HTTP status code for this error
    pub fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }

    /// Whether the same request may be repeated unchanged
    pub fn is_retryable(&self) -> bool {
        self.code.is_retryable()
    }

    // ==================== Convenience constructors ====================

    /// Create a missing-field error
    pub fn required_field(field: &str) -> Self {
        Self::with_message(ErrorCode::RequiredField, format!("{field} is required"))
            .with_field(field)
    }

    /// Create a malformed-value error for a field
    pub fn invalid_format(field: &str, msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InvalidFormat, msg).with_field(field)
    }

    /// Create an out-of-range error for a field
    pub fn out_of_range(field: &str, msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ValueOutOfRange, msg).with_field(field)
    }

    /// Create an invalid request error
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InvalidRequest, msg)
    }

    /// Create a not found error
    pub fn not_found(resource: impl Into<String>) -> Self {
        let r = resource.into();
        Self::with_message(ErrorCode::NotFound, format!("{} not found", r))
            .with_detail("resource", r)
    }

    /// Create a client-not-found error
    pub fn client_not_found(id: i64) -> Self {
        Self::with_message(ErrorCode::ClientNotFound, format!("Client {id} not found"))
            .with_detail("id", id)
    }

    /// Create a uniqueness conflict naming the colliding field
    pub fn duplicate(field: &str) -> Self {
        let code = match field {
            "contact" => ErrorCode::ContactExists,
            "aadhaar" => ErrorCode::AadhaarExists,
            _ => ErrorCode::AlreadyExists,
        };
        Self::new(code).with_field(field)
    }

    /// Create a method-not-allowed error listing the supported verbs
    pub fn method_not_allowed(method: &str, allowed: &[&str]) -> Self {
        Self::with_message(
            ErrorCode::MethodNotAllowed,
            format!("Method {method} not allowed"),
        )
        .with_detail("allowed", allowed.to_vec())
    }

    /// Create a service unavailable error
    pub fn service_unavailable(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ServiceUnavailable, msg)
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InternalError, msg)
    }

    /// Create a database error
    pub fn database(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::DatabaseError, msg)
    }
}

/// JSON body of every error response
///
/// ```json
/// {
///   "message": "A client with this contact number already exists",
///   "error": "conflict",
///   "code": 1002,
///   "field": "contact",
///   "timestamp": "2024-03-01T10:00:00Z"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable message
    pub message: String,
    /// Error kind (validation_error, conflict, ...)
    pub error: String,
    /// Numeric error code
    pub code: ErrorCode,
    /// Offending field
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// Additional error details
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, Value>>,
    /// RFC 3339 time the error was produced
    pub timestamp: String,
}

impl ErrorBody {
    /// Create an error body from an AppError
    pub fn from_error(err: &AppError) -> Self {
        Self {
            message: err.message.clone(),
            error: err.code.kind().to_string(),
            code: err.code,
            field: err.field.clone(),
            details: err.details.clone(),
            timestamp: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
        }
    }
}

impl From<ErrorBody> for AppError {
    fn from(body: ErrorBody) -> Self {
        Self {
            code: body.code,
            message: body.message,
            field: body.field,
            details: body.details,
        }
    }
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;

// ===== Axum Integration =====

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;

        let status = self.http_status();
        let body = ErrorBody::from_error(&self);

        // Log system errors
        if matches!(self.code.category(), super::category::ErrorCategory::System) {
            tracing::error!(
                code = %self.code,
                message = %self.message,
                "System error occurred"
            );
        }

        (status, Json(body)).into_response()
    }
}
