//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            // 404 Not Found
            Self::NotFound | Self::ClientNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::AlreadyExists | Self::ContactExists | Self::AadhaarExists => {
                StatusCode::CONFLICT
            }

            // 405 Method Not Allowed
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,

            // 503 Service Unavailable (transient, client can retry)
            Self::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,

            // 504 Gateway Timeout (request deadline elapsed)
            Self::TimeoutError => StatusCode::GATEWAY_TIMEOUT,

            // 500 Internal Server Error
            Self::Unknown | Self::InternalError | Self::DatabaseError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }

            // 400 Bad Request
            Self::ValidationFailed
            | Self::InvalidRequest
            | Self::InvalidFormat
            | Self::RequiredField
            | Self::ValueOutOfRange
            | Self::FeeDateInFuture => StatusCode::BAD_REQUEST,
        }
    }

    /// Short machine-readable error kind carried in the `error` field of error bodies
    pub fn kind(&self) -> &'static str {
        match self.http_status() {
            StatusCode::BAD_REQUEST => "validation_error",
            StatusCode::NOT_FOUND => "not_found",
            StatusCode::CONFLICT => "conflict",
            StatusCode::METHOD_NOT_ALLOWED => "method_not_allowed",
            StatusCode::SERVICE_UNAVAILABLE => "service_unavailable",
            StatusCode::GATEWAY_TIMEOUT => "timeout",
            _ => "unknown_error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ErrorCode::ValidationFailed.http_status(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::FeeDateInFuture.http_status(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::ClientNotFound.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorCode::ContactExists.http_status(), StatusCode::CONFLICT);
        assert_eq!(ErrorCode::AadhaarExists.http_status(), StatusCode::CONFLICT);
        assert_eq!(
            ErrorCode::MethodNotAllowed.http_status(),
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(
            ErrorCode::ServiceUnavailable.http_status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ErrorCode::TimeoutError.http_status(),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            ErrorCode::DatabaseError.http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_kind() {
        assert_eq!(ErrorCode::RequiredField.kind(), "validation_error");
        assert_eq!(ErrorCode::AadhaarExists.kind(), "conflict");
        assert_eq!(ErrorCode::ClientNotFound.kind(), "not_found");
        assert_eq!(ErrorCode::ServiceUnavailable.kind(), "service_unavailable");
        assert_eq!(ErrorCode::TimeoutError.kind(), "timeout");
        assert_eq!(ErrorCode::Unknown.kind(), "unknown_error");
    }
}
