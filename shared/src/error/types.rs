//! Error types and the JSON error body

use super::codes::ErrorCode;
use crate::validation::FieldErrors;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Response header set when a MailChimp call failed after the local write
/// was committed, so local and remote state may now disagree.
pub const LOCAL_STATE_HEADER: &str = "x-local-state";

/// Application error with structured error code and field errors
///
/// This is the error every endpoint answers with:
/// - Standardized error codes via [`ErrorCode`]
/// - Human-readable message (passed through from MailChimp for remote failures)
/// - Optional per-field validation errors
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AppError {
    /// The error code identifying the type of error
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Field path -> reasons, present for validation failures
    pub errors: Option<FieldErrors>,
}

impl AppError {
    /// Create a new error with the default message for the error code
    pub fn new(code: ErrorCode) -> Self {
        Self {
            message: code.message().to_string(),
            code,
            errors: None,
        }
    }

    /// Create a new error with a custom message
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            errors: None,
        }
    }

    /// Attach field errors to this error
    pub fn with_errors(mut self, errors: FieldErrors) -> Self {
        self.errors = Some(errors);
        self
    }

    /// Get the HTTP status code for this error
    pub fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }

    // ==================== Convenience constructors ====================

    /// "Invalid data given" with the per-field report
    pub fn invalid_data(errors: FieldErrors) -> Self {
        Self::new(ErrorCode::ValidationFailed).with_errors(errors)
    }

    /// `<Kind>[<id>] not found`
    pub fn not_found(kind: &str, id: &str) -> Self {
        Self::with_message(ErrorCode::NotFound, format!("{kind}[{id}] not found"))
    }

    /// "Invalid list given"
    pub fn invalid_list() -> Self {
        Self::new(ErrorCode::InvalidList)
    }

    /// MailChimp call failed, message passed through as-is
    pub fn remote_call(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::RemoteCallFailed, msg)
    }

    /// Request body could not be read
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::with_message(
            ErrorCode::InvalidRequest,
            format!("{}: {}", ErrorCode::InvalidRequest.message(), msg.into()),
        )
    }

    /// Create a database error
    pub fn database(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::DatabaseError, msg)
    }
}

/// JSON body of every error response
///
/// ```json
/// { "message": "Invalid data given", "errors": { "status": ["The status field is required."] } }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
}

impl From<&AppError> for ErrorBody {
    fn from(err: &AppError) -> Self {
        Self {
            message: err.message.clone(),
            errors: err.errors.clone(),
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

        // System errors never leak their detail to the client
        let body = if matches!(self.code.category(), super::category::ErrorCategory::System) {
            tracing::error!(
                code = %self.code,
                message = %self.message,
                "System error occurred"
            );
            ErrorBody {
                message: self.code.message().to_string(),
                errors: None,
            }
        } else {
            ErrorBody::from(&self)
        };

        if self.code == ErrorCode::RemoteCallFailed {
            return (status, [(LOCAL_STATE_HEADER, "committed")], Json(body)).into_response();
        }

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_app_error_new() {
        let err = AppError::new(ErrorCode::InvalidList);
        assert_eq!(err.code, ErrorCode::InvalidList);
        assert_eq!(err.message, "Invalid list given");
        assert!(err.errors.is_none());
    }

    #[test]
    fn test_not_found_message() {
        let err = AppError::not_found("MailChimpMember", "invalid-member-id");
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "MailChimpMember[invalid-member-id] not found");
        assert_eq!(err.http_status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_invalid_data_carries_errors() {
        let mut errors = BTreeMap::new();
        errors.insert(
            "status".to_string(),
            vec!["The status field is required.".to_string()],
        );
        let err = AppError::invalid_data(errors);

        assert_eq!(err.message, "Invalid data given");
        assert_eq!(err.http_status(), StatusCode::BAD_REQUEST);
        assert!(err.errors.unwrap().contains_key("status"));
    }

    #[test]
    fn test_remote_call_passthrough() {
        let err = AppError::remote_call("The requested resource could not be found.");
        assert_eq!(err.code, ErrorCode::RemoteCallFailed);
        assert_eq!(err.to_string(), "The requested resource could not be found.");
    }

    #[test]
    fn test_error_body_serialize_skips_missing_errors() {
        let body = ErrorBody::from(&AppError::invalid_list());
        let json = serde_json::to_string(&body).unwrap();
        assert_eq!(json, r#"{"message":"Invalid list given"}"#);
    }

    #[test]
    fn test_remote_failure_response_flags_local_state() {
        use axum::response::IntoResponse;

        let response = AppError::remote_call("timeout").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers().get(LOCAL_STATE_HEADER).unwrap(),
            "committed"
        );
    }

    #[test]
    fn test_system_error_hides_detail() {
        use axum::response::IntoResponse;

        let response = AppError::database("disk I/O error").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.headers().get(LOCAL_STATE_HEADER).is_none());
    }
}
