//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,

            Self::DatabaseError => StatusCode::INTERNAL_SERVER_ERROR,

            // Validation, invalid list and MailChimp failures all answer 400
            Self::ValidationFailed
            | Self::InvalidRequest
            | Self::InvalidList
            | Self::RemoteCallFailed => StatusCode::BAD_REQUEST,
        }
    }
}
