//! Unified error codes for the MailChimp bridge
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Sync errors
//! - 9xxx: System errors

use std::fmt;

/// Unified error code enum
///
/// Codes never reach the response body (clients only see `message` and
/// `errors`); they drive the HTTP status mapping and log output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Field validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Request body could not be read as an attribute map
    InvalidRequest = 5,

    // ==================== 1xxx: Sync ====================
    /// Owning list does not exist locally
    InvalidList = 1001,
    /// MailChimp call failed after the local write was committed
    RemoteCallFailed = 1002,

    // ==================== 9xxx: System ====================
    /// Database error
    DatabaseError = 9002,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Get the default message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            ErrorCode::ValidationFailed => "Invalid data given",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::InvalidRequest => "Invalid request body",
            ErrorCode::InvalidList => "Invalid list given",
            ErrorCode::RemoteCallFailed => "MailChimp request failed",
            ErrorCode::DatabaseError => "Database error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
