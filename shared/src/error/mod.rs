//! Unified error system for the MailChimp bridge
//!
//! This module provides the error handling used by every HTTP endpoint:
//! - [`ErrorCode`]: Standardized error codes for all error types
//! - [`ErrorCategory`]: Classification of errors by domain
//! - [`AppError`]: Error type with code, message and optional field errors
//! - [`ErrorBody`]: The JSON body every failed request answers with
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors (validation, lookup, request shape)
//! - 1xxx: Sync errors (owning list, MailChimp calls)
//! - 9xxx: System errors
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode};
//!
//! // Lookup failure, rendered as 404
//! let err = AppError::not_found("MailChimpList", "abc");
//! assert_eq!(err.message, "MailChimpList[abc] not found");
//!
//! // MailChimp rejected the call, rendered as 400
//! let err = AppError::remote_call("Resource Not Found");
//! assert_eq!(err.code, ErrorCode::RemoteCallFailed);
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::ErrorCode;
pub use types::{AppError, AppResult, ErrorBody, LOCAL_STATE_HEADER};
