//! Shared types for the MailChimp bridge
//!
//! Common types used across the workspace crates: the unified error system,
//! the List/Member entity models and the declarative validation rules they
//! are checked against before anything reaches the store or MailChimp.

pub mod error;
pub mod models;
pub mod validation;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{AppError, AppResult, ErrorCode};
pub use models::{MailChimpEntity, MailChimpList, MailChimpMember};
pub use validation::{FieldErrors, RuleSet};
