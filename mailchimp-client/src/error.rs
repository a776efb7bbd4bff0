//! Remote call error types

use serde::Deserialize;
use thiserror::Error;

/// Per-field error entry of a MailChimp problem-detail body
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ApiFieldError {
    #[serde(default)]
    pub field: String,
    #[serde(default)]
    pub message: String,
}

/// Any failure talking to MailChimp
#[derive(Debug, Error)]
pub enum RemoteCallError {
    /// Transport failure or timeout
    #[error("MailChimp request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// MailChimp answered with a 4xx/5xx status
    #[error("{message}")]
    Api {
        status: u16,
        title: Option<String>,
        message: String,
        errors: Vec<ApiFieldError>,
    },

    /// Response body did not have the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The entity (or its owning list) was never created remotely
    #[error("{kind}[{id}] is not synced with MailChimp")]
    NotSynced { kind: &'static str, id: String },

    /// API key has no data-center suffix and no base URL was given
    #[error("Invalid MailChimp API key: missing data center suffix")]
    InvalidApiKey,
}

impl RemoteCallError {
    pub fn not_synced(kind: &'static str, id: impl Into<String>) -> Self {
        Self::NotSynced { kind, id: id.into() }
    }

    /// HTTP status MailChimp answered with, if it answered
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Http(e) if e.is_timeout())
    }
}

/// Result type for gateway operations
pub type RemoteResult<T> = Result<T, RemoteCallError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_displays_message_only() {
        let err = RemoteCallError::Api {
            status: 400,
            title: Some("Member Exists".into()),
            message: "a@b.com is already a list member.".into(),
            errors: vec![],
        };
        assert_eq!(err.to_string(), "a@b.com is already a list member.");
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn test_not_synced_message() {
        let err = RemoteCallError::not_synced("MailChimpList", "abc");
        assert_eq!(err.to_string(), "MailChimpList[abc] is not synced with MailChimp");
        assert_eq!(err.status(), None);
        assert!(!err.is_timeout());
    }
}
