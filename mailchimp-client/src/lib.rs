//! MailChimp Client - remote gateway for the MailChimp Marketing API
//!
//! Provides the [`MailChimpGateway`] seam used by the bridge services, the
//! reqwest-backed [`HttpGateway`] and, behind the `testing` feature, an
//! in-memory double that records calls.

pub mod config;
pub mod error;
pub mod gateway;
pub mod http;
#[cfg(any(test, feature = "testing"))]
pub mod memory;

pub use config::MailChimpConfig;
pub use error::{ApiFieldError, RemoteCallError, RemoteResult};
pub use gateway::{MailChimpGateway, created_id, paths};
pub use http::HttpGateway;
pub use reqwest::Method;
#[cfg(any(test, feature = "testing"))]
pub use memory::{InMemoryGateway, RecordedCall};
