//! Gateway trait and resource paths

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::{RemoteCallError, RemoteResult};

/// Remote side of the local/remote consistency procedure
///
/// Paths are relative to the API root (`lists`, `lists/{id}/members`, ...).
#[async_trait]
pub trait MailChimpGateway: Send + Sync {
    /// Create a resource; the response carries the new `id`
    async fn post(&self, path: &str, body: &Map<String, Value>) -> RemoteResult<Value>;

    /// Partially update a resource
    async fn patch(&self, path: &str, body: &Map<String, Value>) -> RemoteResult<Value>;

    async fn delete(&self, path: &str) -> RemoteResult<()>;
}

/// Extract the `id` MailChimp assigned in a create response
pub fn created_id(response: &Value) -> RemoteResult<String> {
    response
        .get("id")
        .and_then(Value::as_str)
        .map(String::from)
        .ok_or_else(|| RemoteCallError::InvalidResponse(format!("missing id in {response}")))
}

/// Resource paths of the lists API
pub mod paths {
    pub fn lists() -> String {
        "lists".to_string()
    }

    pub fn list(list_id: &str) -> String {
        format!("lists/{list_id}")
    }

    pub fn members(list_id: &str) -> String {
        format!("lists/{list_id}/members")
    }

    pub fn member(list_id: &str, member_id: &str) -> String {
        format!("lists/{list_id}/members/{member_id}")
    }
}
