//! In-memory gateway for tests

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::Method;
use serde_json::{Map, Value};

use crate::{MailChimpGateway, RemoteCallError, RemoteResult};

/// One call the gateway received
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: Method,
    pub path: String,
    pub body: Option<Map<String, Value>>,
}

/// Gateway double: records every call, answers creates with generated ids
/// (`mc-1`, `mc-2`, ...) and fails every call while a failure is set.
#[derive(Debug, Default)]
pub struct InMemoryGateway {
    calls: Mutex<Vec<RecordedCall>>,
    failure: Mutex<Option<String>>,
    next_id: AtomicU64,
}

impl InMemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every following call with `message` until [`Self::recover`]
    pub fn fail_with(&self, message: impl Into<String>) {
        *self.failure.lock() = Some(message.into());
    }

    pub fn recover(&self) {
        *self.failure.lock() = None;
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    pub fn last_call(&self) -> Option<RecordedCall> {
        self.calls.lock().last().cloned()
    }

    pub fn reset(&self) {
        self.calls.lock().clear();
        self.recover();
    }

    fn record(&self, method: Method, path: &str, body: Option<&Map<String, Value>>) -> RemoteResult<()> {
        self.calls.lock().push(RecordedCall {
            method,
            path: path.to_string(),
            body: body.cloned(),
        });

        match self.failure.lock().as_ref() {
            Some(message) => Err(RemoteCallError::Api {
                status: 400,
                title: Some("Bad Request".to_string()),
                message: message.clone(),
                errors: Vec::new(),
            }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl MailChimpGateway for InMemoryGateway {
    async fn post(&self, path: &str, body: &Map<String, Value>) -> RemoteResult<Value> {
        self.record(Method::POST, path, Some(body))?;

        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let mut response = body.clone();
        response.insert("id".into(), Value::String(format!("mc-{id}")));
        Ok(Value::Object(response))
    }

    async fn patch(&self, path: &str, body: &Map<String, Value>) -> RemoteResult<Value> {
        self.record(Method::PATCH, path, Some(body))?;
        Ok(Value::Object(body.clone()))
    }

    async fn delete(&self, path: &str) -> RemoteResult<()> {
        self.record(Method::DELETE, path, None)
    }
}
