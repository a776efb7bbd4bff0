//! reqwest-backed gateway

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::{ApiFieldError, MailChimpConfig, MailChimpGateway, RemoteCallError, RemoteResult};

/// MailChimp problem-detail body (`application/problem+json`)
#[derive(Debug, Default, Deserialize)]
struct ProblemDetail {
    title: Option<String>,
    detail: Option<String>,
    #[serde(default)]
    errors: Vec<ApiFieldError>,
}

/// Gateway talking to the MailChimp Marketing API over HTTPS
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: Client,
    config: MailChimpConfig,
}

impl HttpGateway {
    pub fn new(config: MailChimpConfig) -> RemoteResult<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, self.config.url(path))
            .basic_auth("apikey", Some(&self.config.api_key))
    }

    async fn send(&self, method: Method, path: &str, body: Option<&Map<String, Value>>) -> RemoteResult<Value> {
        tracing::debug!(%method, path, "MailChimp request");

        let mut request = self.request(method.clone(), path);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.inspect_err(|e| {
            tracing::warn!(%method, path, error = %e, "MailChimp request failed");
        })?;
        Self::handle_response(response).await
    }

    /// Map non-2xx answers to [`RemoteCallError::Api`]; empty bodies read as `null`
    async fn handle_response(response: Response) -> RemoteResult<Value> {
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let problem: ProblemDetail = serde_json::from_str(&text).unwrap_or_default();
            let message = problem
                .detail
                .clone()
                .filter(|d| !d.is_empty())
                .or_else(|| problem.title.clone())
                .unwrap_or_else(|| {
                    if text.trim().is_empty() {
                        format!("MailChimp responded with status {}", status.as_u16())
                    } else {
                        text.clone()
                    }
                });

            tracing::warn!(status = status.as_u16(), %message, "MailChimp rejected request");
            return Err(RemoteCallError::Api {
                status: status.as_u16(),
                title: problem.title,
                message,
                errors: problem.errors,
            });
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| RemoteCallError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl MailChimpGateway for HttpGateway {
    async fn post(&self, path: &str, body: &Map<String, Value>) -> RemoteResult<Value> {
        self.send(Method::POST, path, Some(body)).await
    }

    async fn patch(&self, path: &str, body: &Map<String, Value>) -> RemoteResult<Value> {
        self.send(Method::PATCH, path, Some(body)).await
    }

    async fn delete(&self, path: &str) -> RemoteResult<()> {
        self.send(Method::DELETE, path, None).await.map(|_| ())
    }
}
