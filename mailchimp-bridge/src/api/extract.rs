//! Request body extractor for attribute maps

use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use serde_json::{Map, Value};
use shared::error::AppError;

/// JSON object body as a raw attribute map
///
/// A missing or blank body reads as an empty map so that a bare `POST`
/// still reaches validation; anything that is not a JSON object is rejected.
#[derive(Debug, Clone, Default)]
pub struct AttributesBody(pub Map<String, Value>);

impl<S> FromRequest<S> for AttributesBody
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::invalid_request(e.body_text()))?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }

        match serde_json::from_slice::<Value>(&bytes) {
            Ok(Value::Object(map)) => Ok(Self(map)),
            Ok(_) => Err(AppError::invalid_request("expected a JSON object")),
            Err(e) => Err(AppError::invalid_request(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use shared::error::ErrorCode;

    async fn extract(body: &'static str) -> Result<AttributesBody, AppError> {
        let req = http::Request::builder().body(Body::from(body)).unwrap();
        AttributesBody::from_request(req, &()).await
    }

    #[tokio::test]
    async fn test_empty_body_is_empty_map() {
        assert!(extract("").await.unwrap().0.is_empty());
        assert!(extract(" \n").await.unwrap().0.is_empty());
    }

    #[tokio::test]
    async fn test_object_body() {
        let AttributesBody(map) = extract(r#"{"status":"subscribed"}"#).await.unwrap();
        assert_eq!(map["status"], "subscribed");
    }

    #[tokio::test]
    async fn test_non_object_body_rejected() {
        let err = extract("[1, 2]").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidRequest);
        assert_eq!(err.message, "Invalid request body: expected a JSON object");

        let err = extract("{not json").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidRequest);
        assert!(err.message.starts_with("Invalid request body: "));
    }
}
