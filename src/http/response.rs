//! Response construction.
//!
//! # Responsibilities
//! - Build the model response (binary body, content headers)
//! - Define the JSON error envelope shared by every error path

use axum::{
    body::{Body, Bytes},
    http::{
        header::{CACHE_CONTROL, CONTENT_DISPOSITION, CONTENT_TYPE},
        HeaderValue, StatusCode,
    },
    response::Response,
};
use serde::{Deserialize, Serialize};

use crate::proxy::error::ProxyError;

/// Content type of proxied models.
pub const MODEL_CONTENT_TYPE: &str = "model/gltf-binary";

/// Models are addressed by immutable paths, so clients may cache for a year.
pub const MODEL_CACHE_CONTROL: &str = "public, max-age=31536000, immutable";

/// JSON body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,

    #[serde(default, rename = "statusText", skip_serializing_if = "Option::is_none")]
    pub status_text: Option<String>,
}

impl ErrorBody {
    /// Envelope carrying only a message.
    pub fn message(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            status: None,
            status_text: None,
        }
    }

    /// Envelope describing a failed storage response.
    pub fn upstream(error: impl Into<String>, status: StatusCode) -> Self {
        Self {
            error: error.into(),
            status: Some(status.as_u16()),
            status_text: Some(status.canonical_reason().unwrap_or_default().to_string()),
        }
    }
}

/// Wrap a model body with its content headers.
pub fn model_response(body: Bytes, file_name: &str) -> Result<Response, ProxyError> {
    let disposition = HeaderValue::from_str(&format!("inline; filename=\"{file_name}\""))?;

    let mut response = Response::new(Body::from(body));
    let headers = response.headers_mut();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(MODEL_CONTENT_TYPE));
    headers.insert(CONTENT_DISPOSITION, disposition);
    headers.insert(CACHE_CONTROL, HeaderValue::from_static(MODEL_CACHE_CONTROL));
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_model_response_headers() {
        let response = model_response(Bytes::from_static(b"glTF\x02\x00\x00\x00"), "chair.glb").unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(headers[CONTENT_TYPE], "model/gltf-binary");
        assert_eq!(headers[CONTENT_DISPOSITION], "inline; filename=\"chair.glb\"");
        assert_eq!(headers[CACHE_CONTROL], "public, max-age=31536000, immutable");

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"glTF\x02\x00\x00\x00");
    }

    #[test]
    fn test_model_response_rejects_control_characters() {
        let err = model_response(Bytes::new(), "chair\n.glb").unwrap_err();
        assert!(matches!(err, ProxyError::Header(_)));
    }

    #[test]
    fn test_model_response_keeps_utf8_file_name() {
        let response = model_response(Bytes::new(), "椅.glb").unwrap();
        assert_eq!(
            response.headers()[CONTENT_DISPOSITION].as_bytes(),
            "inline; filename=\"椅.glb\"".as_bytes()
        );
    }

    #[test]
    fn test_message_envelope_omits_status() {
        let json = serde_json::to_string(&ErrorBody::message("boom")).unwrap();
        assert_eq!(json, r#"{"error":"boom"}"#);
    }

    #[test]
    fn test_unknown_status_has_empty_text() {
        let status = StatusCode::from_u16(599).unwrap();
        let body = ErrorBody::upstream("Failed to fetch model", status);
        assert_eq!(body.status, Some(599));
        assert_eq!(body.status_text.as_deref(), Some(""));
    }
}
