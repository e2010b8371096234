//! Object storage client.
//!
//! # Responsibilities
//! - Build `<base>/<path>` object URLs
//! - Fetch one object per request with the configured `Accept` header
//! - Turn non-2xx answers into [`ProxyError::Upstream`]
//!
//! # Design Decisions
//! - One pooled `reqwest::Client` shared by all requests
//! - No retries; timeouts only when configured
//! - Bodies are buffered so read failures still map to a 500

use std::time::Duration;

use axum::body::Bytes;
use axum::http::{header::ACCEPT, HeaderValue};
use url::Url;

use crate::config::{StorageConfig, TimeoutConfig};
use crate::proxy::error::ProxyError;

/// Client for the public storage bucket.
#[derive(Debug, Clone)]
pub struct StorageClient {
    client: reqwest::Client,
    base_url: String,
    accept: HeaderValue,
}

/// Errors building a [`StorageClient`].
#[derive(Debug, thiserror::Error)]
pub enum StorageClientError {
    #[error("invalid Accept header: {0}")]
    Accept(#[from] axum::http::header::InvalidHeaderValue),

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

impl StorageClient {
    /// Create a client for the configured bucket.
    pub fn new(storage: &StorageConfig, timeouts: &TimeoutConfig) -> Result<Self, StorageClientError> {
        let mut builder = reqwest::Client::builder();
        if !storage.use_system_proxy {
            builder = builder.no_proxy();
        }
        if let Some(secs) = timeouts.connect_secs {
            builder = builder.connect_timeout(Duration::from_secs(secs));
        }
        if let Some(secs) = timeouts.upstream_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
            base_url: storage.base_url.trim_end_matches('/').to_string(),
            accept: HeaderValue::from_str(&storage.accept)?,
        })
    }

    /// Storage base URL, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL of the object at `path`.
    pub fn object_url(&self, path: &str) -> Result<Url, url::ParseError> {
        Url::parse(&format!("{}/{}", self.base_url, path))
    }

    /// Fetch the object at `path` and buffer its body.
    pub async fn fetch(&self, path: &str) -> Result<Bytes, ProxyError> {
        let url = self.object_url(path)?;

        tracing::info!(url = %url, "Proxying model");

        let response = self
            .client
            .get(url)
            .header(ACCEPT, self.accept.clone())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProxyError::Upstream { status });
        }

        Ok(response.bytes().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str) -> StorageClient {
        let storage = StorageConfig {
            base_url: base_url.to_string(),
            ..StorageConfig::default()
        };
        StorageClient::new(&storage, &TimeoutConfig::default()).unwrap()
    }

    #[test]
    fn test_object_url_appends_path() {
        let client = client("https://storage.example.com/storage/v1/object/public/");
        assert_eq!(client.base_url(), "https://storage.example.com/storage/v1/object/public");

        let url = client.object_url("products/products/glb/chair.glb").unwrap();
        assert_eq!(
            url.as_str(),
            "https://storage.example.com/storage/v1/object/public/products/products/glb/chair.glb"
        );
    }

    #[test]
    fn test_object_url_is_not_sanitized() {
        let client = client("https://storage.example.com/storage/v1/object/public");

        let url = client.object_url("../../../../admin?x=1").unwrap();
        assert_eq!(url.as_str(), "https://storage.example.com/admin?x=1");
    }

    #[test]
    fn test_invalid_accept_header() {
        let storage = StorageConfig {
            accept: "model/gltf-binary\n".to_string(),
            ..StorageConfig::default()
        };
        let err = StorageClient::new(&storage, &TimeoutConfig::default()).unwrap_err();
        assert!(matches!(err, StorageClientError::Accept(_)));
    }
}
