//! CORS headers shared by every response.
//!
//! The header set is fixed at startup and merged into whatever the router
//! returns, so preflights, models and errors all carry the same headers.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{
        header::{
            InvalidHeaderValue, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
            ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_MAX_AGE,
        },
        HeaderMap, HeaderValue,
    },
    middleware::Next,
    response::Response,
};

use crate::config::CorsConfig;

/// Pre-validated CORS response headers.
#[derive(Debug, Clone, Default)]
pub struct CorsHeaders {
    headers: HeaderMap,
}

impl CorsHeaders {
    /// Build the header set from configuration.
    pub fn from_config(config: &CorsConfig) -> Result<Self, InvalidHeaderValue> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_str(&config.allow_origin)?,
        );
        headers.insert(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_str(&config.allow_headers)?,
        );
        if let Some(methods) = &config.allow_methods {
            headers.insert(ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_str(methods)?);
        }
        if let Some(max_age) = config.max_age_secs {
            headers.insert(ACCESS_CONTROL_MAX_AGE, HeaderValue::from(max_age));
        }
        Ok(Self { headers })
    }

    /// Copy the CORS headers into `target`, replacing existing values.
    pub fn apply(&self, target: &mut HeaderMap) {
        for (name, value) in &self.headers {
            target.insert(name.clone(), value.clone());
        }
    }

    pub fn len(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }
}

/// Middleware adding the CORS headers to every response.
pub async fn cors_middleware(
    State(cors): State<Arc<CorsHeaders>>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;
    cors.apply(response.headers_mut());
    response
}
