//! Error types for the model proxy and their HTTP mapping.

use axum::{
    http::{header::InvalidHeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::http::response::ErrorBody;
use crate::proxy::path::PathRejection;

/// Everything that can end a model request without a model.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// The `path` query parameter is absent or empty.
    #[error("Missing path parameter. Use ?path=products/products/glb/filename.glb")]
    MissingPath,

    /// Strict path validation refused the `path` parameter.
    #[error("Invalid path parameter: {0}")]
    InvalidPath(#[from] PathRejection),

    /// Storage answered with a non-2xx status.
    #[error("Failed to fetch model")]
    Upstream { status: StatusCode },

    /// The storage request or body read failed.
    #[error(transparent)]
    Request(#[from] reqwest::Error),

    /// `<base>/<path>` is not a valid URL.
    #[error(transparent)]
    Url(#[from] url::ParseError),

    /// A response header could not be built from the path.
    #[error(transparent)]
    Header(#[from] InvalidHeaderValue),
}

impl ProxyError {
    /// Status code sent to the client.
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::MissingPath | ProxyError::InvalidPath(_) => StatusCode::BAD_REQUEST,
            ProxyError::Upstream { status } => *status,
            ProxyError::Request(_) | ProxyError::Url(_) | ProxyError::Header(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// JSON envelope sent to the client.
    pub fn body(&self) -> ErrorBody {
        match self {
            ProxyError::Upstream { status } => ErrorBody::upstream(self.to_string(), *status),
            _ => ErrorBody::message(self.to_string()),
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.body())).into_response()
    }
}
