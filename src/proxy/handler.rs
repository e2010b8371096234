//! The model proxy handler.

use std::time::Instant;

use axum::{
    extract::State,
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Response},
};

use crate::http::response::model_response;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::proxy::error::ProxyError;
use crate::proxy::path::{check_strict, file_name, path_param};

/// Answer preflights, otherwise proxy the model named by `?path=`.
///
/// CORS headers are added by the surrounding middleware, so every branch
/// here only deals with status, body and content headers.
pub async fn proxy_model(State(state): State<AppState>, method: Method, uri: Uri) -> Response {
    let start_time = Instant::now();

    let response = if method == Method::OPTIONS {
        (StatusCode::OK, "ok").into_response()
    } else {
        match serve_model(&state, uri.query()).await {
            Ok(response) => response,
            Err(e) => {
                log_failure(&e);
                e.into_response()
            }
        }
    };

    metrics::record_request(&method, response.status().as_u16(), start_time);
    response
}

async fn serve_model(state: &AppState, query: Option<&str>) -> Result<Response, ProxyError> {
    let path = path_param(query).ok_or(ProxyError::MissingPath)?;

    if state.strict_paths {
        check_strict(&path)?;
    }

    let body = state.storage.fetch(&path).await?;
    metrics::record_upstream_bytes(body.len());

    model_response(body, file_name(&path))
}

fn log_failure(error: &ProxyError) {
    match error {
        ProxyError::MissingPath | ProxyError::InvalidPath(_) => {
            tracing::warn!(error = %error, "Rejected model request");
        }
        ProxyError::Upstream { status } => {
            tracing::warn!(status = %status, "Storage returned an error");
        }
        _ => {
            tracing::error!(error = %error, "Error proxying model");
        }
    }
}
