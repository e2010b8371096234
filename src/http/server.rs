//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the model proxy handler
//! - Wire up middleware (CORS, request ID, tracing)
//! - Bind server to listener
//! - Stop on the shutdown broadcast

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::ConnectInfo,
    http::{header::InvalidHeaderValue, Request},
    middleware,
    routing::any,
    Router,
};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::ProxyConfig;
use crate::http::cors::{cors_middleware, CorsHeaders};
use crate::http::request::{request_id, UuidRequestId, X_REQUEST_ID};
use crate::proxy::handler::proxy_model;
use crate::proxy::storage::{StorageClient, StorageClientError};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<StorageClient>,
    pub strict_paths: bool,
}

/// Errors building the server from configuration.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Storage(#[from] StorageClientError),

    #[error("invalid CORS header: {0}")]
    Cors(#[from] InvalidHeaderValue),
}

/// HTTP server for the model proxy.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ProxyConfig) -> Result<Self, ServerError> {
        let storage = Arc::new(StorageClient::new(&config.storage, &config.timeouts)?);
        let cors = Arc::new(CorsHeaders::from_config(&config.cors)?);

        if !config.security.strict_path_validation {
            tracing::warn!(
                base_url = %storage.base_url(),
                "Strict path validation disabled; any path below the storage host can be requested"
            );
        }

        let state = AppState {
            storage,
            strict_paths: config.security.strict_path_validation,
        };

        Ok(Self {
            router: Self::build_router(state, cors),
        })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState, cors: Arc<CorsHeaders>) -> Router {
        Router::new()
            .route("/", any(proxy_model))
            .route("/{*path}", any(proxy_model))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::new(X_REQUEST_ID, UuidRequestId))
                    .layer(TraceLayer::new_for_http().make_span_with(make_span))
                    .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
                    .layer(middleware::from_fn_with_state(cors, cors_middleware)),
            )
    }

    /// Router with all layers, for serving or in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("HTTP server received shutdown signal");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

fn make_span(request: &Request<Body>) -> tracing::Span {
    let remote = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.to_string())
        .unwrap_or_default();

    tracing::info_span!(
        "request",
        request_id = %request_id(request.headers()),
        method = %request.method(),
        uri = %request.uri(),
        remote = %remote,
    )
}
