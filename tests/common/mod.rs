//! Shared utilities for integration testing.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{Path, State},
    http::{header::ACCEPT, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use model_proxy::{HttpServer, ProxyConfig, Shutdown};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Base path the mock storage serves objects under.
pub const STORAGE_PREFIX: &str = "/storage/v1/object/public";

/// A mock object-storage backend.
#[derive(Clone, Default)]
pub struct MockStorage {
    objects: Arc<HashMap<String, Vec<u8>>>,
    statuses: Arc<HashMap<String, StatusCode>>,
    seen: Arc<Mutex<Vec<SeenRequest>>>,
}

/// A request the mock storage received.
#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub key: String,
    pub accept: Option<String>,
}

impl MockStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` at `key` with status 200.
    pub fn with_object(mut self, key: &str, body: &[u8]) -> Self {
        Arc::make_mut(&mut self.objects).insert(key.to_string(), body.to_vec());
        self
    }

    /// Answer `key` with `status` and an empty body.
    pub fn with_status(mut self, key: &str, status: StatusCode) -> Self {
        Arc::make_mut(&mut self.statuses).insert(key.to_string(), status);
        self
    }

    /// Requests received so far.
    pub fn seen(&self) -> Vec<SeenRequest> {
        self.seen.lock().unwrap().clone()
    }

    /// Bind on an ephemeral port and serve; returns the storage base URL.
    pub async fn start(&self) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let app = Router::new()
            .route(&format!("{STORAGE_PREFIX}/{{*key}}"), get(serve_object))
            .with_state(self.clone());

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        format!("http://{addr}{STORAGE_PREFIX}")
    }
}

async fn serve_object(
    State(storage): State<MockStorage>,
    Path(key): Path<String>,
    headers: HeaderMap,
) -> Response {
    storage.seen.lock().unwrap().push(SeenRequest {
        key: key.clone(),
        accept: headers
            .get(ACCEPT)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
    });

    if let Some(status) = storage.statuses.get(&key) {
        return (*status).into_response();
    }
    match storage.objects.get(&key) {
        Some(body) => body.clone().into_response(),
        None => (StatusCode::NOT_FOUND, "Object not found").into_response(),
    }
}

/// Start a storage that answers every request with `raw` bytes after `delay`,
/// then closes the connection. Returns the storage base URL.
pub async fn start_raw_storage(raw: &'static [u8], delay: Duration) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut request = [0u8; 4096];
                let _ = socket.read(&mut request).await;
                tokio::time::sleep(delay).await;
                let _ = socket.write_all(raw).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    format!("http://{addr}{STORAGE_PREFIX}")
}

/// Base URL of a port with nothing listening on it.
pub async fn closed_storage_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}{STORAGE_PREFIX}")
}

/// Config pointing at `storage_url`.
pub fn config_for(storage_url: &str) -> ProxyConfig {
    let mut config = ProxyConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.storage.base_url = storage_url.to_string();
    config.storage.use_system_proxy = false;
    config
}

/// A running proxy.
pub struct RunningProxy {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
}

impl RunningProxy {
    pub fn url(&self, path_and_query: &str) -> String {
        format!("http://{}{}", self.addr, path_and_query)
    }
}

impl Drop for RunningProxy {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start the proxy on an ephemeral port.
pub async fn start_proxy(config: ProxyConfig) -> RunningProxy {
    let listener = TcpListener::bind(&config.listener.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config).unwrap();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    RunningProxy { addr, shutdown }
}

/// Client that never goes through a system proxy and never pools.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
