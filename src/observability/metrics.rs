//! Metrics collection and exposition.
//!
//! # Metrics
//! - `model_proxy_requests_total` (counter): requests by method, status
//! - `model_proxy_request_duration_seconds` (histogram): handler latency
//! - `model_proxy_upstream_bytes_total` (counter): model bytes fetched from storage

use std::net::SocketAddr;
use std::time::Instant;

use axum::http::Method;
use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Label for `method`. Extension methods collapse into `"other"` so clients
/// cannot create unbounded series.
pub fn method_label(method: &Method) -> &'static str {
    match method.as_str() {
        "GET" => "GET",
        "HEAD" => "HEAD",
        "POST" => "POST",
        "PUT" => "PUT",
        "DELETE" => "DELETE",
        "PATCH" => "PATCH",
        "OPTIONS" => "OPTIONS",
        _ => "other",
    }
}

/// Record one handled request.
pub fn record_request(method: &Method, status: u16, start_time: Instant) {
    let method = method_label(method);
    counter!(
        "model_proxy_requests_total",
        "method" => method,
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("model_proxy_request_duration_seconds", "method" => method)
        .record(start_time.elapsed().as_secs_f64());
}

/// Record the size of a model fetched from storage.
pub fn record_upstream_bytes(len: usize) {
    counter!("model_proxy_upstream_bytes_total").increment(len as u64);
}
