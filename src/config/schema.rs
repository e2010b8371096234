//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the model proxy.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Public bucket the viewer's models live in.
pub const DEFAULT_STORAGE_BASE_URL: &str =
    "https://zsipfgtlfnfvmnrohtdo.supabase.co/storage/v1/object/public";

/// Accept header sent on every storage fetch.
pub const DEFAULT_ACCEPT: &str = "model/gltf-binary,application/octet-stream,*/*";

/// Root configuration for the model proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Object storage the models are fetched from.
    pub storage: StorageConfig,

    /// CORS headers merged into every response.
    pub cors: CorsConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Input validation settings.
    pub security: SecurityConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Object storage configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Base URL that `path` is appended to, without a trailing slash.
    pub base_url: String,

    /// Value of the `Accept` header on storage requests.
    pub accept: String,

    /// Honor `HTTP_PROXY`/`HTTPS_PROXY`/`NO_PROXY` for storage requests.
    pub use_system_proxy: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_STORAGE_BASE_URL.to_string(),
            accept: DEFAULT_ACCEPT.to_string(),
            use_system_proxy: true,
        }
    }
}

/// CORS header configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CorsConfig {
    /// `Access-Control-Allow-Origin` value.
    pub allow_origin: String,

    /// `Access-Control-Allow-Headers` value.
    pub allow_headers: String,

    /// `Access-Control-Allow-Methods` value, omitted when unset.
    pub allow_methods: Option<String>,

    /// `Access-Control-Max-Age` in seconds, omitted when unset.
    pub max_age_secs: Option<u64>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allow_origin: "*".to_string(),
            allow_headers: "authorization, x-client-info, apikey, content-type".to_string(),
            allow_methods: None,
            max_age_secs: None,
        }
    }
}

/// Timeouts for the storage client. Unset means no timeout.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Connection establishment timeout in seconds.
    pub connect_secs: Option<u64>,

    /// Total time for a storage fetch, body included, in seconds.
    pub upstream_secs: Option<u64>,
}

/// Input validation configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct SecurityConfig {
    /// Reject `path` values that could escape the storage namespace.
    ///
    /// Off by default: the path is appended to the base URL verbatim.
    pub strict_path_validation: bool,
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error), used when RUST_LOG is unset.
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ProxyConfig::default();
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert_eq!(config.storage.base_url, DEFAULT_STORAGE_BASE_URL);
        assert_eq!(config.storage.accept, DEFAULT_ACCEPT);
        assert_eq!(config.cors.allow_origin, "*");
        assert!(config.timeouts.upstream_secs.is_none());
        assert!(!config.security.strict_path_validation);
        assert!(!config.observability.metrics_enabled);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: ProxyConfig = toml::from_str(
            r#"
            [storage]
            base_url = "http://127.0.0.1:9000/public"

            [observability]
            log_format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.storage.base_url, "http://127.0.0.1:9000/public");
        assert_eq!(config.storage.accept, DEFAULT_ACCEPT);
        assert_eq!(config.observability.log_format, LogFormat::Json);
        assert_eq!(config.observability.log_level, "info");
    }
}
