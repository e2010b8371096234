//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses and the storage base URL
//! - Check that CORS values can be sent as header values
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use axum::http::HeaderValue;
use thiserror::Error;
use url::Url;

use crate::config::schema::ProxyConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid {field} '{value}': not a socket address")]
    InvalidAddress { field: &'static str, value: String },

    #[error("invalid storage.base_url '{value}': {reason}")]
    InvalidBaseUrl { value: String, reason: String },

    #[error("invalid {field}: not a valid header value")]
    InvalidHeaderValue { field: &'static str },

    #[error("{field} must be greater than zero")]
    ZeroTimeout { field: &'static str },
}

/// Check a parsed configuration for semantic errors.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_address(&mut errors, "listener.bind_address", &config.listener.bind_address);
    if config.observability.metrics_enabled {
        check_address(
            &mut errors,
            "observability.metrics_address",
            &config.observability.metrics_address,
        );
    }

    match Url::parse(&config.storage.base_url) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {
            if url.cannot_be_a_base() {
                errors.push(ValidationError::InvalidBaseUrl {
                    value: config.storage.base_url.clone(),
                    reason: "cannot be used as a base".to_string(),
                });
            }
        }
        Ok(url) => errors.push(ValidationError::InvalidBaseUrl {
            value: config.storage.base_url.clone(),
            reason: format!("unsupported scheme '{}'", url.scheme()),
        }),
        Err(e) => errors.push(ValidationError::InvalidBaseUrl {
            value: config.storage.base_url.clone(),
            reason: e.to_string(),
        }),
    }

    check_header(&mut errors, "storage.accept", &config.storage.accept);
    check_header(&mut errors, "cors.allow_origin", &config.cors.allow_origin);
    check_header(&mut errors, "cors.allow_headers", &config.cors.allow_headers);
    if let Some(methods) = &config.cors.allow_methods {
        check_header(&mut errors, "cors.allow_methods", methods);
    }

    if config.timeouts.connect_secs == Some(0) {
        errors.push(ValidationError::ZeroTimeout { field: "timeouts.connect_secs" });
    }
    if config.timeouts.upstream_secs == Some(0) {
        errors.push(ValidationError::ZeroTimeout { field: "timeouts.upstream_secs" });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_address(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
}

fn check_header(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if HeaderValue::from_str(value).is_err() {
        errors.push(ValidationError::InvalidHeaderValue { field });
    }
}
