//! Configuration validation.
//!
//! Serde handles syntax; this module checks values. Validation is a pure
//! function `GatewayConfig -> Result<(), Vec<ValidationError>>` that reports
//! every problem, not just the first.
//!
//! A missing backend URL is not an error here. The gateway still starts and
//! answers each forwarded request with a 500 until one is configured.

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::GatewayConfig;

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("upstream.backend_url {0:?} is not an absolute URL: {1}")]
    InvalidBackendUrl(String, String),

    #[error("upstream.backend_url {0:?} must use http or https")]
    UnsupportedScheme(String),

    #[error("upstream.mount_path {0:?} must start with '/'")]
    InvalidMountPath(String),

    #[error("{field} {value:?} is not a socket address")]
    InvalidAddress { field: &'static str, value: String },

    #[error("security.max_body_size must be greater than zero")]
    ZeroBodyLimit,
}

/// Check a configuration before it is accepted.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Some(backend_url) = config.upstream.backend_url.as_deref() {
        if !backend_url.is_empty() {
            match Url::parse(backend_url) {
                Ok(url) if matches!(url.scheme(), "http" | "https") => {}
                Ok(_) => errors.push(ValidationError::UnsupportedScheme(backend_url.to_string())),
                Err(e) => errors.push(ValidationError::InvalidBackendUrl(
                    backend_url.to_string(),
                    e.to_string(),
                )),
            }
        }
    }

    if !config.upstream.mount_path.starts_with('/') {
        errors.push(ValidationError::InvalidMountPath(
            config.upstream.mount_path.clone(),
        ));
    }

    check_address(&mut errors, "listener.bind_address", &config.listener.bind_address);
    if config.observability.metrics_enabled {
        check_address(
            &mut errors,
            "observability.metrics_address",
            &config.observability.metrics_address,
        );
    }

    if config.security.max_body_size == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
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
