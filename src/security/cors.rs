//! Cross-origin response headers.

use crate::config::CorsConfig;

pub const ACCESS_CONTROL_ALLOW_ORIGIN: &str = "Access-Control-Allow-Origin";
pub const ACCESS_CONTROL_ALLOW_HEADERS: &str = "Access-Control-Allow-Headers";
pub const ACCESS_CONTROL_ALLOW_METHODS: &str = "Access-Control-Allow-Methods";

/// Request headers browsers may send cross-origin.
pub const ALLOWED_HEADERS: &str = "Content-Type, Authorization";
/// Methods browsers may use cross-origin.
pub const ALLOWED_METHODS: &str = "GET,POST,PUT,PATCH,DELETE,OPTIONS";

static CORS_HEADER_NAMES: &[&str] = &[
    ACCESS_CONTROL_ALLOW_ORIGIN,
    ACCESS_CONTROL_ALLOW_HEADERS,
    ACCESS_CONTROL_ALLOW_METHODS,
];

/// The fixed CORS header set attached to every gateway response.
///
/// Only the allowed origin is configurable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorsHeaders {
    allow_origin: String,
}

impl CorsHeaders {
    pub fn new(allow_origin: impl Into<String>) -> Self {
        Self {
            allow_origin: allow_origin.into(),
        }
    }

    pub fn from_config(config: &CorsConfig) -> Self {
        Self::new(config.allow_origin.clone())
    }

    pub fn allow_origin(&self) -> &str {
        &self.allow_origin
    }

    /// Header name/value pairs in a stable order.
    pub fn to_headers(&self) -> Vec<(String, String)> {
        vec![
            (
                ACCESS_CONTROL_ALLOW_ORIGIN.to_string(),
                self.allow_origin.clone(),
            ),
            (
                ACCESS_CONTROL_ALLOW_HEADERS.to_string(),
                ALLOWED_HEADERS.to_string(),
            ),
            (
                ACCESS_CONTROL_ALLOW_METHODS.to_string(),
                ALLOWED_METHODS.to_string(),
            ),
        ]
    }

    /// Whether `name` is one of the CORS headers, ignoring case.
    pub fn is_cors_header(name: &str) -> bool {
        CORS_HEADER_NAMES.iter().any(|h| h.eq_ignore_ascii_case(name))
    }
}

impl Default for CorsHeaders {
    fn default() -> Self {
        Self::new("*")
    }
}
