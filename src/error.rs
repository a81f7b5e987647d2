//! Gateway failures and their mapping to responses.
//!
//! Every failure ends as a JSON `{"message": ...}` body with the CORS headers
//! attached; nothing escapes the handler as a dropped connection.

use std::error::Error as StdError;

use thiserror::Error;

use crate::http::response::ProxyResponse;
use crate::security::CorsHeaders;

/// Failure while handling one request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// No backend base URL was configured.
    #[error("Backend base URL is not configured. Set RATE_ATLAS_BACKEND_URL or API_BASE_URL.")]
    ConfigurationMissing,

    /// The inbound body could not be read or decoded.
    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    /// The inbound body exceeded the configured limit.
    #[error("Request body exceeds the {limit} byte limit.")]
    PayloadTooLarge { limit: usize },

    /// Reaching or reading from the backend failed.
    #[error("{}", upstream_message(.detail.as_deref()))]
    Upstream { detail: Option<String> },
}

fn upstream_message(detail: Option<&str>) -> String {
    match detail {
        Some(detail) => format!("Proxy request failed: {detail}"),
        None => "Proxy request failed due to an unknown error.".to_string(),
    }
}

impl GatewayError {
    /// Wrap a client error, flattening its `source()` chain into the detail.
    pub fn upstream(err: &(dyn StdError + 'static)) -> Self {
        let mut parts: Vec<String> = Vec::new();
        let mut current = Some(err);
        while let Some(e) = current {
            let text = e.to_string();
            if !text.is_empty() && !parts.iter().any(|p| p.contains(&text)) {
                parts.push(text);
            }
            current = e.source();
        }

        Self::Upstream {
            detail: (!parts.is_empty()).then(|| parts.join(": ")),
        }
    }

    /// HTTP status reported to the caller.
    pub fn status(&self) -> u16 {
        match self {
            Self::ConfigurationMissing => 500,
            Self::InvalidBody(_) => 400,
            Self::PayloadTooLarge { .. } => 413,
            Self::Upstream { .. } => 502,
        }
    }

    pub fn into_response(self, cors: &CorsHeaders) -> ProxyResponse {
        ProxyResponse::json_message(self.status(), &self.to_string(), cors)
    }
}
