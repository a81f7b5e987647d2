//! Per-request forwarding pipeline.

use std::sync::Arc;
use std::time::Instant;

use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::http::request::{should_forward_body, InboundRequest};
use crate::http::response::ProxyResponse;
use crate::observability::metrics;
use crate::proxy::target::{resolve_target_url, strip_mount_prefix};
use crate::security::headers::filter_request_headers;
use crate::security::CorsHeaders;
use crate::upstream::{OutboundRequest, Upstream};

/// Settings the pipeline needs, extracted from [`GatewayConfig`] at startup.
#[derive(Debug, Clone)]
pub struct GatewaySettings {
    /// Backend base URL; `None` answers every forwarded request with 500.
    pub backend_url: Option<String>,
    pub mount_path: String,
    pub cors: CorsHeaders,
    /// Relay upstream bodies byte for byte instead of decoding textual ones.
    /// Set by adapters whose transport carries binary natively.
    pub raw_bodies: bool,
}

impl GatewaySettings {
    pub fn from_config(config: &GatewayConfig) -> Self {
        Self {
            backend_url: config
                .upstream
                .backend_url
                .clone()
                .filter(|url| !url.is_empty()),
            mount_path: config.upstream.mount_path.clone(),
            cors: CorsHeaders::from_config(&config.cors),
            raw_bodies: false,
        }
    }
}

/// Stateless gateway shared by every request.
pub struct Gateway {
    settings: GatewaySettings,
    upstream: Arc<dyn Upstream>,
}

impl Gateway {
    pub fn new(settings: GatewaySettings, upstream: Arc<dyn Upstream>) -> Self {
        Self { settings, upstream }
    }

    /// Turn one inbound request into a response. Never fails.
    pub async fn handle(&self, request: InboundRequest) -> ProxyResponse {
        let start = Instant::now();
        let method = request.method.clone();

        let response = if request.is_preflight() {
            tracing::debug!(path = %request.path, "Answering preflight");
            ProxyResponse::preflight(&self.settings.cors)
        } else {
            match self.forward(request).await {
                Ok(response) => response,
                Err(e) => self.fail(e),
            }
        };

        metrics::record_request(&method, response.status, start);
        response
    }

    /// Map a failure to its JSON response.
    pub fn fail(&self, error: GatewayError) -> ProxyResponse {
        match &error {
            GatewayError::Upstream { .. } => {
                metrics::record_upstream_failure();
                tracing::error!(error = %error, "Upstream request failed");
            }
            GatewayError::ConfigurationMissing => {
                tracing::error!("Backend base URL is not configured");
            }
            _ => tracing::warn!(error = %error, "Rejecting request"),
        }
        error.into_response(&self.settings.cors)
    }

    async fn forward(&self, request: InboundRequest) -> Result<ProxyResponse, GatewayError> {
        let base = self
            .settings
            .backend_url
            .as_deref()
            .ok_or(GatewayError::ConfigurationMissing)?;

        let body = request.decoded_body()?;
        let suffix = strip_mount_prefix(&request.path, &self.settings.mount_path);
        let url = resolve_target_url(base, suffix, &request.raw_query);

        let outbound = OutboundRequest {
            body: if should_forward_body(&request.method) {
                body
            } else {
                None
            },
            method: request.method,
            url,
            headers: filter_request_headers(request.headers),
        };

        tracing::debug!(
            method = %outbound.method,
            url = %outbound.url,
            has_body = outbound.body.is_some(),
            "Forwarding request"
        );

        let upstream = self.upstream.send(outbound).await?;
        Ok(if self.settings.raw_bodies {
            ProxyResponse::from_upstream_bytes(upstream, &self.settings.cors)
        } else {
            ProxyResponse::from_upstream(upstream, &self.settings.cors)
        })
    }
}
