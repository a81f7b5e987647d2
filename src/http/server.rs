//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router that sends every path and method to the gateway
//! - Wire up middleware (tracing, request ID)
//! - Translate axum requests into `InboundRequest` and `ProxyResponse` back
//! - Enforce the inbound body limit, declared or not
//! - Relay upstream bodies byte for byte
//! - Serve until the shutdown signal fires

use std::error::Error as _;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderName, HeaderValue, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use http_body_util::LengthLimitError;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::http::request::{request_id_header, InboundRequest, MakeRequestUuid};
use crate::http::response::ProxyResponse;
use crate::lifecycle::shutdown::wait as wait_for_shutdown;
use crate::proxy::{Gateway, GatewaySettings};
use crate::security::headers::is_transport_header;
use crate::upstream::Upstream;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<Gateway>,
    pub max_body_size: usize,
}

/// HTTP server hosting the gateway.
pub struct HttpServer {
    router: Router,
    config: GatewayConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: GatewayConfig, upstream: Arc<dyn Upstream>) -> Self {
        let mut settings = GatewaySettings::from_config(&config);
        settings.raw_bodies = true;
        let gateway = Arc::new(Gateway::new(settings, upstream));

        let state = AppState {
            gateway,
            max_body_size: config.security.max_body_size,
        };

        let router = Self::build_router(state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/", any(gateway_handler))
            .route("/{*path}", any(gateway_handler))
            .with_state(state)
            .layer(PropagateRequestIdLayer::new(request_id_header()))
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::new(request_id_header(), MakeRequestUuid))
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            mount_path = %self.config.upstream.mount_path,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(wait_for_shutdown(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// The router, for driving the server without a socket.
    pub fn into_router(self) -> Router {
        self.router
    }
}

/// Single handler for every route.
async fn gateway_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let request_id = request
        .headers()
        .get(request_id_header())
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    tracing::debug!(
        request_id = %request_id,
        method = %request.method(),
        path = %request.uri().path(),
        "Handling request"
    );

    let response = match read_inbound(request, state.max_body_size).await {
        Ok(inbound) => state.gateway.handle(inbound).await,
        Err(e) => state.gateway.fail(e),
    };

    write_response(response)
}

/// Convert an axum request into the gateway's inbound form.
async fn read_inbound(request: Request<Body>, limit: usize) -> Result<InboundRequest, GatewayError> {
    let (parts, body) = request.into_parts();

    let declared_len = parts
        .headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<usize>().ok());
    if declared_len.is_some_and(|len| len > limit) {
        return Err(GatewayError::PayloadTooLarge { limit });
    }

    let bytes = axum::body::to_bytes(body, limit).await.map_err(|e| {
        if exceeds_limit(&e) {
            GatewayError::PayloadTooLarge { limit }
        } else {
            GatewayError::InvalidBody(e.to_string())
        }
    })?;

    let headers = parts
        .headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                Some(String::from_utf8_lossy(value.as_bytes()).into_owned()),
            )
        })
        .collect();

    Ok(InboundRequest {
        method: parts.method.as_str().to_string(),
        path: parts.uri.path().to_string(),
        raw_query: parts.uri.query().unwrap_or_default().to_string(),
        headers,
        body: (!bytes.is_empty()).then(|| bytes.to_vec()),
        body_is_base64: false,
    })
}

/// Whether a body read failed because it ran past the size limit.
fn exceeds_limit(error: &axum::Error) -> bool {
    let mut source = error.source();
    while let Some(e) = source {
        if e.is::<LengthLimitError>() {
            return true;
        }
        source = e.source();
    }
    false
}

/// Convert a gateway response into an axum response.
///
/// Base64 bodies go out as raw bytes; HTTP carries binary natively.
fn write_response(response: ProxyResponse) -> Response {
    let bytes = match response.body_bytes() {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::error!(error = %e, "Response body is not valid base64");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let mut out = Response::new(Body::from(bytes));
    *out.status_mut() = StatusCode::from_u16(response.status).unwrap_or(StatusCode::BAD_GATEWAY);

    let headers = out.headers_mut();
    for (name, value) in &response.headers {
        if is_transport_header(name) {
            continue;
        }
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                headers.append(name, value);
            }
            _ => tracing::warn!(header = %name, "Dropping invalid response header"),
        }
    }

    out
}
