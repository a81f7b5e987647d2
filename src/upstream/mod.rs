//! Upstream (backend) calls.
//!
//! # Data Flow
//! ```text
//! OutboundRequest (url, method, filtered headers, optional body)
//!     → Upstream::send (client.rs: reqwest)
//!     → UpstreamResponse (status, headers, full body)
//!     or GatewayError::Upstream on any network-level failure
//! ```
//!
//! # Design Decisions
//! - Responses are buffered in full; no streaming
//! - No retries and no timeout beyond the client's own defaults
//! - The trait is the seam tests use to stand in for a backend

use async_trait::async_trait;

use crate::error::GatewayError;

pub mod client;

pub use client::HttpUpstream;

/// Request sent to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundRequest {
    pub method: String,
    /// Absolute target URL.
    pub url: String,
    pub headers: Vec<(String, String)>,
    /// Always `None` for GET and HEAD.
    pub body: Option<Vec<u8>>,
}

/// Fully buffered backend response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl UpstreamResponse {
    /// First value of `name`, ignoring case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Something that can answer an outbound request.
#[async_trait]
pub trait Upstream: Send + Sync {
    async fn send(&self, request: OutboundRequest) -> Result<UpstreamResponse, GatewayError>;
}
