//! HTTP client for the backend.

use async_trait::async_trait;
use reqwest::{Client, Method};

use crate::error::GatewayError;
use crate::upstream::{OutboundRequest, Upstream, UpstreamResponse};

/// Backend client over `reqwest`.
///
/// Compressed bodies are decoded by the client, so the encoder always sees
/// the plain bytes. Redirects are followed.
#[derive(Debug, Clone)]
pub struct HttpUpstream {
    client: Client,
}

impl HttpUpstream {
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = Client::builder().build()?;
        Ok(Self::with_client(client))
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Upstream for HttpUpstream {
    async fn send(&self, request: OutboundRequest) -> Result<UpstreamResponse, GatewayError> {
        let method = Method::from_bytes(request.method.as_bytes())
            .map_err(|e| GatewayError::upstream(&e))?;

        let mut builder = self.client.request(method, &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| GatewayError::upstream(&e))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();

        let body = response
            .bytes()
            .await
            .map_err(|e| GatewayError::upstream(&e))?;

        tracing::debug!(status, bytes = body.len(), "Upstream responded");

        Ok(UpstreamResponse {
            status,
            headers,
            body: body.to_vec(),
        })
    }
}
