//! Request handling and normalization.
//!
//! # Responsibilities
//! - Hold the host-independent form of an inbound request
//! - Decode bodies the transport delivered as base64
//! - Decide which methods carry a body upstream
//! - Generate request IDs for the HTTP adapter
//!
//! # Design Decisions
//! - Empty bodies are treated as absent
//! - Base64 bodies are decoded leniently: missing padding, embedded
//!   whitespace and the URL-safe alphabet are all accepted
//! - GET and HEAD never forward a body, whatever arrived

use axum::http::{HeaderName, HeaderValue, Request};
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

use crate::error::GatewayError;

/// Header carrying the correlation ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Header name form of [`X_REQUEST_ID`] for the request-id layers.
pub fn request_id_header() -> HeaderName {
    HeaderName::from_static(X_REQUEST_ID)
}

/// Standard alphabet, padding optional, stray trailing bits ignored.
const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Decode base64 the way transports in the wild produce it.
///
/// Whitespace is dropped and URL-safe `-`/`_` map onto `+`/`/`. Anything
/// else outside the alphabet is an error.
pub fn decode_base64_lenient(encoded: &[u8]) -> Result<Vec<u8>, base64::DecodeError> {
    let normalized: Vec<u8> = encoded
        .iter()
        .filter(|b| !b.is_ascii_whitespace())
        .map(|&b| match b {
            b'-' => b'+',
            b'_' => b'/',
            other => other,
        })
        .collect();
    LENIENT_BASE64.decode(normalized)
}

/// Inbound request as handed over by a hosting adapter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InboundRequest {
    /// HTTP method as received.
    pub method: String,
    /// Full path, including the mount prefix.
    pub path: String,
    /// Query string without the leading `?`; empty when there is none.
    pub raw_query: String,
    /// Header names with their original casing; values may be absent.
    pub headers: Vec<(String, Option<String>)>,
    /// Body exactly as the transport delivered it.
    pub body: Option<Vec<u8>>,
    /// The transport encoded `body` as base64.
    pub body_is_base64: bool,
}

impl InboundRequest {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn with_query(mut self, raw_query: impl Into<String>) -> Self {
        self.raw_query = raw_query.into();
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), Some(value.into())));
        self
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self.body_is_base64 = false;
        self
    }

    pub fn with_base64_body(mut self, encoded: impl Into<String>) -> Self {
        self.body = Some(encoded.into().into_bytes());
        self.body_is_base64 = true;
        self
    }

    /// CORS preflight requests never reach the backend.
    pub fn is_preflight(&self) -> bool {
        self.method.eq_ignore_ascii_case("OPTIONS")
    }

    /// Raw body bytes, base64-decoded when the transport flagged them.
    pub fn decoded_body(&self) -> Result<Option<Vec<u8>>, GatewayError> {
        let Some(body) = self.body.as_deref().filter(|b| !b.is_empty()) else {
            return Ok(None);
        };

        if self.body_is_base64 {
            decode_base64_lenient(body)
                .map(Some)
                .map_err(|e| GatewayError::InvalidBody(e.to_string()))
        } else {
            Ok(Some(body.to_vec()))
        }
    }
}

/// Whether a request with `method` carries a body upstream.
pub fn should_forward_body(method: &str) -> bool {
    !(method.eq_ignore_ascii_case("GET") || method.eq_ignore_ascii_case("HEAD"))
}

/// UUID v4 request IDs for `SetRequestIdLayer`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_and_head_never_carry_body() {
        for method in ["GET", "get", "Head", "HEAD"] {
            assert!(!should_forward_body(method), "{method}");
        }
    }

    #[test]
    fn test_other_methods_carry_body() {
        for method in ["POST", "put", "PATCH", "DELETE", "OPTIONS", "PROPFIND"] {
            assert!(should_forward_body(method), "{method}");
        }
    }

    #[test]
    fn test_plain_body_is_preserved_byte_for_byte() {
        let raw = vec![0xff, 0x00, 0xfe, b'{'];
        let request = InboundRequest::new("POST", "/").with_body(raw.clone());
        assert_eq!(request.decoded_body().unwrap(), Some(raw));
    }

    #[test]
    fn test_base64_body_is_decoded() {
        let request = InboundRequest::new("POST", "/").with_base64_body("eyJrIjoidiJ9");
        assert_eq!(
            request.decoded_body().unwrap(),
            Some(br#"{"k":"v"}"#.to_vec())
        );
    }

    #[test]
    fn test_unpadded_base64_body() {
        let request = InboundRequest::new("POST", "/").with_base64_body("eyJrIjoiIn0");
        assert_eq!(request.decoded_body().unwrap(), Some(br#"{"k":""}"#.to_vec()));
    }

    #[test]
    fn test_base64_body_with_line_breaks() {
        let request = InboundRequest::new("POST", "/").with_base64_body("eyJr\nIjoi\r\ndiJ9");
        assert_eq!(
            request.decoded_body().unwrap(),
            Some(br#"{"k":"v"}"#.to_vec())
        );
    }

    #[test]
    fn test_url_safe_base64_body() {
        let request = InboundRequest::new("POST", "/").with_base64_body("_-8");
        assert_eq!(request.decoded_body().unwrap(), Some(vec![0xff, 0xef]));
    }

    #[test]
    fn test_invalid_base64_body() {
        for encoded in ["not base64!", "abcde", "ab*d"] {
            let request = InboundRequest::new("POST", "/").with_base64_body(encoded);
            assert!(
                matches!(request.decoded_body(), Err(GatewayError::InvalidBody(_))),
                "{encoded}"
            );
        }
    }

    #[test]
    fn test_empty_body_is_absent() {
        let request = InboundRequest::new("POST", "/").with_body(Vec::new());
        assert_eq!(request.decoded_body().unwrap(), None);
    }

    #[test]
    fn test_preflight_detection() {
        assert!(InboundRequest::new("OPTIONS", "/x").is_preflight());
        assert!(!InboundRequest::new("GET", "/x").is_preflight());
    }

    #[test]
    fn test_request_ids_are_unique() {
        let mut maker = MakeRequestUuid;
        let request = Request::new(());
        let a = maker.make_request_id(&request).unwrap();
        let b = maker.make_request_id(&request).unwrap();
        assert_ne!(a.header_value(), b.header_value());
    }
}
