//! Response encoding for the reply channel.
//!
//! # Responsibilities
//! - Classify upstream bodies as textual or binary by content type
//! - Encode binary bodies as base64 and flag them
//! - Build preflight and JSON error responses
//!
//! # Design Decisions
//! - The reply channel only carries text unless told the body is base64,
//!   so anything not known to be text is encoded
//! - Content types are lowercased before matching
//! - Invalid UTF-8 in textual bodies is replaced, not rejected

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use crate::security::headers::filter_response_headers;
use crate::security::CorsHeaders;
use crate::upstream::UpstreamResponse;

/// Content-type fragments that mark a body as safe to send as text.
static TEXTUAL_CONTENT_TYPES: &[&str] = &[
    "application/json",
    "text/",
    "application/javascript",
    "application/xml",
];

/// Whether a body with this `content-type` value is sent as UTF-8 text.
pub fn is_textual_content_type(content_type: &str) -> bool {
    let content_type = content_type.to_ascii_lowercase();
    TEXTUAL_CONTENT_TYPES
        .iter()
        .any(|textual| content_type.contains(textual))
}

/// Response handed back to the hosting adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    /// UTF-8 text, or base64 when `is_base64_encoded` is set.
    pub body: Option<String>,
    pub is_base64_encoded: bool,
}

impl ProxyResponse {
    /// 204 answer to a CORS preflight.
    pub fn preflight(cors: &CorsHeaders) -> Self {
        Self {
            status: 204,
            headers: cors.to_headers(),
            body: None,
            is_base64_encoded: false,
        }
    }

    /// JSON `{"message": ...}` response with CORS headers.
    pub fn json_message(status: u16, message: &str, cors: &CorsHeaders) -> Self {
        let mut headers = cors.to_headers();
        headers.push(("Content-Type".to_string(), "application/json".to_string()));

        Self {
            status,
            headers,
            body: Some(serde_json::json!({ "message": message }).to_string()),
            is_base64_encoded: false,
        }
    }

    /// Encode an upstream response for the reply channel.
    pub fn from_upstream(upstream: UpstreamResponse, cors: &CorsHeaders) -> Self {
        let textual = upstream
            .header("content-type")
            .is_some_and(is_textual_content_type);

        let body = if textual {
            String::from_utf8_lossy(&upstream.body).into_owned()
        } else {
            BASE64.encode(&upstream.body)
        };

        Self {
            status: upstream.status,
            headers: filter_response_headers(upstream.headers, cors),
            body: Some(body),
            is_base64_encoded: !textual,
        }
    }

    /// Encode an upstream response with its body always base64, so the exact
    /// bytes survive whatever the content type claims.
    pub fn from_upstream_bytes(upstream: UpstreamResponse, cors: &CorsHeaders) -> Self {
        Self {
            status: upstream.status,
            body: Some(BASE64.encode(&upstream.body)),
            headers: filter_response_headers(upstream.headers, cors),
            is_base64_encoded: true,
        }
    }

    /// First value of `name`, ignoring case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Body as raw bytes, undoing the base64 encoding when flagged.
    pub fn body_bytes(&self) -> Result<Vec<u8>, base64::DecodeError> {
        match &self.body {
            None => Ok(Vec::new()),
            Some(body) if self.is_base64_encoded => BASE64.decode(body),
            Some(body) => Ok(body.clone().into_bytes()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upstream(content_type: Option<&str>, body: &[u8]) -> UpstreamResponse {
        let mut headers = vec![("content-length".to_string(), body.len().to_string())];
        if let Some(ct) = content_type {
            headers.push(("content-type".to_string(), ct.to_string()));
        }
        UpstreamResponse {
            status: 200,
            headers,
            body: body.to_vec(),
        }
    }

    #[test]
    fn test_textual_content_types() {
        assert!(is_textual_content_type("application/json"));
        assert!(is_textual_content_type("application/json; charset=utf-8"));
        assert!(is_textual_content_type("text/html"));
        assert!(is_textual_content_type("text/csv"));
        assert!(is_textual_content_type("application/javascript"));
        assert!(is_textual_content_type("application/xml"));
        assert!(is_textual_content_type("application/problem+json; x=application/json"));
    }

    #[test]
    fn test_binary_content_types() {
        assert!(!is_textual_content_type("image/png"));
        assert!(!is_textual_content_type("application/octet-stream"));
        assert!(!is_textual_content_type("application/pdf"));
        assert!(!is_textual_content_type(""));
    }

    #[test]
    fn test_content_type_match_ignores_case() {
        assert!(is_textual_content_type("Application/JSON"));
        assert!(is_textual_content_type("TEXT/PLAIN"));
    }

    #[test]
    fn test_json_body_is_text() {
        let response = ProxyResponse::from_upstream(
            upstream(Some("application/json"), br#"{"a":1}"#),
            &CorsHeaders::default(),
        );

        assert_eq!(response.body.as_deref(), Some(r#"{"a":1}"#));
        assert!(!response.is_base64_encoded);
        assert_eq!(response.header("content-length"), None);
    }

    #[test]
    fn test_png_body_is_base64() {
        let bytes = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0xff];
        let response = ProxyResponse::from_upstream(
            upstream(Some("image/png"), &bytes),
            &CorsHeaders::default(),
        );

        assert!(response.is_base64_encoded);
        assert_eq!(response.body.as_deref(), Some("iVBORw0KGgoA/w=="));
        assert_eq!(response.body_bytes().unwrap(), bytes.to_vec());
    }

    #[test]
    fn test_missing_content_type_is_binary() {
        let response =
            ProxyResponse::from_upstream(upstream(None, b"plain"), &CorsHeaders::default());

        assert!(response.is_base64_encoded);
        assert_eq!(response.body.as_deref(), Some("cGxhaW4="));
    }

    #[test]
    fn test_invalid_utf8_text_is_replaced() {
        let response = ProxyResponse::from_upstream(
            upstream(Some("text/plain"), &[b'o', b'k', 0xff]),
            &CorsHeaders::default(),
        );

        assert_eq!(response.body.as_deref(), Some("ok\u{fffd}"));
        assert!(!response.is_base64_encoded);
    }

    #[test]
    fn test_bytes_mode_keeps_latin1_text_intact() {
        let body = [b'c', b'a', b'f', 0xe9];
        let response = ProxyResponse::from_upstream_bytes(
            upstream(Some("text/html; charset=iso-8859-1"), &body),
            &CorsHeaders::default(),
        );

        assert!(response.is_base64_encoded);
        assert_eq!(response.body_bytes().unwrap(), body.to_vec());
        assert_eq!(response.header("content-type"), Some("text/html; charset=iso-8859-1"));
        assert_eq!(response.header("content-length"), None);
    }

    #[test]
    fn test_status_and_cors_preserved() {
        let mut up = upstream(Some("application/json"), b"{}");
        up.status = 404;
        let response =
            ProxyResponse::from_upstream(up, &CorsHeaders::new("https://app.example.com"));

        assert_eq!(response.status, 404);
        assert_eq!(
            response.header("Access-Control-Allow-Origin"),
            Some("https://app.example.com")
        );
        assert_eq!(
            response.header("Access-Control-Allow-Methods"),
            Some("GET,POST,PUT,PATCH,DELETE,OPTIONS")
        );
        assert_eq!(
            response.header("Access-Control-Allow-Headers"),
            Some("Content-Type, Authorization")
        );
    }

    #[test]
    fn test_preflight() {
        let response = ProxyResponse::preflight(&CorsHeaders::default());
        assert_eq!(response.status, 204);
        assert_eq!(response.body, None);
        assert_eq!(response.headers, CorsHeaders::default().to_headers());
    }

    #[test]
    fn test_json_message_escapes() {
        let response =
            ProxyResponse::json_message(502, "say \"hi\"", &CorsHeaders::default());
        assert_eq!(response.body.as_deref(), Some(r#"{"message":"say \"hi\""}"#));
    }
}
