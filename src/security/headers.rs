//! Header sanitization in both directions.
//!
//! # Responsibilities
//! - Strip connection-management headers before forwarding upstream
//! - Strip `content-length` from upstream responses
//! - Merge the CORS header set into every response
//!
//! # Design Decisions
//! - Names compare case-insensitively; surviving headers keep their casing
//! - Blocked sets are fixed statics, never rebuilt per request
//! - CORS headers win over upstream headers of the same name

use crate::security::cors::CorsHeaders;

/// Request headers the HTTP client must recompute or must not see.
static BLOCKED_REQUEST_HEADERS: &[&str] = &["connection", "host", "content-length"];

/// Response headers recomputed from the final encoded body.
static BLOCKED_RESPONSE_HEADERS: &[&str] = &["content-length"];

/// Headers owned by the server transport when writing a response.
static TRANSPORT_HEADERS: &[&str] = &["connection", "keep-alive", "transfer-encoding"];

fn contains_ignore_case(set: &[&str], name: &str) -> bool {
    set.iter().any(|blocked| blocked.eq_ignore_ascii_case(name))
}

/// Build the outbound header list from inbound headers.
///
/// Entries with an absent or empty value are dropped, as are `connection`,
/// `host` and `content-length` in any casing.
pub fn filter_request_headers<I>(headers: I) -> Vec<(String, String)>
where
    I: IntoIterator<Item = (String, Option<String>)>,
{
    headers
        .into_iter()
        .filter_map(|(name, value)| match value {
            Some(value) if !value.is_empty() => Some((name, value)),
            _ => None,
        })
        .filter(|(name, _)| !contains_ignore_case(BLOCKED_REQUEST_HEADERS, name))
        .collect()
}

/// Build the final response header list from upstream headers.
///
/// The CORS set comes first; upstream headers follow minus `content-length`
/// and minus anything that would collide with a CORS header.
pub fn filter_response_headers<I>(headers: I, cors: &CorsHeaders) -> Vec<(String, String)>
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut merged = cors.to_headers();
    merged.extend(headers.into_iter().filter(|(name, _)| {
        !contains_ignore_case(BLOCKED_RESPONSE_HEADERS, name) && !CorsHeaders::is_cors_header(name)
    }));
    merged
}

/// Whether the server transport manages this header itself.
pub fn is_transport_header(name: &str) -> bool {
    contains_ignore_case(TRANSPORT_HEADERS, name)
}
