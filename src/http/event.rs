//! Serverless function event adapter.
//!
//! The function host delivers each request as a JSON event and expects a JSON
//! result back. Field names follow the host's camelCase wire format.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::http::request::InboundRequest;
use crate::http::response::ProxyResponse;

/// Inbound function event.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionEvent {
    pub http_method: String,
    pub path: String,
    #[serde(default)]
    pub raw_query: Option<String>,
    #[serde(default)]
    pub headers: BTreeMap<String, Option<String>>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub is_base64_encoded: bool,
}

/// Function result handed back to the host.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionResult {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    /// Header names that occur more than once, such as `set-cookie`.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub multi_value_headers: BTreeMap<String, Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    pub is_base64_encoded: bool,
}

impl From<FunctionEvent> for InboundRequest {
    fn from(event: FunctionEvent) -> Self {
        InboundRequest {
            method: event.http_method,
            path: event.path,
            raw_query: event.raw_query.unwrap_or_default(),
            headers: event.headers.into_iter().collect(),
            body: event.body.map(String::into_bytes),
            body_is_base64: event.is_base64_encoded,
        }
    }
}

impl From<ProxyResponse> for FunctionResult {
    /// Names seen once go to `headers`; repeated names go to
    /// `multiValueHeaders` with every value kept separate.
    fn from(response: ProxyResponse) -> Self {
        let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (name, value) in response.headers {
            grouped.entry(name).or_default().push(value);
        }

        let mut headers = BTreeMap::new();
        let mut multi_value_headers = BTreeMap::new();
        for (name, mut values) in grouped {
            if values.len() == 1 {
                headers.insert(name, values.remove(0));
            } else {
                multi_value_headers.insert(name, values);
            }
        }

        FunctionResult {
            status_code: response.status,
            headers,
            multi_value_headers,
            body: response.body,
            is_base64_encoded: response.is_base64_encoded,
        }
    }
}
