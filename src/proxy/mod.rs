//! Request forwarding core.
//!
//! # Data Flow
//! ```text
//! InboundRequest
//!     → OPTIONS? answer 204 with CORS headers
//!     → backend configured? else 500
//!     → http/request.rs (decode body, GET/HEAD drop it)
//!     → target.rs (mount prefix stripped, URL joined)
//!     → security/headers.rs (request headers filtered)
//!     → upstream (single call, no retry)
//!     → http/response.rs (headers filtered, CORS merged, body encoded)
//!     → ProxyResponse
//! Any failure on the way → error.rs maps it to a JSON response.
//! ```
//!
//! # Design Decisions
//! - No state survives a request; `Gateway` holds only settings and a client
//! - Settings arrive as a value, never read from the environment here

pub mod gateway;
pub mod target;

pub use gateway::{Gateway, GatewaySettings};
pub use target::{resolve_target_url, strip_mount_prefix};
