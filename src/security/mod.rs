//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound request headers:
//!     → headers.rs (drop connection/host/content-length, empty values)
//!     → forwarded upstream
//!
//! Upstream response headers:
//!     → headers.rs (drop content-length)
//!     → cors.rs (merge Access-Control-* set)
//!     → returned to the caller
//! ```

pub mod cors;
pub mod headers;

pub use cors::CorsHeaders;
