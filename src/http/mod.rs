//! Hosting adapters and the request/response models they exchange.
//!
//! # Data Flow
//! ```text
//! TCP connection                      JSON function event
//!     → server.rs (axum)                  → event.rs (serde)
//!     → request.rs (InboundRequest) ←─────┘
//!     → proxy::Gateway
//!     → response.rs (ProxyResponse) ─────┐
//!     → server.rs (raw bytes)             → event.rs (JSON result)
//! ```

pub mod event;
pub mod request;
pub mod response;
pub mod server;

pub use event::{FunctionEvent, FunctionResult};
pub use request::{InboundRequest, MakeRequestUuid, X_REQUEST_ID};
pub use response::ProxyResponse;
pub use server::HttpServer;
