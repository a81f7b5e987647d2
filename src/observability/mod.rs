//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Gateway and HTTP adapter produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stderr (pretty or JSON lines)
//!     → Metrics endpoint (Prometheus scrape, when enabled)
//! ```
//!
//! Request IDs are attached by the HTTP adapter and show up in the
//! `TraceLayer` spans.

pub mod logging;
pub mod metrics;

pub use logging::init_logging;
