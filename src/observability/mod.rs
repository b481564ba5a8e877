//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! HTTP handlers / load generator produce:
//!     → logging.rs (structured log events, pretty or JSON)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout (collected by the container runtime)
//!     → GET /metrics (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through every request span
//! - Metrics are cheap (atomic increments)

pub mod logging;
pub mod metrics;
