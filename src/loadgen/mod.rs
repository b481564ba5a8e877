//! Synthetic traffic generator.
//!
//! # Data Flow
//! ```text
//! plan.rs   (random endpoint, random delay)
//!     → runner.rs (send via reqwest, classify, log)
//!     → RunSummary on shutdown
//! ```
//!
//! # Design Decisions
//! - Sequential: one request in flight at a time
//! - No retries or backoff; a failed request is just logged
//! - Runs until told to stop

pub mod plan;
pub mod runner;

pub use plan::{sample_delay, Endpoint};
pub use runner::{LoadConfig, LoadGenError, LoadGenerator, OutcomeKind, RequestOutcome, RunSummary};
