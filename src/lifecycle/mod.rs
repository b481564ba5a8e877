//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (binaries):
//!     Load config → Init logging → Install metrics → Bind listener → Serve
//!
//! Shutdown (shutdown.rs):
//!     Signal received → broadcast → stop accepting / stop sending → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
