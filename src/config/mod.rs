//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ShopConfig (validated, immutable)
//!     → CLI flags override individual fields
//!     → shared via Arc with the HTTP handlers
//! ```
//!
//! # Design Decisions
//! - All fields have defaults to allow minimal (or absent) configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    ListenerConfig, LogFormat, ObservabilityConfig, PurchaseConfig, ShopConfig, TimeoutConfig,
};
pub use validation::{validate_config, ValidationError};
