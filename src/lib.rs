//! Demo shop: an instrumented web service and the load generator that drives it.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod loadgen;
pub mod observability;
pub mod shop;

pub use config::schema::ShopConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use loadgen::{LoadConfig, LoadGenerator};
