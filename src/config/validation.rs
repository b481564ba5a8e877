//! Configuration validation.
//!
//! Serde handles syntax; this catches values that parse but cannot work.
//! Every problem is reported, not just the first.

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::ShopConfig;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address '{0}' is not a socket address")]
    BindAddress(String),

    #[error("timeouts.request_secs must be greater than zero")]
    ZeroRequestTimeout,

    #[error("purchase.success_rate {0} is outside 0.0..=1.0")]
    SuccessRate(f64),

    #[error("observability.metrics_path '{0}' must start with '/'")]
    MetricsPath(String),

    #[error("observability.metrics_path '{0}' collides with a shop route")]
    MetricsPathCollision(String),
}

const SHOP_ROUTES: [&str; 4] = ["/", "/login", "/purchase", "/user/profile"];

/// Validate a configuration, collecting every error found.
pub fn validate_config(config: &ShopConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }

    // NaN fails the range check too
    let rate = config.purchase.success_rate;
    if !(0.0..=1.0).contains(&rate) {
        errors.push(ValidationError::SuccessRate(rate));
    }

    let path = &config.observability.metrics_path;
    if config.observability.metrics_enabled {
        if !path.starts_with('/') {
            errors.push(ValidationError::MetricsPath(path.clone()));
        } else if SHOP_ROUTES.contains(&path.as_str()) {
            errors.push(ValidationError::MetricsPathCollision(path.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
