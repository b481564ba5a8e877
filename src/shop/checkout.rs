//! Purchase decision.
//!
//! A purchase either completes or is declined with 402 Payment Required,
//! decided by one random draw against the configured success rate.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rand::Rng;

use crate::shop::types::{PurchaseDeclined, PurchaseReceipt};

/// Result of a purchase attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PurchaseOutcome {
    Completed(PurchaseReceipt),
    Declined(PurchaseDeclined),
}

impl PurchaseOutcome {
    /// Draw an outcome. `success_rate` must lie in `0.0..=1.0`
    /// (guaranteed by config validation).
    pub fn decide<R: Rng + ?Sized>(success_rate: f64, rng: &mut R) -> Self {
        if rng.gen_bool(success_rate) {
            PurchaseOutcome::Completed(PurchaseReceipt::demo())
        } else {
            PurchaseOutcome::Declined(PurchaseDeclined::demo())
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            PurchaseOutcome::Completed(_) => StatusCode::OK,
            PurchaseOutcome::Declined(_) => StatusCode::PAYMENT_REQUIRED,
        }
    }

    /// Label value used for the `purchases_total` counter.
    pub fn label(&self) -> &'static str {
        match self {
            PurchaseOutcome::Completed(_) => "completed",
            PurchaseOutcome::Declined(_) => "declined",
        }
    }
}

impl IntoResponse for PurchaseOutcome {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            PurchaseOutcome::Completed(receipt) => (status, Json(receipt)).into_response(),
            PurchaseOutcome::Declined(declined) => (status, Json(declined)).into_response(),
        }
    }
}
