//! Demo shop domain: fixed payloads and the purchase decision.

pub mod checkout;
pub mod types;

pub use checkout::PurchaseOutcome;
pub use types::{LoginResponse, PurchaseDeclined, PurchaseReceipt, UserProfile, LIVENESS_TEXT};
