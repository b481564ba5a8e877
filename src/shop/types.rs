//! Response payloads served by the demo shop.
//!
//! Every body is a fixed literal; request bodies are never inspected.

use serde::{Deserialize, Serialize};

/// Body of a `GET /` response.
pub const LIVENESS_TEXT: &str = "demo-shop is running";

/// Body of a `POST /login` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub user_id: u64,
    pub token: String,
}

impl LoginResponse {
    pub fn demo() -> Self {
        Self {
            user_id: 12345,
            token: "demo-session-token".to_string(),
        }
    }
}

/// Body of a `GET /user/profile` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    pub age: u32,
}

impl UserProfile {
    pub fn demo() -> Self {
        Self {
            name: "Jane Doe".to_string(),
            age: 29,
        }
    }
}

/// Body of a completed purchase (200).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseReceipt {
    pub status: String,
    pub purchased_items: Vec<String>,
}

impl PurchaseReceipt {
    pub fn demo() -> Self {
        Self {
            status: "success".to_string(),
            purchased_items: vec!["coffee-beans".to_string(), "grinder".to_string()],
        }
    }
}

/// Body of a declined purchase (402).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseDeclined {
    pub status: String,
    pub error: String,
}

impl PurchaseDeclined {
    pub fn demo() -> Self {
        Self {
            status: "failed".to_string(),
            error: "payment required".to_string(),
        }
    }
}
