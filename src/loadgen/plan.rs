//! What to request next and how long to wait.

use std::fmt;
use std::time::Duration;

use rand::seq::SliceRandom;
use rand::Rng;
use reqwest::Method;
use serde_json::{json, Value};

/// One of the demo shop's endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Login,
    Purchase,
    Profile,
    Root,
}

impl Endpoint {
    pub const ALL: [Endpoint; 4] = [
        Endpoint::Login,
        Endpoint::Purchase,
        Endpoint::Profile,
        Endpoint::Root,
    ];

    /// Pick an endpoint uniformly at random.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        *Self::ALL.choose(rng).unwrap_or(&Endpoint::Root)
    }

    pub fn method(self) -> Method {
        match self {
            Endpoint::Login | Endpoint::Purchase => Method::POST,
            Endpoint::Profile | Endpoint::Root => Method::GET,
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            Endpoint::Login => "/login",
            Endpoint::Purchase => "/purchase",
            Endpoint::Profile => "/user/profile",
            Endpoint::Root => "/",
        }
    }

    /// Body sent with POST requests. The server ignores it.
    pub fn payload(self) -> Option<Value> {
        match self {
            Endpoint::Login => Some(json!({"username": "demo", "password": "demo"})),
            Endpoint::Purchase => Some(json!({"item_id": "coffee-beans", "quantity": 1})),
            Endpoint::Profile | Endpoint::Root => None,
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method(), self.path())
    }
}

/// Uniformly random delay in `[min_ms, max_ms]`.
///
/// Bounds are swapped if given in the wrong order.
pub fn sample_delay<R: Rng + ?Sized>(min_ms: u64, max_ms: u64, rng: &mut R) -> Duration {
    let (lo, hi) = if min_ms <= max_ms {
        (min_ms, max_ms)
    } else {
        (max_ms, min_ms)
    };
    Duration::from_millis(rng.gen_range(lo..=hi))
}
