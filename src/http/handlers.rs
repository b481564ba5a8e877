//! Demo shop endpoint handlers.
//!
//! Request bodies are never read; every endpoint answers with a literal
//! payload (purchase picks one of two).

use axum::{
    extract::State,
    http::{header, HeaderMap},
    response::{IntoResponse, Response},
    Json,
};
use metrics_exporter_prometheus::PrometheusHandle;

use crate::http::request::request_id;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::shop::{LoginResponse, PurchaseOutcome, UserProfile, LIVENESS_TEXT};

/// Content type of the Prometheus text exposition format.
pub const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// `GET /`
pub async fn liveness() -> &'static str {
    LIVENESS_TEXT
}

/// `POST /login`
pub async fn login() -> Json<LoginResponse> {
    Json(LoginResponse::demo())
}

/// `POST /purchase`
pub async fn purchase(State(state): State<AppState>, headers: HeaderMap) -> PurchaseOutcome {
    let outcome = PurchaseOutcome::decide(state.purchase.success_rate, &mut rand::thread_rng());
    metrics::record_purchase(outcome.label());

    tracing::debug!(
        request_id = %request_id(&headers),
        outcome = outcome.label(),
        "Purchase handled"
    );
    outcome
}

/// `GET /user/profile`
pub async fn profile() -> Json<UserProfile> {
    Json(UserProfile::demo())
}

/// `GET /metrics` (path configurable)
pub async fn scrape(State(handle): State<PrometheusHandle>) -> Response {
    (
        [(header::CONTENT_TYPE, PROMETHEUS_CONTENT_TYPE)],
        metrics::render(&handle),
    )
        .into_response()
}
