//! Request metrics middleware.
//! Installed with `route_layer`, so only matched routes are recorded and the
//! matched template is always available. Method labels are bounded by
//! `metrics::method_label`.

use std::time::Instant;

use axum::{
    body::Body,
    extract::MatchedPath,
    http::Request,
    middleware::Next,
    response::Response,
};

use crate::observability::metrics;

pub async fn track_metrics(req: Request<Body>, next: Next) -> Response {
    let Some(path) = req.extensions().get::<MatchedPath>().map(|p| p.as_str().to_owned()) else {
        return next.run(req).await;
    };
    let started = Instant::now();
    let method = req.method().clone();

    let response = next.run(req).await;

    metrics::record_request(method.as_str(), &path, response.status().as_u16(), started);
    response
}
