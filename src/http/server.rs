//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the shop handlers
//! - Wire up middleware (request ID, tracing, timeout, metrics)
//! - Expose the Prometheus scrape endpoint
//! - Serve until the shutdown signal fires

use std::time::Duration;

use axum::{
    body::Body,
    http::Request,
    middleware,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{PurchaseConfig, ShopConfig};
use crate::http::handlers;
use crate::http::middleware::track_metrics;
use crate::http::request::{request_id, UuidRequestId};
use crate::observability::metrics::UPKEEP_INTERVAL;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub purchase: PurchaseConfig,
}

/// HTTP server for the demo shop.
pub struct HttpServer {
    router: Router,
    config: ShopConfig,
    metrics: Option<PrometheusHandle>,
}

impl HttpServer {
    /// Create a new server. The scrape endpoint is only routed when
    /// metrics are enabled and a handle is supplied.
    pub fn new(config: ShopConfig, metrics: Option<PrometheusHandle>) -> Self {
        let metrics = metrics.filter(|_| config.observability.metrics_enabled);
        let state = AppState {
            purchase: config.purchase.clone(),
        };

        let router = Self::build_router(&config, state, metrics.clone());
        Self {
            router,
            config,
            metrics,
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(
        config: &ShopConfig,
        state: AppState,
        metrics: Option<PrometheusHandle>,
    ) -> Router {
        let mut router = Router::new()
            .route("/", get(handlers::liveness))
            .route("/login", post(handlers::login))
            .route("/purchase", post(handlers::purchase))
            .route("/user/profile", get(handlers::profile))
            .route_layer(middleware::from_fn(track_metrics));

        // Added after route_layer so scrapes don't count as traffic
        if let Some(handle) = metrics {
            router = router.route(
                &config.observability.metrics_path,
                get(handlers::scrape).with_state(handle),
            );
        }

        router.with_state(state).layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
                .layer(TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
                    tracing::info_span!(
                        "request",
                        method = %req.method(),
                        uri = %req.uri(),
                        request_id = %request_id(req.headers()),
                    )
                }))
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(TimeoutLayer::new(Duration::from_secs(
                    config.timeouts.request_secs,
                ))),
        )
    }

    /// The fully layered router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server on `listener` until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            metrics_path = ?self.metrics.as_ref().map(|_| self.config.observability.metrics_path.as_str()),
            success_rate = self.config.purchase.success_rate,
            "HTTP server starting"
        );

        let upkeep = self.metrics.clone().map(|handle| {
            tokio::spawn(async move {
                let mut ticker = tokio::time::interval(UPKEEP_INTERVAL);
                loop {
                    ticker.tick().await;
                    handle.run_upkeep();
                }
            })
        });

        let result = axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("HTTP server draining connections");
            })
            .await;

        if let Some(task) = upkeep {
            task.abort();
        }
        result?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
