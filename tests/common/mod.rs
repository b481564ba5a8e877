//! Shared utilities for integration tests.
#![allow(dead_code)]

use std::net::SocketAddr;
use std::time::Duration;

use demo_shop::config::ShopConfig;
use demo_shop::http::HttpServer;
use demo_shop::lifecycle::Shutdown;
use demo_shop::observability::metrics;

/// A demo shop running on an ephemeral port. Dropping it stops the server.
pub struct TestShop {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
}

impl TestShop {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestShop {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start a shop with the given purchase success rate and metrics enabled.
pub async fn start_shop(success_rate: f64) -> TestShop {
    let mut config = ShopConfig::default();
    config.purchase.success_rate = success_rate;
    start_shop_with(config).await
}

pub async fn start_shop_with(mut config: ShopConfig) -> TestShop {
    config.listener.bind_address = "127.0.0.1:0".to_string();
    let handle = if config.observability.metrics_enabled {
        Some(metrics::install().unwrap())
    } else {
        None
    };

    let listener = tokio::net::TcpListener::bind(&config.listener.bind_address)
        .await
        .unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, handle);
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    // Listener is already bound; give the accept loop a moment
    tokio::time::sleep(Duration::from_millis(50)).await;

    TestShop { addr, shutdown }
}

/// An address nothing is listening on.
pub async fn closed_addr() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// Client that never reuses connections, so each request is independent.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

/// Sum every sample of `name` whose labels contain all of `needles`.
pub fn sample_sum(exposition: &str, name: &str, needles: &[&str]) -> f64 {
    exposition
        .lines()
        .filter(|line| line.starts_with(&format!("{}{{", name)))
        .filter(|line| needles.iter().all(|n| line.contains(n)))
        .filter_map(|line| line.rsplit(' ').next())
        .filter_map(|value| value.parse::<f64>().ok())
        .sum()
}
