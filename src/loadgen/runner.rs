//! The request loop.
//!
//! One request at a time: pick a target and an endpoint, send, log the
//! outcome, sleep a random delay, repeat. Failures of any kind are logged and the loop goes
//! on; only the shutdown signal or `max_requests` ends it.

use std::time::{Duration, Instant};

use rand::seq::SliceRandom;
use reqwest::{Client, Url};
use thiserror::Error;
use tokio::sync::broadcast;

use crate::loadgen::plan::{sample_delay, Endpoint};

/// Load generator settings.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadConfig {
    /// Base URLs of the shop replicas, e.g. `http://localhost:8000`. Each
    /// request goes to one of them, picked at random.
    pub targets: Vec<String>,
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Stop after this many requests. `None` runs until shutdown.
    pub max_requests: Option<u64>,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            targets: vec!["http://localhost:8000".to_string()],
            min_delay_ms: 100,
            max_delay_ms: 1000,
            timeout_secs: 5,
            max_requests: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum LoadGenError {
    #[error("no target URLs given")]
    NoTargets,

    #[error("invalid target URL '{url}': {reason}")]
    Target { url: String, reason: String },

    #[error("min_delay_ms ({min}) exceeds max_delay_ms ({max})")]
    DelayRange { min: u64, max: u64 },

    #[error("timeout_secs must be greater than zero")]
    ZeroTimeout,

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

impl LoadConfig {
    pub fn validate(&self) -> Result<Vec<Url>, LoadGenError> {
        if self.targets.is_empty() {
            return Err(LoadGenError::NoTargets);
        }
        let urls = self
            .targets
            .iter()
            .map(|target| parse_target(target))
            .collect::<Result<Vec<_>, _>>()?;
        if self.min_delay_ms > self.max_delay_ms {
            return Err(LoadGenError::DelayRange {
                min: self.min_delay_ms,
                max: self.max_delay_ms,
            });
        }
        if self.timeout_secs == 0 {
            return Err(LoadGenError::ZeroTimeout);
        }
        Ok(urls)
    }
}

fn parse_target(target: &str) -> Result<Url, LoadGenError> {
    let url = Url::parse(target).map_err(|e| LoadGenError::Target {
        url: target.to_string(),
        reason: e.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(LoadGenError::Target {
            url: target.to_string(),
            reason: format!("unsupported scheme '{}'", url.scheme()),
        });
    }
    Ok(url)
}

/// What happened to one request.
#[derive(Debug, Clone)]
pub struct RequestOutcome {
    /// Base URL the request went to.
    pub target: String,
    pub endpoint: Endpoint,
    /// HTTP status, absent when no response arrived.
    pub status: Option<u16>,
    pub latency: Duration,
    pub body: Option<String>,
    pub error: Option<String>,
}

impl RequestOutcome {
    pub fn kind(&self) -> OutcomeKind {
        match (self.status, &self.error) {
            (Some(status), None) if (200..300).contains(&status) => OutcomeKind::Success,
            (Some(_), None) => OutcomeKind::Rejected,
            _ => OutcomeKind::Error,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeKind {
    /// 2xx response.
    Success,
    /// Any other status, e.g. 402 from a declined purchase.
    Rejected,
    /// Transport failure or unreadable body.
    Error,
}

/// Totals for a finished run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub sent: u64,
    pub succeeded: u64,
    pub rejected: u64,
    pub errors: u64,
}

impl RunSummary {
    pub fn record(&mut self, outcome: &RequestOutcome) {
        self.sent += 1;
        match outcome.kind() {
            OutcomeKind::Success => self.succeeded += 1,
            OutcomeKind::Rejected => self.rejected += 1,
            OutcomeKind::Error => self.errors += 1,
        }
    }
}

/// Sends randomized traffic at the demo shop.
pub struct LoadGenerator {
    client: Client,
    bases: Vec<String>,
    config: LoadConfig,
}

impl LoadGenerator {
    pub fn new(config: LoadConfig) -> Result<Self, LoadGenError> {
        let urls = config.validate()?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            bases: urls
                .iter()
                .map(|url| url.as_str().trim_end_matches('/').to_string())
                .collect(),
            config,
        })
    }

    /// Send one request to a random target. Never fails: errors land in
    /// the outcome.
    pub async fn send(&self, endpoint: Endpoint) -> RequestOutcome {
        let base = self
            .bases
            .choose(&mut rand::thread_rng())
            .cloned()
            .unwrap_or_default();
        let url = format!("{}{}", base, endpoint.path());
        let mut request = self.client.request(endpoint.method(), &url);
        if let Some(payload) = endpoint.payload() {
            request = request.json(&payload);
        }

        let started = Instant::now();
        let (status, body, error) = match request.send().await {
            Ok(response) => {
                let status = response.status().as_u16();
                match response.text().await {
                    Ok(body) => (Some(status), Some(body), None),
                    Err(e) => (Some(status), None, Some(e.to_string())),
                }
            }
            Err(e) => (None, None, Some(e.to_string())),
        };

        RequestOutcome {
            target: base,
            endpoint,
            status,
            latency: started.elapsed(),
            body,
            error,
        }
    }

    /// Run the loop until `shutdown` fires or `max_requests` is reached.
    pub async fn run(&self, mut shutdown: broadcast::Receiver<()>) -> RunSummary {
        let mut summary = RunSummary::default();
        let limit = self.config.max_requests;

        tracing::info!(
            targets = ?self.bases,
            min_delay_ms = self.config.min_delay_ms,
            max_delay_ms = self.config.max_delay_ms,
            max_requests = ?limit,
            "Load generator starting"
        );

        while limit.map_or(true, |max| summary.sent < max) {
            let endpoint = Endpoint::random(&mut rand::thread_rng());

            let outcome = tokio::select! {
                outcome = self.send(endpoint) => outcome,
                _ = shutdown.recv() => break,
            };
            log_outcome(&outcome);
            summary.record(&outcome);

            if limit.is_some_and(|max| summary.sent >= max) {
                break;
            }

            let delay = sample_delay(
                self.config.min_delay_ms,
                self.config.max_delay_ms,
                &mut rand::thread_rng(),
            );
            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = shutdown.recv() => break,
            }
        }

        tracing::info!(
            sent = summary.sent,
            succeeded = summary.succeeded,
            rejected = summary.rejected,
            errors = summary.errors,
            "Load generator stopped"
        );
        summary
    }
}

/// Log one outcome. `status` is 0 when no response arrived.
fn log_outcome(outcome: &RequestOutcome) {
    let latency_ms = outcome.latency.as_secs_f64() * 1000.0;
    let status = outcome.status.unwrap_or(0);
    match &outcome.error {
        None => tracing::info!(
            target_url = %outcome.target,
            method = %outcome.endpoint.method(),
            path = outcome.endpoint.path(),
            status,
            latency_ms,
            body = outcome.body.as_deref().unwrap_or_default(),
            "Request completed"
        ),
        Some(error) => tracing::warn!(
            target_url = %outcome.target,
            method = %outcome.endpoint.method(),
            path = outcome.endpoint.path(),
            status,
            latency_ms,
            error = %error,
            "Request failed"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LogFormat;
    use crate::observability::logging::{capture::Captured, fmt_layer};
    use tracing_subscriber::layer::SubscriberExt;

    fn outcome(status: Option<u16>, error: Option<&str>) -> RequestOutcome {
        RequestOutcome {
            target: "http://localhost:8000".to_string(),
            endpoint: Endpoint::Purchase,
            status,
            latency: Duration::from_millis(1),
            body: None,
            error: error.map(str::to_string),
        }
    }

    #[test]
    fn test_outcome_kinds() {
        assert_eq!(outcome(Some(200), None).kind(), OutcomeKind::Success);
        assert_eq!(outcome(Some(402), None).kind(), OutcomeKind::Rejected);
        assert_eq!(outcome(None, Some("refused")).kind(), OutcomeKind::Error);
        assert_eq!(outcome(Some(200), Some("body cut")).kind(), OutcomeKind::Error);
    }

    #[test]
    fn test_summary_counts() {
        let mut summary = RunSummary::default();
        summary.record(&outcome(Some(200), None));
        summary.record(&outcome(Some(402), None));
        summary.record(&outcome(None, Some("timeout")));
        assert_eq!(
            summary,
            RunSummary { sent: 3, succeeded: 1, rejected: 1, errors: 1 }
        );
    }

    #[test]
    fn test_config_validation() {
        assert!(LoadConfig::default().validate().is_ok());

        let bad_scheme = LoadConfig {
            targets: vec!["http://shop-1".into(), "ftp://shop-2".into()],
            ..Default::default()
        };
        assert!(matches!(bad_scheme.validate(), Err(LoadGenError::Target { .. })));

        let no_targets = LoadConfig { targets: vec![], ..Default::default() };
        assert!(matches!(no_targets.validate(), Err(LoadGenError::NoTargets)));

        let bad_range = LoadConfig { min_delay_ms: 10, max_delay_ms: 5, ..Default::default() };
        assert!(matches!(bad_range.validate(), Err(LoadGenError::DelayRange { .. })));

        let no_timeout = LoadConfig { timeout_secs: 0, ..Default::default() };
        assert!(matches!(no_timeout.validate(), Err(LoadGenError::ZeroTimeout)));
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let generator = LoadGenerator::new(LoadConfig {
            targets: vec!["http://shop-1:8000/".into(), "http://shop-2:8000".into()],
            ..Default::default()
        })
        .unwrap();
        assert_eq!(generator.bases, ["http://shop-1:8000", "http://shop-2:8000"]);
    }

    #[tokio::test]
    async fn test_failed_request_logs_json_with_status() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let generator = LoadGenerator::new(LoadConfig {
            targets: vec![format!("http://{}", addr)],
            timeout_secs: 2,
            ..Default::default()
        })
        .unwrap();
        let failed = generator.send(Endpoint::Login).await;
        assert_eq!(failed.kind(), OutcomeKind::Error);

        let captured = Captured::default();
        let subscriber =
            tracing_subscriber::registry().with(fmt_layer(LogFormat::Json, captured.clone()));
        tracing::subscriber::with_default(subscriber, || log_outcome(&failed));

        let lines = captured.lines();
        assert_eq!(lines.len(), 1);
        let event: serde_json::Value = serde_json::from_str(&lines[0]).unwrap();
        assert_eq!(event["level"], "WARN");
        assert_eq!(event["path"], "/login");
        assert_eq!(event["status"], 0);
        assert_eq!(event["target_url"], format!("http://{}", addr));
        assert!(event["error"].as_str().is_some_and(|e| !e.is_empty()));
    }
}
