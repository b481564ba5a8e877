//! Shutdown coordination shared by the server and the load generator.

use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::lifecycle::signals;

/// Coordinator for graceful shutdown.
///
/// Long-running loops subscribe and stop when the signal fires.
pub struct Shutdown {
    /// Broadcast channel sender.
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    /// Create a new shutdown coordinator.
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Subscribe to the shutdown signal.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Trigger the shutdown signal. Receivers subscribed later will not
    /// see it.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }

    /// Get the number of active subscribers (tasks still running).
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Trigger once the process receives Ctrl+C or SIGTERM.
    pub fn trigger_on_signal(&self) -> JoinHandle<()> {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            signals::wait_for_shutdown().await;
            tracing::info!("Shutdown signal received");
            let _ = tx.send(());
        })
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_trigger_reaches_all_subscribers() {
        let shutdown = Shutdown::new();
        let mut a = shutdown.subscribe();
        let mut b = shutdown.subscribe();
        assert_eq!(shutdown.receiver_count(), 2);

        shutdown.trigger();
        assert!(a.recv().await.is_ok());
        assert!(b.recv().await.is_ok());
    }

    #[tokio::test]
    async fn test_receiver_count_tracks_running_tasks() {
        let shutdown = Shutdown::new();
        let mut rx = shutdown.subscribe();
        let task = tokio::spawn(async move {
            let _ = rx.recv().await;
        });
        assert_eq!(shutdown.receiver_count(), 1);

        shutdown.trigger();
        task.await.unwrap();
        assert_eq!(shutdown.receiver_count(), 0);
    }

    #[tokio::test]
    async fn test_trigger_without_subscribers_is_harmless() {
        let shutdown = Shutdown::default();
        shutdown.trigger();
        assert_eq!(shutdown.receiver_count(), 0);
    }
}
