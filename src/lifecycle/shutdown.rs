//! Graceful shutdown signal.

use std::future::Future;

use tokio::sync::broadcast;

/// Handle that stops a running [`HttpServer`](crate::HttpServer).
///
/// Clones share one channel: triggering any clone notifies every
/// subscriber, including those handed to servers before the clone existed.
#[derive(Debug, Clone)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Receiver to pass to [`HttpServer::run`](crate::HttpServer::run).
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Future resolving once [`trigger`](Self::trigger) is called.
    pub fn notified(&self) -> impl Future<Output = ()> + Send + 'static {
        wait_for(self.subscribe())
    }

    /// Notify every subscriber. Returns how many were still listening.
    pub fn trigger(&self) -> usize {
        self.tx.send(()).unwrap_or(0)
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolves when `rx` receives the signal or its sender is gone.
pub fn wait_for(mut rx: broadcast::Receiver<()>) -> impl Future<Output = ()> + Send + 'static {
    async move {
        let _ = rx.recv().await;
    }
}
