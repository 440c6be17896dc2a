//! Graceful shutdown coordination.
//!
//! The server and the cleanup task both wait on the same coordinator, so
//! a single Ctrl+C or SIGTERM stops accepting connections and starts
//! releasing resources.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::signal;
use tokio::sync::broadcast;
use tracing::{error, info};

#[derive(Clone)]
pub struct ShutdownCoordinator {
    tx: broadcast::Sender<()>,
    triggered: Arc<AtomicBool>,
}

impl ShutdownCoordinator {
    pub fn new() -> (Self, broadcast::Receiver<()>) {
        let (tx, rx) = broadcast::channel(1);
        (
            Self {
                tx,
                triggered: Arc::new(AtomicBool::new(false)),
            },
            rx,
        )
    }

    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    pub fn is_triggered(&self) -> bool {
        self.triggered.load(Ordering::SeqCst)
    }

    /// Notifies every subscriber. Only the first call has an effect.
    pub fn trigger(&self) {
        if !self.triggered.swap(true, Ordering::SeqCst) {
            info!("Shutdown triggered");
            let _ = self.tx.send(());
        }
    }

    /// Resolves once shutdown has been triggered, either by a signal or by
    /// another holder calling [`ShutdownCoordinator::trigger`].
    pub async fn wait_for_signal(&self) {
        let mut rx = self.subscribe();
        if self.is_triggered() {
            return;
        }
        tokio::select! {
            _ = shutdown_signal() => self.trigger(),
            _ = rx.recv() => {}
        }
    }
}

/// Waits for Ctrl+C or SIGTERM.
///
/// If a signal handler cannot be installed the error is logged and that
/// branch never resolves, leaving the other one in charge.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}

pub(crate) async fn coordinated_shutdown(coordinator: ShutdownCoordinator) {
    coordinator.wait_for_signal().await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_trigger_wakes_waiters() {
        let (coordinator, _rx) = ShutdownCoordinator::new();
        let waiter = coordinator.clone();
        let handle = tokio::spawn(async move { waiter.wait_for_signal().await });

        tokio::time::sleep(Duration::from_millis(10)).await;
        coordinator.trigger();

        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("waiter should finish")
            .unwrap();
        assert!(coordinator.is_triggered());
    }

    #[tokio::test]
    async fn test_wait_after_trigger_returns_immediately() {
        let (coordinator, _rx) = ShutdownCoordinator::new();
        coordinator.trigger();
        coordinator.trigger();
        tokio::time::timeout(Duration::from_millis(100), coordinator.wait_for_signal())
            .await
            .expect("already triggered");
    }
}
