//! Graceful shutdown coordinator

use std::sync::Arc;
use tokio::sync::watch;
use tracing::{error, info, warn};

/// Shutdown state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownState {
    Running,
    ShuttingDown,
}

/// Broadcasts a single shutdown transition to any number of waiters.
///
/// A waiter that subscribes after shutdown has begun returns immediately.
pub struct ShutdownCoordinator {
    state: watch::Sender<ShutdownState>,
}

impl Default for ShutdownCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownCoordinator {
    pub fn new() -> Self {
        let (state, _) = watch::channel(ShutdownState::Running);
        Self { state }
    }

    /// Begin shutdown. Repeated calls are ignored.
    pub fn shutdown(&self) {
        let changed = self.state.send_if_modified(|state| {
            if *state == ShutdownState::Running {
                *state = ShutdownState::ShuttingDown;
                true
            } else {
                false
            }
        });

        if changed {
            info!("Initiating graceful shutdown");
        } else {
            warn!("Shutdown already in progress");
        }
    }

    pub fn is_shutting_down(&self) -> bool {
        *self.state.borrow() == ShutdownState::ShuttingDown
    }

    pub fn state(&self) -> ShutdownState {
        *self.state.borrow()
    }

    /// Resolve once shutdown has been initiated.
    pub async fn wait_for_shutdown(&self) {
        let mut rx = self.state.subscribe();
        // The sender lives in `self`, so the channel cannot close while we wait.
        let _ = rx.wait_for(|state| *state == ShutdownState::ShuttingDown).await;
    }
}

/// Trigger `coordinator` on SIGINT or SIGTERM
#[cfg(unix)]
pub fn install_signal_handlers(coordinator: Arc<ShutdownCoordinator>) {
    use tokio::signal::unix::{signal, SignalKind};

    tokio::spawn(async move {
        let (mut sigterm, mut sigint) =
            match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
                (Ok(term), Ok(int)) => (term, int),
                (Err(e), _) | (_, Err(e)) => {
                    error!("Failed to install signal handlers: {}", e);
                    return;
                }
            };

        tokio::select! {
            _ = sigterm.recv() => info!("Received SIGTERM"),
            _ = sigint.recv() => info!("Received SIGINT"),
        }
        coordinator.shutdown();
    });
}

/// Trigger `coordinator` on Ctrl+C
#[cfg(not(unix))]
pub fn install_signal_handlers(coordinator: Arc<ShutdownCoordinator>) {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Received Ctrl+C");
                coordinator.shutdown();
            }
            Err(e) => error!("Failed to install Ctrl+C handler: {}", e),
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_shutdown_coordinator() {
        let coordinator = ShutdownCoordinator::new();
        assert_eq!(coordinator.state(), ShutdownState::Running);
        assert!(!coordinator.is_shutting_down());

        coordinator.shutdown();
        assert_eq!(coordinator.state(), ShutdownState::ShuttingDown);

        // Second call is a no-op
        coordinator.shutdown();
        assert!(coordinator.is_shutting_down());
    }

    #[tokio::test]
    async fn test_waiters_are_released() {
        let coordinator = Arc::new(ShutdownCoordinator::new());

        let waiter = {
            let coordinator = coordinator.clone();
            tokio::spawn(async move { coordinator.wait_for_shutdown().await })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());

        coordinator.shutdown();
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter should be released")
            .unwrap();
    }

    #[tokio::test]
    async fn test_late_waiter_returns_immediately() {
        let coordinator = ShutdownCoordinator::new();
        coordinator.shutdown();

        tokio::time::timeout(Duration::from_millis(100), coordinator.wait_for_shutdown())
            .await
            .expect("late waiter should not block");
    }
}
