//! Periodic backend health checks.

use std::sync::Arc;
use std::time::Duration;

use ragchat_core::connection::{ConnectionStatus, HealthProbe};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Probes the backend once immediately and then on a fixed interval.
///
/// The latest status is published on a watch channel. There is no retry or
/// backoff beyond the interval itself. The background task is aborted by
/// [`ConnectionMonitor::stop`] or when the monitor is dropped.
pub struct ConnectionMonitor {
    status: watch::Receiver<ConnectionStatus>,
    task: Option<JoinHandle<()>>,
}

impl ConnectionMonitor {
    /// Spawns the probe loop. Must be called within a Tokio runtime.
    pub fn start(probe: Arc<dyn HealthProbe>, interval: Duration) -> Self {
        let (tx, rx) = watch::channel(ConnectionStatus::Unknown);

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            tracing::debug!("[ConnectionMonitor] Started ({:?} interval)", interval);

            loop {
                ticker.tick().await;
                let status = probe.probe().await;
                tx.send_if_modified(|current| {
                    if *current == status {
                        return false;
                    }
                    tracing::info!(
                        "[ConnectionMonitor] Status changed: {} -> {}",
                        current.label(),
                        status.label()
                    );
                    *current = status;
                    true
                });
                if tx.is_closed() {
                    break;
                }
            }
        });

        Self {
            status: rx,
            task: Some(task),
        }
    }

    /// Result of the most recent probe (`Unknown` until the first one completes).
    pub fn status(&self) -> ConnectionStatus {
        *self.status.borrow()
    }

    pub fn is_connected(&self) -> bool {
        self.status().is_connected()
    }

    pub fn subscribe(&self) -> watch::Receiver<ConnectionStatus> {
        self.status.clone()
    }

    /// Stops probing. The last status remains readable.
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            tracing::debug!("[ConnectionMonitor] Stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl Drop for ConnectionMonitor {
    fn drop(&mut self) {
        self.stop();
    }
}
