//! Background refresh on a fixed interval.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::center::{NotificationCenter, RefreshOutcome, RefreshTrigger};
use crate::config::MIN_POLL_INTERVAL;

/// Refreshes a center independently of the panel, keeping the badge fresh.
pub struct PollScheduler {
    center: Arc<NotificationCenter>,
    interval: Duration,
}

impl PollScheduler {
    /// Intervals below [`MIN_POLL_INTERVAL`] are raised to it.
    pub fn new(center: Arc<NotificationCenter>, interval: Duration) -> Self {
        Self {
            center,
            interval: interval.max(MIN_POLL_INTERVAL),
        }
    }

    /// Spawn the poll loop. The first refresh happens right away.
    pub fn spawn(self) -> PollHandle {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(self.run(shutdown_rx));

        PollHandle {
            shutdown_tx,
            handle: Some(handle),
        }
    }

    async fn run(self, mut shutdown_rx: watch::Receiver<bool>) {
        info!(interval_secs = self.interval.as_secs(), "notification poller started");

        let mut interval = tokio::time::interval(self.interval);
        // A tick missed during a slow refresh is dropped, not replayed
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;

                changed = shutdown_rx.changed() => {
                    if changed.is_err() || *shutdown_rx.borrow() {
                        break;
                    }
                }

                _ = interval.tick() => {
                    match self.center.refresh(RefreshTrigger::PollTick).await {
                        Ok(RefreshOutcome::Skipped) => {
                            debug!("poll tick skipped, refresh in flight");
                        }
                        Ok(RefreshOutcome::Refreshed { .. }) => {}
                        // Already reported by the center; the next tick retries
                        Err(_) => {}
                    }
                }
            }
        }

        info!("notification poller stopped");
    }
}

/// Handle to a running poller.
///
/// Dropping the handle stops the poller after its current refresh.
pub struct PollHandle {
    shutdown_tx: watch::Sender<bool>,
    handle: Option<JoinHandle<()>>,
}

impl PollHandle {
    /// Ask the poller to stop without waiting for it.
    pub fn cancel(&self) {
        // Err means the loop has already exited
        let _ = self.shutdown_tx.send(true);
    }

    /// Stop the poller and wait for it to exit.
    pub async fn shutdown(mut self) {
        self.cancel();
        if let Some(handle) = self.handle.take()
            && let Err(e) = handle.await
        {
            warn!(error = %e, "notification poller task failed");
        }
    }

    /// Whether the poll loop has exited.
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().is_none_or(|h| h.is_finished())
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}
