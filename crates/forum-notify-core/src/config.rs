//! Notification center configuration.

use std::time::Duration;

/// How often the poller refreshes the list.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Shortest interval the poller accepts.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Buffered updates per subscriber before a slow renderer starts lagging.
const DEFAULT_UPDATE_CAPACITY: usize = 64;

/// Configuration for a [`NotificationCenter`](crate::NotificationCenter).
#[derive(Debug, Clone)]
pub struct CenterConfig {
    /// Interval between background refreshes.
    pub poll_interval: Duration,
    /// Capacity of the update broadcast channel.
    pub update_capacity: usize,
}

impl Default for CenterConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            update_capacity: DEFAULT_UPDATE_CAPACITY,
        }
    }
}

impl CenterConfig {
    /// Set the poll interval. Values below [`MIN_POLL_INTERVAL`] are raised
    /// to it.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval.max(MIN_POLL_INTERVAL);
        self
    }
}
