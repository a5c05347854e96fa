//! Notification center: the context object a hosting view owns.
//!
//! The center holds the cache, the refresh guard, the panel state and the
//! gateway. Panel handling lives in `visibility.rs` and mark-as-read in
//! `coordinator.rs`; this file covers construction, refresh and snapshots.

use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

use forum_notify_gateway::{GatewayError, SyncGateway};
use tokio::sync::{RwLock, broadcast};
use tracing::{debug, info, trace, warn};

use crate::cache::NotificationCache;
use crate::config::CenterConfig;
use crate::guard::{RefreshGuard, RefreshPermit};
use crate::poller::{PollHandle, PollScheduler};
use crate::update::{NotificationUpdate, Operation, ViewSnapshot};
use crate::visibility::PanelState;

/// What asked for a refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshTrigger {
    /// The panel was opened.
    PanelOpen,
    /// A poll tick fired.
    PollTick,
    /// An explicit request from the host.
    Manual,
}

impl RefreshTrigger {
    pub fn is_user_initiated(self) -> bool {
        !matches!(self, RefreshTrigger::PollTick)
    }
}

/// Result of a refresh request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The cache was replaced.
    Refreshed { count: usize, unread: usize },
    /// Another refresh was already in flight; this one was dropped.
    Skipped,
}

/// Shared notification state for one hosting view.
pub struct NotificationCenter {
    pub(crate) gateway: Arc<dyn SyncGateway>,
    pub(crate) cache: RwLock<NotificationCache>,
    guard: RefreshGuard,
    /// Current [`PanelState`].
    pub(crate) panel: AtomicU8,
    updates_tx: broadcast::Sender<NotificationUpdate>,
    config: CenterConfig,
}

impl NotificationCenter {
    /// Create a center with an empty cache and a closed panel.
    pub fn new(gateway: Arc<dyn SyncGateway>, config: CenterConfig) -> Arc<Self> {
        let (updates_tx, _) = broadcast::channel(config.update_capacity.max(1));
        Arc::new(Self {
            gateway,
            cache: RwLock::new(NotificationCache::new()),
            guard: RefreshGuard::new(),
            panel: AtomicU8::new(PanelState::Closed as u8),
            updates_tx,
            config,
        })
    }

    /// Start background polling at the configured interval.
    ///
    /// The first refresh runs immediately. Dropping the returned handle stops
    /// the poller.
    pub fn start_polling(self: &Arc<Self>) -> PollHandle {
        PollScheduler::new(Arc::clone(self), self.config.poll_interval).spawn()
    }

    /// Subscribe to update events.
    pub fn subscribe(&self) -> broadcast::Receiver<NotificationUpdate> {
        self.updates_tx.subscribe()
    }

    /// Whether a list fetch is running.
    pub fn is_loading(&self) -> bool {
        self.guard.is_in_flight()
    }

    /// Current unread count.
    pub async fn unread_count(&self) -> usize {
        self.cache.read().await.unread_count()
    }

    /// Copy of the current view state.
    pub async fn snapshot(&self) -> ViewSnapshot {
        let cache = self.cache.read().await;
        ViewSnapshot {
            records: cache.all().to_vec(),
            unread: cache.unread_count(),
            loading: self.is_loading(),
            panel: self.panel_state(),
        }
    }

    /// Fetch the list and replace the cache.
    ///
    /// Dropped with [`RefreshOutcome::Skipped`] if a refresh is already in
    /// flight. On failure the cache is left as it was.
    #[tracing::instrument(skip(self))]
    pub async fn refresh(&self, trigger: RefreshTrigger) -> Result<RefreshOutcome, GatewayError> {
        let Some(permit) = self.guard.try_acquire() else {
            debug!("refresh already in flight, dropping request");
            return Ok(RefreshOutcome::Skipped);
        };
        let _loading = LoadingScope::begin(self, permit);

        let records = match self.gateway.fetch_list().await {
            Ok(records) => records,
            Err(e) => {
                self.report_failure(Operation::Refresh, trigger.is_user_initiated(), &e);
                return Err(e);
            }
        };

        let (count, unread) = {
            let mut cache = self.cache.write().await;
            cache.replace_all(records);
            (cache.len(), cache.unread_count())
        };

        info!(count, unread, "notifications refreshed");
        self.broadcast(NotificationUpdate::Refreshed { count, unread });
        Ok(RefreshOutcome::Refreshed { count, unread })
    }

    /// Log a gateway failure and tell subscribers about it.
    pub(crate) fn report_failure(&self, operation: Operation, user_initiated: bool, error: &GatewayError) {
        warn!(%operation, user_initiated, error = %error, "notification gateway call failed");
        self.broadcast(NotificationUpdate::Failed {
            operation,
            message: format!("Failed to {}", operation),
            user_initiated,
        });
    }

    /// Send an update to subscribers.
    pub(crate) fn broadcast(&self, update: NotificationUpdate) {
        if self.updates_tx.send(update).is_err() {
            trace!("no subscribers for notification update");
        }
    }
}

/// Holds the refresh permit and announces loading start and end.
struct LoadingScope<'a> {
    center: &'a NotificationCenter,
    permit: Option<RefreshPermit<'a>>,
}

impl<'a> LoadingScope<'a> {
    fn begin(center: &'a NotificationCenter, permit: RefreshPermit<'a>) -> Self {
        center.broadcast(NotificationUpdate::Loading(true));
        Self {
            center,
            permit: Some(permit),
        }
    }
}

impl Drop for LoadingScope<'_> {
    fn drop(&mut self) {
        // Release before announcing so listeners can refresh right away
        drop(self.permit.take());
        self.center.broadcast(NotificationUpdate::Loading(false));
    }
}
