//! Mark-as-read coordination.
//!
//! Every local read flag is set only after the server confirmed it. A failed
//! call leaves the cache untouched and is not retried; the next refresh shows
//! the server's view anyway.

use forum_notify_gateway::{GatewayError, NotificationId};
use tracing::{debug, info};

use crate::center::NotificationCenter;
use crate::update::{NotificationUpdate, Operation};

/// Result of a single mark-as-read request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkOutcome {
    /// The server confirmed and the record is now read.
    Marked,
    /// The record was already read; the server was not called.
    AlreadyRead,
    /// No record with this id is cached; the server was not called.
    NotFound,
}

impl NotificationCenter {
    /// Mark one notification read.
    #[tracing::instrument(skip(self, id), fields(%id))]
    pub async fn mark_one(&self, id: &NotificationId) -> Result<MarkOutcome, GatewayError> {
        let is_read = self.cache.read().await.get(id).map(|r| r.is_read);
        match is_read {
            None => {
                debug!("not in cache, skipping");
                return Ok(MarkOutcome::NotFound);
            }
            Some(true) => return Ok(MarkOutcome::AlreadyRead),
            Some(false) => {}
        }

        if let Err(e) = self.gateway.mark_one(id).await {
            self.report_failure(Operation::MarkOne, true, &e);
            return Err(e);
        }

        // A refresh may have replaced the cache meanwhile; the confirmed
        // flag still applies if the record is there.
        let unread = {
            let mut cache = self.cache.write().await;
            cache.mark_read(id);
            cache.unread_count()
        };

        info!(unread, "notification marked read");
        self.broadcast(NotificationUpdate::MarkedRead {
            id: id.clone(),
            unread,
        });
        Ok(MarkOutcome::Marked)
    }

    /// Mark every notification read.
    ///
    /// The server is always asked, even if nothing is unread locally.
    /// Returns how many cached records flipped to read.
    #[tracing::instrument(skip(self))]
    pub async fn mark_all(&self) -> Result<usize, GatewayError> {
        if let Err(e) = self.gateway.mark_all().await {
            self.report_failure(Operation::MarkAll, true, &e);
            return Err(e);
        }

        let changed = self.cache.write().await.mark_all_read();

        info!(changed, "all notifications marked read");
        self.broadcast(NotificationUpdate::AllMarkedRead);
        Ok(changed)
    }

    /// Open a notification: mark it read if needed, then return the post
    /// link to navigate to.
    ///
    /// Navigation goes ahead even if marking fails. Returns `None` for ids
    /// that are not cached.
    pub async fn activate(&self, id: &NotificationId) -> Option<String> {
        let (link, unread) = {
            let cache = self.cache.read().await;
            let record = cache.get(id)?;
            (record.post_link(), record.is_unread())
        };

        if unread {
            // Failure is already reported by mark_one
            let _ = self.mark_one(id).await;
        }

        Some(link)
    }
}
