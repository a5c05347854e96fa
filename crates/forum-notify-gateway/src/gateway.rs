//! The gateway seam between notification state and the network.

use async_trait::async_trait;

use crate::{GatewayError, NotificationId, NotificationRecord};

/// Remote operations the notification state depends on.
///
/// Every call is a single request/response exchange. Implementations must be
/// safe to call repeatedly: marking an already-read notification is not an
/// error.
#[async_trait]
pub trait SyncGateway: Send + Sync {
    /// Fetch the full notification list, newest first.
    async fn fetch_list(&self) -> Result<Vec<NotificationRecord>, GatewayError>;

    /// Mark a single notification as read.
    async fn mark_one(&self, id: &NotificationId) -> Result<(), GatewayError>;

    /// Mark every notification of the current user as read.
    async fn mark_all(&self) -> Result<(), GatewayError>;
}
