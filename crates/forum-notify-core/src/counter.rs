//! Unread counter.
//!
//! The count is always derived from the records; nothing stores it.

use forum_notify_gateway::NotificationRecord;

/// Number of unread records.
pub fn unread_count(records: &[NotificationRecord]) -> usize {
    records.iter().filter(|r| r.is_unread()).count()
}

/// Badge shown next to the notifications button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Badge {
    pub count: usize,
}

impl Badge {
    /// The badge is hidden when nothing is unread.
    pub fn is_visible(&self) -> bool {
        self.count > 0
    }
}
