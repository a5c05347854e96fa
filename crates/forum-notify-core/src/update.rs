//! What renderers see: snapshots and update events.

use std::fmt;

use forum_notify_gateway::{NotificationId, NotificationRecord};

use crate::counter::Badge;
use crate::visibility::PanelState;

/// A gateway-backed operation, for failure reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Refresh,
    MarkOne,
    MarkAll,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Refresh => write!(f, "load notifications"),
            Operation::MarkOne => write!(f, "mark notification as read"),
            Operation::MarkAll => write!(f, "mark all notifications as read"),
        }
    }
}

/// Update event for center subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationUpdate {
    /// The cache was replaced by a fresh list.
    Refreshed { count: usize, unread: usize },
    /// One notification was confirmed read.
    MarkedRead { id: NotificationId, unread: usize },
    /// Every notification was confirmed read.
    AllMarkedRead,
    /// A list fetch started (`true`) or finished (`false`).
    Loading(bool),
    /// The panel opened.
    PanelOpened,
    /// The panel closed; the rendered list should be cleared.
    PanelClosed,
    /// A gateway call failed. Local state is unchanged.
    Failed {
        operation: Operation,
        message: String,
        /// Whether a user action triggered the call (show a message).
        user_initiated: bool,
    },
}

/// Everything a renderer needs at one point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewSnapshot {
    pub records: Vec<NotificationRecord>,
    pub unread: usize,
    pub loading: bool,
    pub panel: PanelState,
}

impl ViewSnapshot {
    pub fn badge(&self) -> Badge {
        Badge {
            count: self.unread,
        }
    }
}
