//! In-memory cache of the user's notifications.
//!
//! The cache is replaced wholesale on every successful list fetch. Between
//! fetches the only mutation is flipping records to read after the server
//! has confirmed it.

use std::collections::{HashMap, HashSet};

use forum_notify_gateway::{NotificationId, NotificationRecord};
use tracing::{trace, warn};

use crate::counter;

/// Ordered, id-keyed notification records.
#[derive(Debug, Clone, Default)]
pub struct NotificationCache {
    /// Records in server order (newest first).
    records: Vec<NotificationRecord>,
    /// Position of each id in `records`.
    index: HashMap<NotificationId, usize>,
}

impl NotificationCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Swap in a fresh list.
    ///
    /// Server order is kept. If an id repeats, the first occurrence wins.
    /// Returns the number of duplicates dropped.
    pub fn replace_all(&mut self, records: Vec<NotificationRecord>) -> usize {
        let received = records.len();
        let mut seen = HashSet::with_capacity(received);
        let records: Vec<_> = records
            .into_iter()
            .filter(|r| seen.insert(r.id.clone()))
            .collect();

        let dropped = received - records.len();
        if dropped > 0 {
            warn!(dropped, "dropped notifications with duplicate ids");
        }

        self.index = records
            .iter()
            .enumerate()
            .map(|(pos, r)| (r.id.clone(), pos))
            .collect();
        self.records = records;
        dropped
    }

    /// Mark one record read.
    ///
    /// Returns true if a record changed. Unknown or already-read ids are a
    /// no-op.
    pub fn mark_read(&mut self, id: &NotificationId) -> bool {
        let Some(&pos) = self.index.get(id) else {
            trace!(%id, "mark_read on unknown id");
            return false;
        };

        let record = &mut self.records[pos];
        if record.is_read {
            return false;
        }
        record.is_read = true;
        true
    }

    /// Mark every record read. Returns how many changed.
    pub fn mark_all_read(&mut self) -> usize {
        let mut changed = 0;
        for record in self.records.iter_mut().filter(|r| !r.is_read) {
            record.is_read = true;
            changed += 1;
        }
        changed
    }

    /// All records in display order.
    pub fn all(&self) -> &[NotificationRecord] {
        &self.records
    }

    /// Get a record by id.
    pub fn get(&self, id: &NotificationId) -> Option<&NotificationRecord> {
        self.index.get(id).map(|&pos| &self.records[pos])
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of unread records.
    pub fn unread_count(&self) -> usize {
        counter::unread_count(&self.records)
    }
}
