//! Scriptable in-memory gateway shared by the integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use tokio::sync::Notify;

use forum_notify_core::{GatewayError, NotificationId, NotificationKind, NotificationRecord, SyncGateway};

/// Gateway backed by a server-side list that mark calls mutate.
#[derive(Default)]
pub struct MockGateway {
    server: Mutex<Vec<NotificationRecord>>,
    fail_fetch: AtomicBool,
    fail_marks: AtomicBool,
    /// When set, `fetch_list` waits for `release()` before answering.
    gate: Option<Notify>,
    /// When set, `mark_one` waits for `release_mark()` before answering.
    mark_gate: Option<Notify>,
    fetch_calls: AtomicUsize,
    mark_one_calls: AtomicUsize,
    mark_all_calls: AtomicUsize,
}

impl MockGateway {
    pub fn new(records: Vec<NotificationRecord>) -> Arc<Self> {
        Arc::new(Self {
            server: Mutex::new(records),
            ..Self::default()
        })
    }

    /// A gateway whose list fetches block until released.
    pub fn gated(records: Vec<NotificationRecord>) -> Arc<Self> {
        Arc::new(Self {
            server: Mutex::new(records),
            gate: Some(Notify::new()),
            ..Self::default()
        })
    }

    /// A gateway whose single mark calls block until released.
    pub fn gated_marks(records: Vec<NotificationRecord>) -> Arc<Self> {
        Arc::new(Self {
            server: Mutex::new(records),
            mark_gate: Some(Notify::new()),
            ..Self::default()
        })
    }

    pub fn set_server_list(&self, records: Vec<NotificationRecord>) {
        *self.server.lock().unwrap() = records;
    }

    pub fn fail_fetch(&self, fail: bool) {
        self.fail_fetch.store(fail, Ordering::SeqCst);
    }

    pub fn fail_marks(&self, fail: bool) {
        self.fail_marks.store(fail, Ordering::SeqCst);
    }

    /// Let one blocked fetch answer.
    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.notify_one();
        }
    }

    /// Let one blocked mark call answer.
    pub fn release_mark(&self) {
        if let Some(gate) = &self.mark_gate {
            gate.notify_one();
        }
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub fn mark_one_calls(&self) -> usize {
        self.mark_one_calls.load(Ordering::SeqCst)
    }

    pub fn mark_all_calls(&self) -> usize {
        self.mark_all_calls.load(Ordering::SeqCst)
    }

    fn server_error() -> GatewayError {
        GatewayError::Server {
            status: 500,
            message: "Database error".to_string(),
        }
    }
}

#[async_trait]
impl SyncGateway for MockGateway {
    async fn fetch_list(&self) -> Result<Vec<NotificationRecord>, GatewayError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(Self::server_error());
        }
        Ok(self.server.lock().unwrap().clone())
    }

    async fn mark_one(&self, id: &NotificationId) -> Result<(), GatewayError> {
        self.mark_one_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.mark_gate {
            gate.notified().await;
        }
        if self.fail_marks.load(Ordering::SeqCst) {
            return Err(Self::server_error());
        }
        for record in self.server.lock().unwrap().iter_mut().filter(|r| &r.id == id) {
            record.is_read = true;
        }
        Ok(())
    }

    async fn mark_all(&self) -> Result<(), GatewayError> {
        self.mark_all_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_marks.load(Ordering::SeqCst) {
            return Err(Self::server_error());
        }
        for record in self.server.lock().unwrap().iter_mut() {
            record.is_read = true;
        }
        Ok(())
    }
}

pub fn record(id: i64, is_read: bool) -> NotificationRecord {
    NotificationRecord {
        id: NotificationId::Numeric(id),
        actor: format!("user{}", id),
        kind: NotificationKind::Comment,
        post_id: 100 + id,
        post_title: format!("Post {}", id),
        created_at: Utc.with_ymd_and_hms(2024, 3, 5, 12, 0, 0).unwrap(),
        is_read,
    }
}

pub fn id(n: i64) -> NotificationId {
    NotificationId::Numeric(n)
}

/// `(id, is_read)` pairs in display order.
pub fn read_states(records: &[NotificationRecord]) -> Vec<(NotificationId, bool)> {
    records.iter().map(|r| (r.id.clone(), r.is_read)).collect()
}
