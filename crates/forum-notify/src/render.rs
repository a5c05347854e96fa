//! Terminal rendering of the notification panel and badge.

use std::sync::Arc;

use forum_notify_core::{NotificationCenter, NotificationUpdate, PanelState, ViewSnapshot};
use forum_notify_gateway::NotificationRecord;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::debug;

/// Format the notification list the way the panel shows it.
pub fn render_list(records: &[NotificationRecord]) -> String {
    if records.is_empty() {
        return "No notifications".to_string();
    }

    records
        .iter()
        .map(|record| {
            let marker = if record.is_unread() { "●" } else { " " };
            format!(
                "{} [{}] {}  {}  {}",
                marker,
                record.id,
                record.headline(),
                record.short_time(),
                record.post_link()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Badge text, or `None` when the badge is hidden.
pub fn render_badge(unread: usize) -> Option<String> {
    if unread == 0 {
        None
    } else {
        Some(format!("({} unread)", unread))
    }
}

fn render_status(snapshot: &ViewSnapshot) -> String {
    let badge = if snapshot.badge().is_visible() {
        render_badge(snapshot.unread).unwrap_or_default()
    } else {
        "(no unread)".to_string()
    };
    if snapshot.loading {
        format!("{} loading...", badge)
    } else {
        badge
    }
}

/// Draws the panel whenever the center reports a change.
pub struct TerminalRenderer {
    center: Arc<NotificationCenter>,
}

impl TerminalRenderer {
    pub fn new(center: Arc<NotificationCenter>) -> Self {
        Self { center }
    }

    /// Subscribe and render until the center is dropped.
    pub fn spawn(self) -> JoinHandle<()> {
        let updates = self.center.subscribe();
        tokio::spawn(self.run(updates))
    }

    async fn run(self, mut updates: tokio::sync::broadcast::Receiver<NotificationUpdate>) {
        loop {
            match updates.recv().await {
                Ok(update) => self.handle(update).await,
                Err(RecvError::Lagged(skipped)) => {
                    debug!(skipped, "renderer lagged, redrawing from snapshot");
                    self.draw().await;
                }
                Err(RecvError::Closed) => break,
            }
        }
    }

    async fn handle(&self, update: NotificationUpdate) {
        match update {
            NotificationUpdate::Failed {
                message,
                user_initiated,
                ..
            } => {
                if user_initiated {
                    println!("! {}", message);
                }
            }
            NotificationUpdate::PanelClosed => {
                println!("-- panel closed --");
                self.draw_badge().await;
            }
            NotificationUpdate::Loading(true) => {
                if self.center.panel_state() == PanelState::Open {
                    println!("Loading...");
                }
            }
            NotificationUpdate::Loading(false) | NotificationUpdate::PanelOpened => {}
            NotificationUpdate::Refreshed { .. }
            | NotificationUpdate::MarkedRead { .. }
            | NotificationUpdate::AllMarkedRead => self.draw().await,
        }
    }

    /// Draw the list if the panel is open, the badge otherwise.
    pub async fn draw(&self) {
        let snapshot = self.center.snapshot().await;
        if snapshot.panel == PanelState::Open {
            println!("{}", render_list(&snapshot.records));
        }
        println!("{}", render_status(&snapshot));
    }

    async fn draw_badge(&self) {
        let snapshot = self.center.snapshot().await;
        println!("{}", render_status(&snapshot));
    }
}
