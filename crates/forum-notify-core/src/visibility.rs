//! Panel visibility.
//!
//! Opening the panel always flips it, then asks for a refresh through the
//! shared guard. Closing only tells renderers to clear the list; the cache is
//! kept for the badge.

use std::sync::atomic::Ordering;

use tracing::debug;

use crate::center::{NotificationCenter, RefreshOutcome, RefreshTrigger};
use crate::update::NotificationUpdate;

/// Whether the notification panel is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum PanelState {
    #[default]
    Closed = 0,
    Open = 1,
}

impl From<u8> for PanelState {
    fn from(v: u8) -> Self {
        match v {
            1 => PanelState::Open,
            _ => PanelState::Closed,
        }
    }
}

impl PanelState {
    fn toggled(self) -> Self {
        match self {
            PanelState::Closed => PanelState::Open,
            PanelState::Open => PanelState::Closed,
        }
    }
}

impl NotificationCenter {
    /// Current panel state.
    pub fn panel_state(&self) -> PanelState {
        PanelState::from(self.panel.load(Ordering::SeqCst))
    }

    /// Flip the panel. Returns the new state.
    ///
    /// On open a refresh runs before this returns; its failure is reported
    /// through the update stream, not here.
    pub async fn toggle_panel(&self) -> PanelState {
        let previous = self
            .panel
            .fetch_xor(PanelState::Open as u8, Ordering::SeqCst);

        match PanelState::from(previous).toggled() {
            PanelState::Open => {
                self.on_opened().await;
                PanelState::Open
            }
            PanelState::Closed => {
                self.on_closed();
                PanelState::Closed
            }
        }
    }

    /// Open the panel if it is closed. Returns false if it was already open.
    pub async fn open_panel(&self) -> bool {
        if self.transition(PanelState::Closed, PanelState::Open) {
            self.on_opened().await;
            true
        } else {
            false
        }
    }

    /// Close the panel if it is open. Returns false if it was already closed.
    pub fn close_panel(&self) -> bool {
        if self.transition(PanelState::Open, PanelState::Closed) {
            self.on_closed();
            true
        } else {
            false
        }
    }

    fn transition(&self, from: PanelState, to: PanelState) -> bool {
        self.panel
            .compare_exchange(from as u8, to as u8, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    async fn on_opened(&self) {
        self.broadcast(NotificationUpdate::PanelOpened);

        // Errors are already logged and broadcast by refresh
        if let Ok(RefreshOutcome::Skipped) = self.refresh(RefreshTrigger::PanelOpen).await {
            debug!("panel opened during an in-flight refresh");
        }
    }

    fn on_closed(&self) {
        self.broadcast(NotificationUpdate::PanelClosed);
    }
}
