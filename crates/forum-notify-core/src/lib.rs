//! Client-side notification state for the forum.
//!
//! This crate keeps a local view of the user's notifications in sync with the
//! forum server:
//!
//! - **Cache**: ordered, id-keyed records; the only holder of read state
//! - **Counter**: unread count derived from the cache, never stored
//! - **Center**: context object owning the cache, the refresh guard and the
//!   panel state, with an update stream for renderers
//! - **Poller**: background refresh on a fixed interval, cancellable
//!
//! All network access goes through [`forum_notify_gateway::SyncGateway`].

pub mod cache;
mod center;
mod config;
mod coordinator;
pub mod counter;
mod guard;
mod poller;
mod update;
mod visibility;

pub use cache::NotificationCache;
pub use center::{NotificationCenter, RefreshOutcome, RefreshTrigger};
pub use config::{CenterConfig, DEFAULT_POLL_INTERVAL, MIN_POLL_INTERVAL};
pub use coordinator::MarkOutcome;
pub use counter::{Badge, unread_count};
pub use poller::{PollHandle, PollScheduler};
pub use update::{NotificationUpdate, Operation, ViewSnapshot};
pub use visibility::PanelState;

pub use forum_notify_gateway::{GatewayError, NotificationId, NotificationKind, NotificationRecord, SyncGateway};
