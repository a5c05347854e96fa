//! Network gateway for forum notifications.
//!
//! This crate is the only part of forum-notify that talks to the network.
//! It provides:
//!
//! - **Types**: the notification record as the forum server emits it
//! - **Gateway**: the [`SyncGateway`] trait (list, mark one, mark all)
//! - **HTTP Client**: a reqwest-backed implementation against the forum's
//!   `/notifications` routes

mod client;
mod error;
mod gateway;
mod types;

pub use client::{ForumClient, ForumClientBuilder};
pub use error::GatewayError;
pub use gateway::SyncGateway;
pub use types::{NotificationId, NotificationKind, NotificationRecord};
