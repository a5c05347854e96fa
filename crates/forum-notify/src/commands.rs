//! One-shot subcommands: `list`, `read` and `read-all`.

use std::sync::Arc;

use forum_notify_core::{
    CenterConfig, MarkOutcome, NotificationCenter, NotificationId, RefreshTrigger,
};
use forum_notify_gateway::{ForumClient, GatewayError};
use miette::Result;

use crate::render::{render_badge, render_list};

fn center(client: ForumClient) -> Arc<NotificationCenter> {
    NotificationCenter::new(Arc::new(client), CenterConfig::default())
}

/// Turn a gateway failure into a diagnostic, with a hint for expired
/// sessions.
fn report(action: &str, err: GatewayError) -> miette::Report {
    if err.is_unauthorized() {
        miette::miette!(
            help = "set --session-id or FORUM_SESSION_ID to a valid session",
            "failed to {}: {}",
            action,
            err
        )
    } else {
        miette::miette!("failed to {}: {}", action, err)
    }
}

async fn load(center: &NotificationCenter) -> Result<()> {
    center
        .refresh(RefreshTrigger::Manual)
        .await
        .map_err(|e| report("load notifications", e))?;
    Ok(())
}

/// Fetch and print every notification with the unread count.
pub async fn list(client: ForumClient) -> Result<()> {
    let center = center(client);
    load(&center).await?;

    let snapshot = center.snapshot().await;
    println!("{}", render_list(&snapshot.records));
    match render_badge(snapshot.unread) {
        Some(badge) => println!("\n{}", badge),
        None => println!("\nAll caught up"),
    }
    Ok(())
}

/// Mark one notification read.
pub async fn read(client: ForumClient, id: NotificationId) -> Result<()> {
    let center = center(client);
    // The cache has to know the record before it can be marked
    load(&center).await?;

    let outcome = center
        .mark_one(&id)
        .await
        .map_err(|e| report(&format!("mark notification {} as read", id), e))?;

    match outcome {
        MarkOutcome::Marked => println!("Marked notification {} as read", id),
        MarkOutcome::AlreadyRead => println!("Notification {} was already read", id),
        MarkOutcome::NotFound => {
            return Err(miette::miette!("No notification with id {}", id));
        }
    }
    print_remaining(&center).await;
    Ok(())
}

/// Mark every notification read.
pub async fn read_all(client: ForumClient) -> Result<()> {
    let center = center(client);

    center
        .mark_all()
        .await
        .map_err(|e| report("mark all notifications as read", e))?;

    println!("Marked all notifications as read");
    Ok(())
}

async fn print_remaining(center: &NotificationCenter) {
    if let Some(badge) = render_badge(center.unread_count().await) {
        println!("{}", badge);
    }
}
