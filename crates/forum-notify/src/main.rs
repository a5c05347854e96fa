//! forum-notify: forum notification client
//!
//! Main binary with subcommands:
//! - `watch`: live notification panel (polling, interactive commands)
//! - `list`: fetch and print notifications once
//! - `read`: mark one notification read
//! - `read-all`: mark every notification read

use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use forum_notify_core::NotificationId;
use forum_notify_gateway::ForumClient;
use miette::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod render;
mod watch;

#[derive(Parser)]
#[command(name = "forum-notify")]
#[command(about = "Forum notification client", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Connection settings shared by every subcommand.
#[derive(Args)]
struct ServerArgs {
    /// Forum base URL
    #[arg(long, env = "FORUM_BASE_URL")]
    base_url: String,

    /// Session id (sent as the `session_id` cookie)
    #[arg(long, env = "FORUM_SESSION_ID")]
    session_id: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, default_value = "30")]
    request_timeout: u64,
}

impl ServerArgs {
    fn client(&self) -> Result<ForumClient> {
        let mut builder = ForumClient::builder(&self.base_url)
            .timeout(Duration::from_secs(self.request_timeout.max(1)));
        if let Some(ref session_id) = self.session_id {
            builder = builder.session_id(session_id);
        }
        builder
            .build()
            .map_err(|e| miette::miette!("failed to create forum client: {}", e))
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Keep the notification panel live: poll in the background and read
    /// commands from stdin
    Watch {
        #[command(flatten)]
        server: ServerArgs,

        /// Notification poll interval in seconds
        #[arg(long, default_value = "30")]
        poll_interval: u64,
    },

    /// Fetch and print notifications
    List {
        #[command(flatten)]
        server: ServerArgs,
    },

    /// Mark one notification as read
    Read {
        #[command(flatten)]
        server: ServerArgs,

        /// Notification id
        #[arg(value_name = "ID")]
        id: NotificationId,
    },

    /// Mark all notifications as read
    ReadAll {
        #[command(flatten)]
        server: ServerArgs,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "forum_notify=info".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Watch {
            server,
            poll_interval,
        } => watch::run(server.client()?, Duration::from_secs(poll_interval)).await,

        Commands::List { server } => commands::list(server.client()?).await,

        Commands::Read { server, id } => commands::read(server.client()?, id).await,

        Commands::ReadAll { server } => commands::read_all(server.client()?).await,
    }
}
