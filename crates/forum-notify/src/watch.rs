//! `forum-notify watch`: a live notification panel driven from stdin.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use forum_notify_core::{CenterConfig, MarkOutcome, NotificationCenter, NotificationId};
use forum_notify_gateway::ForumClient;
use miette::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};

use crate::render::TerminalRenderer;

const HELP: &str = "\
commands:
  toggle       open or close the panel
  open         open the panel
  close        close the panel
  read <id>    mark one notification read
  go <id>      open a notification's post
  read-all     mark all notifications read
  list         redraw the panel
  help         show this message
  quit         exit";

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Toggle,
    Open,
    Close,
    Read(NotificationId),
    Go(NotificationId),
    ReadAll,
    List,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut parts = line.split_whitespace();
        let Some(name) = parts.next() else {
            return Err("empty command".to_string());
        };
        let arg = parts.next();
        if parts.next().is_some() {
            return Err(format!("too many arguments for '{}'", name));
        }

        let id_arg = |arg: Option<&str>| -> Result<NotificationId, String> {
            let arg = arg.ok_or_else(|| format!("'{}' needs a notification id", name))?;
            let Ok(id) = arg.parse::<NotificationId>();
            Ok(id)
        };

        let command = match name.to_ascii_lowercase().as_str() {
            "toggle" | "t" => Command::Toggle,
            "open" => Command::Open,
            "close" => Command::Close,
            "read" | "r" => return id_arg(arg).map(Command::Read),
            "go" | "g" => return id_arg(arg).map(Command::Go),
            "read-all" | "readall" => Command::ReadAll,
            "list" | "ls" => Command::List,
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            other => return Err(format!("unknown command '{}'", other)),
        };

        match arg {
            Some(_) => Err(format!("'{}' takes no arguments", name)),
            None => Ok(command),
        }
    }
}

/// Run the interactive panel until `quit`, end of input or Ctrl-C.
pub async fn run(client: ForumClient, poll_interval: Duration) -> Result<()> {
    info!(base_url = %client.base_url(), "starting notification watch");

    let config = CenterConfig::default().with_poll_interval(poll_interval);
    let center = NotificationCenter::new(Arc::new(client), config);

    let renderer = TerminalRenderer::new(Arc::clone(&center));
    let render_task = renderer.spawn();
    let poller = center.start_polling();

    println!("{}", HELP);

    let mut interrupted = false;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = tokio::select! {
            line = lines.next_line() => line,
            _ = tokio::signal::ctrl_c() => {
                interrupted = true;
                break;
            }
        };

        let line = match line {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => return Err(miette::miette!("failed to read stdin: {}", e)),
        };
        if line.trim().is_empty() {
            continue;
        }

        match line.parse::<Command>() {
            Ok(Command::Quit) => break,
            // A hanging request must not block Ctrl-C
            Ok(command) => {
                if !until_interrupted(execute(&center, command), tokio::signal::ctrl_c()).await {
                    interrupted = true;
                    break;
                }
            }
            Err(e) => println!("{} (type 'help' for commands)", e),
        }
    }

    if interrupted {
        // Don't wait for an in-flight poll; the runtime drops it on exit
        info!("interrupted");
        poller.cancel();
    } else {
        poller.shutdown().await;
    }
    render_task.abort();
    info!("notification watch stopped");
    Ok(())
}

/// Drive `work` unless `interrupt` fires first. Returns false if
/// interrupted.
async fn until_interrupted<W, I>(work: W, interrupt: I) -> bool
where
    W: Future<Output = ()>,
    I: Future,
{
    tokio::select! {
        _ = work => true,
        _ = interrupt => false,
    }
}

async fn execute(center: &Arc<NotificationCenter>, command: Command) {
    debug!(?command, "executing command");
    match command {
        Command::Toggle => {
            center.toggle_panel().await;
        }
        Command::Open => {
            if !center.open_panel().await {
                println!("panel is already open");
            }
        }
        Command::Close => {
            if !center.close_panel() {
                println!("panel is already closed");
            }
        }
        Command::Read(id) => match center.mark_one(&id).await {
            Ok(MarkOutcome::Marked) | Err(_) => {}
            Ok(MarkOutcome::AlreadyRead) => println!("notification {} is already read", id),
            Ok(MarkOutcome::NotFound) => println!("no notification with id {}", id),
        },
        Command::Go(id) => match center.activate(&id).await {
            Some(link) => {
                println!("-> {}", link);
                // Navigating away closes the panel
                center.close_panel();
            }
            None => println!("no notification with id {}", id),
        },
        Command::ReadAll => {
            // Failures reach the user through the renderer
            let _ = center.mark_all().await;
        }
        Command::List => {
            TerminalRenderer::new(Arc::clone(center)).draw().await;
        }
        Command::Help => println!("{}", HELP),
        Command::Quit => {}
    }
}
