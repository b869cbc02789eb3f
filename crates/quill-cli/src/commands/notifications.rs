//! Notification subcommands.

use anyhow::{Context, Result, bail};
use clap::{Args, Subcommand};

use crate::output;
use crate::session::Session;

#[derive(Args, Debug)]
pub struct NotificationsCommand {
    #[command(subcommand)]
    pub command: NotificationsSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum NotificationsSubcommand {
    /// List unread notifications
    List {
        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Print the number of unread notifications
    Count,

    /// Mark one notification, or all of them, as read
    MarkRead(MarkReadArgs),
}

#[derive(Args, Debug)]
pub struct MarkReadArgs {
    /// Notification ID
    #[arg(required_unless_present = "all", conflicts_with = "all")]
    pub id: Option<u64>,

    /// Mark every notification read
    #[arg(long)]
    pub all: bool,
}

pub async fn handle(cmd: NotificationsCommand, session: &Session) -> Result<()> {
    let api = session.api()?;

    match cmd.command {
        NotificationsSubcommand::List { pretty } => {
            let notifications = api
                .unread_notifications()
                .await
                .context("Failed to fetch notifications")?;
            if notifications.is_empty() {
                output::note("No unread notifications.");
            }
            for notification in &notifications {
                output::record(notification, pretty)?;
            }
        }
        NotificationsSubcommand::Count => {
            let count = api
                .unread_count()
                .await
                .context("Failed to count notifications")?;
            println!("{}", count);
        }
        NotificationsSubcommand::MarkRead(args) => {
            let (accepted, what) = match args.id {
                Some(id) => (
                    api.mark_read(id)
                        .await
                        .with_context(|| format!("Failed to mark notification {} read", id))?,
                    format!("notification {}", id),
                ),
                None => (
                    api.mark_all_read()
                        .await
                        .context("Failed to mark notifications read")?,
                    "all notifications".to_string(),
                ),
            };
            if !accepted {
                bail!("The server did not mark {} read", what);
            }
            output::success(&format!("Marked {} read", what));
        }
    }

    Ok(())
}
