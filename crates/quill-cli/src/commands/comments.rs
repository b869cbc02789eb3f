//! Comment subcommands.

use anyhow::{Context, Result, bail};
use clap::{Args, Subcommand};

use crate::output;
use crate::session::Session;

#[derive(Args, Debug)]
pub struct CommentsCommand {
    #[command(subcommand)]
    pub command: CommentsSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum CommentsSubcommand {
    /// List the comments on a post
    List {
        /// Post ID
        post_id: u64,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Comment on a post
    Add {
        /// Post ID
        post_id: u64,

        /// Comment text
        #[arg(long)]
        content: String,
    },

    /// Delete a comment
    Delete {
        /// Comment ID
        id: u64,
    },
}

pub async fn handle(cmd: CommentsCommand, session: &Session) -> Result<()> {
    let api = session.api()?;

    match cmd.command {
        CommentsSubcommand::List { post_id, pretty } => {
            let comments = api
                .list_comments(post_id)
                .await
                .with_context(|| format!("Failed to list comments on post {}", post_id))?;
            if comments.is_empty() {
                output::note("No comments yet.");
            }
            for comment in &comments {
                output::record(comment, pretty)?;
            }
        }
        CommentsSubcommand::Add { post_id, content } => {
            if content.trim().is_empty() {
                bail!("Comment content is empty");
            }
            let comment = api
                .add_comment(post_id, &content)
                .await
                .with_context(|| format!("Failed to comment on post {}", post_id))?;
            output::success("Comment added");
            output::record(&comment, false)?;
        }
        CommentsSubcommand::Delete { id } => {
            api.delete_comment(id)
                .await
                .with_context(|| format!("Failed to delete comment {}", id))?;
            output::success(&format!("Deleted comment {}", id));
        }
    }

    Ok(())
}
