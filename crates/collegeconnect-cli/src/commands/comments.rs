//! Comment subcommands.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use collegeconnect::view::{ListLabels, ViewState};
use collegeconnect::{CommentId, PostId};

use crate::output;
use crate::session::CliSession;

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
        post_id: PostId,

        /// Print comments as JSON
        #[arg(long)]
        json: bool,
    },

    /// Comment on a post
    Add {
        /// Post ID
        post_id: PostId,

        /// Comment text
        #[arg(long)]
        content: String,
    },

    /// Delete one of your comments
    Delete {
        /// Comment ID
        comment_id: CommentId,
    },
}

pub async fn handle(cmd: CommentsCommand, session: &CliSession) -> Result<()> {
    session.restore().await?;
    let api = session.client().api();

    match cmd.command {
        CommentsSubcommand::List { post_id, json } => {
            let view = ViewState::from_list(api.list_comments(post_id).await, &ListLabels::COMMENTS);
            output::list(&view, json, output::comment)
        }
        CommentsSubcommand::Add { post_id, content } => {
            let comment = api
                .add_comment(post_id, &content)
                .await
                .context("Failed to add comment")?;
            output::success("Comment added");
            output::comment(&comment);
            Ok(())
        }
        CommentsSubcommand::Delete { comment_id } => {
            api.delete_comment(comment_id)
                .await
                .context("Failed to delete comment")?;
            output::success(&format!("Deleted comment {}", comment_id));
            Ok(())
        }
    }
}
