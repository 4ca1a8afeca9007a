//! User subcommands.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use collegeconnect::UserId;
use collegeconnect::view::{ListLabels, ViewState};

use crate::output;
use crate::session::CliSession;

#[derive(Args, Debug)]
pub struct UsersCommand {
    #[command(subcommand)]
    pub command: UsersSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum UsersSubcommand {
    /// Search users by name
    Search {
        /// Search text
        query: String,

        /// Print users as JSON
        #[arg(long)]
        json: bool,
    },

    /// List a user's followers (yours by default)
    Followers {
        /// User ID
        id: Option<UserId>,

        /// Print users as JSON
        #[arg(long)]
        json: bool,
    },

    /// List who a user follows (you by default)
    Following {
        /// User ID
        id: Option<UserId>,

        /// Print users as JSON
        #[arg(long)]
        json: bool,
    },

    /// Follow a user
    Follow {
        /// User ID
        id: UserId,
    },

    /// Stop following a user
    Unfollow {
        /// User ID
        id: UserId,
    },
}

pub async fn handle(cmd: UsersCommand, session: &CliSession) -> Result<()> {
    let me = session.restore().await?;
    let api = session.client().api();

    match cmd.command {
        UsersSubcommand::Search { query, json } => {
            let view = ViewState::from_list(api.search_users(&query).await, &ListLabels::USERS);
            output::list(&view, json, output::user)
        }
        UsersSubcommand::Followers { id, json } => {
            let id = id.unwrap_or(me.id);
            let view = ViewState::from_list(api.followers(id).await, &ListLabels::USERS);
            output::list(&view, json, output::user)
        }
        UsersSubcommand::Following { id, json } => {
            let id = id.unwrap_or(me.id);
            let view = ViewState::from_list(api.following(id).await, &ListLabels::USERS);
            output::list(&view, json, output::user)
        }
        UsersSubcommand::Follow { id } => {
            api.follow(id).await.context("Failed to follow user")?;
            output::success(&format!("Now following user {}", id));
            Ok(())
        }
        UsersSubcommand::Unfollow { id } => {
            api.unfollow(id).await.context("Failed to unfollow user")?;
            output::success(&format!("Unfollowed user {}", id));
            Ok(())
        }
    }
}
