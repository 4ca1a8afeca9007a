//! Post subcommands.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgGroup, Args, Subcommand};

use collegeconnect::view::{ListLabels, ViewState};
use collegeconnect::{NewPost, PostId, UserId};

use crate::output;
use crate::session::CliSession;

#[derive(Args, Debug)]
pub struct PostsCommand {
    #[command(subcommand)]
    pub command: PostsSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum PostsSubcommand {
    /// List posts (all posts by default)
    List(ListArgs),

    /// Publish a post
    Create(CreateArgs),

    /// Delete one of your posts
    Delete {
        /// Post ID
        id: PostId,
    },

    /// Like a post
    Like {
        /// Post ID
        id: PostId,
    },

    /// Remove your like from a post
    Unlike {
        /// Post ID
        id: PostId,
    },

    /// Ask for tag suggestions for draft content
    SuggestTags {
        /// Draft post content
        #[arg(long)]
        content: String,
    },
}

#[derive(Args, Debug)]
#[command(group(ArgGroup::new("source").args(["feed", "mine", "tag", "user"])))]
pub struct ListArgs {
    /// Posts from users you follow
    #[arg(long)]
    pub feed: bool,

    /// Your own posts
    #[arg(long)]
    pub mine: bool,

    /// Posts carrying a tag
    #[arg(long)]
    pub tag: Option<String>,

    /// Posts by a user
    #[arg(long)]
    pub user: Option<UserId>,

    /// Print posts as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Post text
    #[arg(long)]
    pub content: String,

    /// Tag to attach (repeatable)
    #[arg(long = "tag")]
    pub tags: Vec<String>,

    /// Image file to upload and attach
    #[arg(long)]
    pub image: Option<PathBuf>,

    /// Also attach the tags the server suggests
    #[arg(long)]
    pub suggest_tags: bool,
}

pub async fn handle(cmd: PostsCommand, session: &CliSession) -> Result<()> {
    session.restore().await?;

    match cmd.command {
        PostsSubcommand::List(args) => list(args, session).await,
        PostsSubcommand::Create(args) => create(args, session).await,
        PostsSubcommand::Delete { id } => {
            session
                .client()
                .api()
                .delete_post(id)
                .await
                .context("Failed to delete post")?;
            output::success(&format!("Deleted post {}", id));
            Ok(())
        }
        PostsSubcommand::Like { id } => {
            let post = session
                .client()
                .api()
                .like_post(id)
                .await
                .context("Failed to like post")?;
            output::post(&post);
            Ok(())
        }
        PostsSubcommand::Unlike { id } => {
            let post = session
                .client()
                .api()
                .unlike_post(id)
                .await
                .context("Failed to unlike post")?;
            output::post(&post);
            Ok(())
        }
        PostsSubcommand::SuggestTags { content } => {
            let tags = session
                .client()
                .api()
                .suggest_tags(&content)
                .await
                .context("Failed to suggest tags")?;
            if tags.is_empty() {
                output::note("No tags suggested.");
            }
            for tag in tags {
                println!("#{}", tag);
            }
            Ok(())
        }
    }
}

async fn list(args: ListArgs, session: &CliSession) -> Result<()> {
    let api = session.client().api();

    let (result, labels) = if args.feed {
        (api.feed().await, ListLabels::FEED)
    } else if args.mine {
        (api.my_posts().await, ListLabels::POSTS)
    } else if let Some(ref tag) = args.tag {
        (api.posts_by_tag(tag).await, ListLabels::POSTS)
    } else if let Some(user) = args.user {
        (api.user_posts(user).await, ListLabels::POSTS)
    } else {
        (api.list_posts().await, ListLabels::POSTS)
    };

    let view = ViewState::from_list(result, &labels);
    output::list(&view, args.json, output::post)
}

async fn create(args: CreateArgs, session: &CliSession) -> Result<()> {
    let api = session.client().api();

    let mut post = NewPost::new(args.content);
    for tag in &args.tags {
        post.push_tag(tag);
    }

    if args.suggest_tags {
        let suggested = api
            .suggest_tags(&post.content)
            .await
            .context("Failed to suggest tags")?;
        for tag in suggested {
            post.push_tag(tag);
        }
    }

    if let Some(ref path) = args.image {
        let bytes = fs::read(path)
            .with_context(|| format!("Failed to read image {}", path.display()))?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());

        output::note("Uploading image...");
        let url = api
            .upload_image(&file_name, bytes)
            .await
            .context("Failed to upload image")?;
        post = post.with_image_url(url);
    }

    let created = api.create_post(&post).await.context("Failed to create post")?;

    output::success("Post published");
    println!();
    output::post(&created);
    Ok(())
}
