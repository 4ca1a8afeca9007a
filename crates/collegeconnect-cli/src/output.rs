//! Output formatting helpers.

use anyhow::{Result, anyhow};
use colored::Colorize;
use serde::Serialize;

use collegeconnect::view::ViewState;
use collegeconnect::{Comment, Identity, Post, UserSummary};

/// Print a success message.
pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

/// Print an error message.
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// Print a status note on stderr.
pub fn note(msg: &str) {
    eprintln!("{}", msg.dimmed());
}

/// Print a labeled field.
pub fn field(label: &str, value: &str) {
    println!("{}: {}", label.dimmed(), value);
}

/// Print a value as pretty-printed JSON.
pub fn json_pretty<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

/// Render a list view: the items, its empty message, or its error.
///
/// A failed view becomes the command's error.
pub fn list<T, F>(view: &ViewState<Vec<T>>, as_json: bool, render: F) -> Result<()>
where
    T: Serialize,
    F: Fn(&T),
{
    match view {
        ViewState::Loading => note("Loading..."),
        ViewState::Failed(message) => return Err(anyhow!(message.clone())),
        ViewState::Empty(message) if as_json => {
            note(message);
            json_pretty(&Vec::<T>::new())?;
        }
        ViewState::Empty(message) => note(message),
        ViewState::Ready(items) if as_json => json_pretty(items)?,
        ViewState::Ready(items) => {
            for item in items {
                render(item);
            }
        }
    }
    Ok(())
}

pub fn display_name(identity: &Identity) -> &str {
    if identity.name.trim().is_empty() {
        "(no name)"
    } else {
        &identity.name
    }
}

pub fn identity(identity: &Identity) {
    field("Name", display_name(identity));
    field("ID", &identity.id.to_string());
    for (label, value) in identity.profile_fields() {
        field(label, value);
    }
}

pub fn post(post: &Post) {
    let author = post.user_name.as_deref().unwrap_or("Unknown user");
    let when = post
        .created_at
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default();
    let likes = if post.liked_by_current_user {
        format!("♥ {}", post.like_count).red().to_string()
    } else {
        format!("♡ {}", post.like_count)
    };

    println!(
        "{} {} {} {}",
        format!("#{}", post.id).bold(),
        author.cyan(),
        when.dimmed(),
        likes
    );
    println!("  {}", post.content);
    if !post.tags.is_empty() {
        let tags: Vec<String> = post.tags.iter().map(|t| format!("#{}", t)).collect();
        println!("  {}", tags.join(" ").blue());
    }
    if let Some(ref url) = post.image_url {
        println!("  {} {}", "image:".dimmed(), url);
    }
    println!();
}

pub fn comment(comment: &Comment) {
    let author = comment.user_name.as_deref().unwrap_or("Unknown user");
    let when = comment
        .created_at
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default();
    println!(
        "{} {} {}",
        format!("#{}", comment.id).bold(),
        author.cyan(),
        when.dimmed()
    );
    println!("  {}", comment.content);
}

pub fn user(user: &UserSummary) {
    let name = user.name.as_deref().unwrap_or("(no name)");
    match user.email.as_deref() {
        Some(email) => println!("{} {} {}", format!("#{}", user.id).bold(), name, email.dimmed()),
        None => println!("{} {}", format!("#{}", user.id).bold(), name),
    }
}
