//! View states for data-driven screens.
//!
//! Every data view renders exactly one of loading, error, empty or content.
//! [`ViewState::from_list`] turns the result of a list operation into that
//! state, so a malformed payload ends up as an error message with zero
//! items instead of a crash.

use crate::error::{Error, ErrorCategory};

/// Message shown when a 2xx payload has the wrong shape.
pub const MALFORMED_MESSAGE: &str = "Received invalid data format from server.";

/// Message shown after the server rejected the credential.
pub const SESSION_EXPIRED_MESSAGE: &str = "Your session has expired. Please log in again.";

/// Wording for one kind of list view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListLabels {
    /// Plural noun used in error messages, e.g. "posts".
    pub noun: &'static str,
    /// Message shown when the list is empty.
    pub empty: &'static str,
}

impl ListLabels {
    pub const POSTS: Self = Self {
        noun: "posts",
        empty: "No posts found.",
    };

    pub const FEED: Self = Self {
        noun: "posts",
        empty: "No posts from users you follow yet. Follow some users to see their posts here!",
    };

    pub const COMMENTS: Self = Self {
        noun: "comments",
        empty: "No comments yet.",
    };

    pub const USERS: Self = Self {
        noun: "users",
        empty: "No users found.",
    };
}

/// Exactly one of the four states a data view can be in.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState<T> {
    Loading,
    Failed(String),
    Empty(String),
    Ready(T),
}

impl<T> ViewState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }

    /// The error or empty message, if the view shows one.
    pub fn message(&self) -> Option<&str> {
        match self {
            ViewState::Failed(message) | ViewState::Empty(message) => Some(message),
            ViewState::Loading | ViewState::Ready(_) => None,
        }
    }

    pub fn content(&self) -> Option<&T> {
        match self {
            ViewState::Ready(content) => Some(content),
            _ => None,
        }
    }
}

impl<T> ViewState<Vec<T>> {
    /// Build the state of a list view from an operation result.
    pub fn from_list(result: Result<Vec<T>, Error>, labels: &ListLabels) -> Self {
        match result {
            Ok(items) if items.is_empty() => ViewState::Empty(labels.empty.to_string()),
            Ok(items) => ViewState::Ready(items),
            Err(e) => ViewState::Failed(error_message(&e, labels.noun)),
        }
    }

    /// Number of items shown; zero unless the view has content.
    pub fn len(&self) -> usize {
        self.content().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The message a view shows when fetching `noun` failed.
pub fn error_message(error: &Error, noun: &str) -> String {
    match (error.category(), error) {
        (ErrorCategory::Malformed, _) => MALFORMED_MESSAGE.to_string(),
        (ErrorCategory::Unauthorized, _) => SESSION_EXPIRED_MESSAGE.to_string(),
        (ErrorCategory::Network, _) => {
            format!("Failed to fetch {}. No response from server.", noun)
        }
        (_, Error::Protocol(e)) => format!(
            "Failed to fetch {}. Status: {}. {}",
            noun,
            e.status,
            e.message.as_deref().unwrap_or_default()
        )
        .trim_end()
        .to_string(),
        (_, other) => format!("Failed to fetch {}. Error: {}", noun, other),
    }
}
