//! collegeconnect - CollegeConnect client library
//!
//! This library provides the session lifecycle and HTTP transport of a
//! CollegeConnect client. A single [`SessionStore`] decides who is logged
//! in; every request goes through an [`ApiClient`] that attaches the stored
//! credential and invalidates the session when the server answers 401.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use collegeconnect::auth::MemoryCredentialStore;
//! use collegeconnect::transport::TracingNavigator;
//! use collegeconnect::view::{ListLabels, ViewState};
//! use collegeconnect::{Client, ClientConfig};
//!
//! # async fn example() -> Result<(), collegeconnect::Error> {
//! let client = Client::new(
//!     &ClientConfig::default(),
//!     Arc::new(MemoryCredentialStore::new()),
//!     Arc::new(TracingNavigator),
//! )?;
//!
//! client.initialize().await;
//! let identity = client.login("token-from-oauth-callback").await?;
//! println!("Logged in as {}", identity.name);
//!
//! let feed = ViewState::from_list(client.api().feed().await, &ListLabels::FEED);
//! if let Some(posts) = feed.content() {
//!     for post in posts {
//!         println!("{}: {}", post.id, post.content);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

mod api;
pub mod auth;
mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod transport;
pub mod types;
pub mod view;

// Re-export primary types at crate root for convenience
pub use auth::{BearerToken, Identity, SessionStatus, SessionStore};
pub use client::Client;
pub use config::ClientConfig;
pub use error::{Error, ErrorCategory};
pub use model::{Comment, NewPost, Post, ProfileUpdate, UserSummary};
pub use transport::ApiClient;
pub use types::{ApiUrl, CommentId, PostId, UserId};

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
