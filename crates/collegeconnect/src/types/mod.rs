//! Core CollegeConnect types.
//!
//! These types enforce their invariants at construction time,
//! ensuring invalid states are unrepresentable.

mod api_url;
mod ids;

pub use api_url::{ApiUrl, DEFAULT_API_URL};
pub use ids::{CommentId, PostId, UserId};
