//! Records exchanged with the CollegeConnect REST API.

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};

use crate::auth::Identity;
use crate::types::{CommentId, PostId, UserId};

/// Short public projection of a user, as returned by search and follow lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: UserId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub profile_picture_url: Option<String>,
}

/// A post as rendered in lists and feeds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: PostId,
    #[serde(default)]
    pub content: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub user_id: Option<UserId>,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub user_profile_picture_url: Option<String>,
    #[serde(default)]
    pub like_count: u32,
    #[serde(default)]
    pub liked_by_current_user: bool,
}

/// A comment on a post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: CommentId,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub user_id: Option<UserId>,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub post_id: Option<PostId>,
}

/// Request body for creating a post.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPost {
    pub content: String,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl NewPost {
    /// A text-only post.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    /// Append a tag, ignoring blanks and case-insensitive duplicates.
    pub fn with_tag(mut self, tag: impl AsRef<str>) -> Self {
        self.push_tag(tag);
        self
    }

    /// Attach an uploaded image URL.
    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    /// Append a tag, ignoring blanks and case-insensitive duplicates.
    ///
    /// Returns true if the tag was added.
    pub fn push_tag(&mut self, tag: impl AsRef<str>) -> bool {
        let tag = tag.as_ref().trim().trim_start_matches('#');
        if tag.is_empty() || self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag)) {
            return false;
        }
        self.tags.push(tag.to_string());
        true
    }
}

/// Request body for `PUT /user/update`.
///
/// The backend overwrites every field, so updates start from the current
/// identity and change only what the user edited.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub department: Option<String>,
    pub study_year: Option<String>,
    pub contact_number: Option<String>,
    pub address: Option<String>,
}

impl ProfileUpdate {
    /// Pre-fill an update with the identity's current values.
    pub fn from_identity(identity: &Identity) -> Self {
        Self {
            name: Some(identity.name.clone()),
            department: identity.department.clone(),
            study_year: identity.study_year.clone(),
            contact_number: identity.contact_number.clone(),
            address: identity.address.clone(),
        }
    }
}

/// Response of `POST /posts/upload`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UploadResponse {
    pub image_url: String,
}

/// Request body shared by comment creation and tag suggestion.
#[derive(Debug, Serialize)]
pub(crate) struct ContentRequest<'a> {
    pub content: &'a str,
}

/// Response of `POST /posts/suggest-tags`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SuggestTagsResponse {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub suggested_tags: Vec<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}
