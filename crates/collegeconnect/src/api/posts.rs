//! Post endpoints.

use reqwest::Method;
use reqwest::multipart::{Form, Part};
use tracing::{debug, instrument};

use crate::error::{Error, InvalidInputError};
use crate::model::{ContentRequest, NewPost, Post, SuggestTagsResponse, UploadResponse};
use crate::transport::ApiClient;
use crate::types::{PostId, UserId};

use super::{path_segment, required};

impl ApiClient {
    /// Publish a post.
    ///
    /// # Errors
    ///
    /// Rejects empty content before making a request.
    #[instrument(skip(self, post), fields(tags = post.tags.len()))]
    pub async fn create_post(&self, post: &NewPost) -> Result<Post, Error> {
        let content = required(&post.content, "post content")?;
        let body = NewPost {
            content: content.to_string(),
            ..post.clone()
        };
        self.post("/posts", &body).await
    }

    /// Every post, newest first.
    pub async fn list_posts(&self) -> Result<Vec<Post>, Error> {
        self.get_list("/posts").await
    }

    /// Posts by users the current user follows.
    pub async fn feed(&self) -> Result<Vec<Post>, Error> {
        self.get_list("/posts/feed").await
    }

    /// The current user's own posts.
    pub async fn my_posts(&self) -> Result<Vec<Post>, Error> {
        self.get_list("/posts/my-posts").await
    }

    pub async fn user_posts(&self, user: UserId) -> Result<Vec<Post>, Error> {
        self.get_list(&format!("/posts/user/{}", user)).await
    }

    /// Posts carrying `tag`. A leading `#` is ignored.
    pub async fn posts_by_tag(&self, tag: &str) -> Result<Vec<Post>, Error> {
        let tag = required(tag.trim().trim_start_matches('#'), "tag")?;
        self.get_list(&format!("/posts/tag/{}", path_segment(tag)))
            .await
    }

    #[instrument(skip(self))]
    pub async fn delete_post(&self, id: PostId) -> Result<(), Error> {
        self.execute(Method::DELETE, &format!("/posts/{}", id)).await
    }

    /// Upload an image and return its hosted URL, for use in
    /// [`NewPost::with_image_url`].
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    pub async fn upload_image(&self, file_name: &str, bytes: Vec<u8>) -> Result<String, Error> {
        if bytes.is_empty() {
            return Err(InvalidInputError::Empty { field: "image" }.into());
        }

        let part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(image_content_type(file_name))?;
        let form = Form::new().part("file", part);

        let response: UploadResponse = self.post_multipart("/posts/upload", form).await?;
        debug!(url = %response.image_url, "Image uploaded");
        Ok(response.image_url)
    }

    /// Ask the backend to suggest tags for draft content.
    pub async fn suggest_tags(&self, content: &str) -> Result<Vec<String>, Error> {
        let content = required(content, "content")?;
        let response: SuggestTagsResponse = self
            .post("/posts/suggest-tags", &ContentRequest { content })
            .await?;
        Ok(response.suggested_tags)
    }

    /// Like a post and return its updated state.
    pub async fn like_post(&self, id: PostId) -> Result<Post, Error> {
        self.call(Method::POST, &format!("/posts/{}/like", id)).await
    }

    /// Remove a like and return the post's updated state.
    pub async fn unlike_post(&self, id: PostId) -> Result<Post, Error> {
        self.call(Method::DELETE, &format!("/posts/{}/like", id))
            .await
    }
}

fn image_content_type(file_name: &str) -> &'static str {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}
