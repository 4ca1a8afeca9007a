//! Comment endpoints.

use reqwest::Method;
use tracing::instrument;

use crate::error::Error;
use crate::model::{Comment, ContentRequest};
use crate::transport::ApiClient;
use crate::types::{CommentId, PostId};

use super::required;

impl ApiClient {
    /// Comment on a post.
    ///
    /// # Errors
    ///
    /// Rejects empty content before making a request.
    #[instrument(skip(self, content))]
    pub async fn add_comment(&self, post: PostId, content: &str) -> Result<Comment, Error> {
        let content = required(content, "comment")?;
        self.post(
            &format!("/posts/{}/comments", post),
            &ContentRequest { content },
        )
        .await
    }

    pub async fn list_comments(&self, post: PostId) -> Result<Vec<Comment>, Error> {
        self.get_list(&format!("/posts/{}/comments", post)).await
    }

    #[instrument(skip(self))]
    pub async fn delete_comment(&self, id: CommentId) -> Result<(), Error> {
        self.execute(Method::DELETE, &format!("/comments/{}", id))
            .await
    }
}
