//! User and follow endpoints.

use reqwest::Method;
use tracing::{debug, instrument};

use crate::error::Error;
use crate::model::{ProfileUpdate, UserSummary};
use crate::transport::ApiClient;
use crate::types::UserId;

impl ApiClient {
    /// Search users by name, case-insensitively.
    ///
    /// A blank query returns no results without contacting the server.
    #[instrument(skip(self))]
    pub async fn search_users(&self, query: &str) -> Result<Vec<UserSummary>, Error> {
        let query = query.trim();
        if query.is_empty() {
            debug!("Blank search query");
            return Ok(Vec::new());
        }
        self.get_list_with("/user/search", &[("query", query)])
            .await
    }

    pub async fn followers(&self, user: UserId) -> Result<Vec<UserSummary>, Error> {
        self.get_list(&format!("/user/{}/followers", user)).await
    }

    pub async fn following(&self, user: UserId) -> Result<Vec<UserSummary>, Error> {
        self.get_list(&format!("/user/{}/following", user)).await
    }

    #[instrument(skip(self))]
    pub async fn follow(&self, user: UserId) -> Result<(), Error> {
        self.execute(Method::POST, &format!("/user/{}/follow", user))
            .await
    }

    #[instrument(skip(self))]
    pub async fn unfollow(&self, user: UserId) -> Result<(), Error> {
        self.execute(Method::DELETE, &format!("/user/{}/follow", user))
            .await
    }

    /// Overwrite the current user's editable profile fields.
    ///
    /// Fields left `None` are cleared on the server; start from
    /// [`ProfileUpdate::from_identity`] to keep them.
    #[instrument(skip_all)]
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<(), Error> {
        self.put("/user/update", update).await
    }
}
