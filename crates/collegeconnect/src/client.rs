//! The client a front end constructs once at start-up.

use std::sync::Arc;

use tracing::instrument;

use crate::auth::{
    BearerToken, CallbackOutcome, CredentialStore, Identity, SessionStatus, SessionStore,
    authorization_url,
};
use crate::config::ClientConfig;
use crate::error::{AuthError, Error};
use crate::model::ProfileUpdate;
use crate::transport::{ApiClient, Navigator};

/// Session store and transport wired to the same credential slot.
///
/// Cheap to clone; clones share all state.
#[derive(Debug, Clone)]
pub struct Client {
    session: SessionStore,
    api: ApiClient,
}

impl Client {
    /// Build a client.
    ///
    /// # Errors
    ///
    /// Returns a transport error if the HTTP client cannot be built.
    pub fn new(
        config: &ClientConfig,
        credentials: Arc<dyn CredentialStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, Error> {
        let session = SessionStore::new(credentials);
        let api = ApiClient::new(config, session.clone(), navigator)?;
        Ok(Self { session, api })
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// The transport, for REST operations.
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Revalidate the stored credential. See [`SessionStore::initialize`].
    pub async fn initialize(&self) -> SessionStatus {
        self.session.initialize(&self.api).await
    }

    /// Log in with a credential obtained from the OAuth handoff.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is empty, or if the identity fetch
    /// fails (the credential is then deleted).
    pub async fn login(&self, token: &str) -> Result<Arc<Identity>, Error> {
        let token = BearerToken::new(token)?;
        self.session.login(token, &self.api).await
    }

    /// Log in from the URL the OAuth callback route was opened with.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::OAuthDenied`] or [`AuthError::MissingToken`]
    /// when the callback carries no usable token, otherwise as
    /// [`login`](Self::login).
    pub async fn login_with_callback(&self, callback_url: &str) -> Result<Arc<Identity>, Error> {
        let token = CallbackOutcome::parse(callback_url)?.into_token()?;
        self.session.login(token, &self.api).await
    }

    pub fn logout(&self) {
        self.session.logout();
    }

    /// Where to send the user to start an OAuth login.
    pub fn authorization_url(&self, provider: &str) -> String {
        authorization_url(self.api.base_url(), provider)
    }

    /// The current identity, or [`AuthError::NotLoggedIn`].
    pub fn require_identity(&self) -> Result<Arc<Identity>, Error> {
        self.session
            .identity()
            .ok_or_else(|| AuthError::NotLoggedIn.into())
    }

    /// Update the profile, then reload the identity so the session reflects
    /// the change.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::NotLoggedIn`] without a stored credential, or
    /// the update or reload error.
    #[instrument(skip_all)]
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<Arc<Identity>, Error> {
        let credential = self
            .session
            .credential()
            .ok_or(AuthError::NotLoggedIn)?;
        self.api.update_profile(update).await?;
        self.session.login(credential, &self.api).await
    }
}
