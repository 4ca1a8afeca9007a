//! OAuth handoff helpers.
//!
//! Login starts with an external redirect to the backend's authorization
//! endpoint. The provider eventually sends the user back to a callback
//! route whose query string carries either `token` or `error`.

use url::Url;

use crate::error::{AuthError, Error, InvalidInputError};
use crate::types::ApiUrl;

use super::BearerToken;

/// Provider used when none is given.
pub const DEFAULT_PROVIDER: &str = "google";

/// Returns the authorization endpoint for `provider`.
///
/// The endpoint lives at the server origin, outside the API base path:
///
/// ```
/// use collegeconnect::ApiUrl;
/// use collegeconnect::auth::authorization_url;
///
/// let api = ApiUrl::new("http://localhost:8080/api").unwrap();
/// assert_eq!(
///     authorization_url(&api, "google"),
///     "http://localhost:8080/oauth2/authorization/google"
/// );
/// ```
pub fn authorization_url(api: &ApiUrl, provider: &str) -> String {
    format!("{}/oauth2/authorization/{}", api.origin(), provider.trim())
}

/// What the callback route received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackOutcome {
    /// The provider issued a credential.
    Token(BearerToken),
    /// The provider reported an error.
    Denied(String),
    /// Neither a token nor an error was present.
    Missing,
}

impl CallbackOutcome {
    /// Parse the full callback URL.
    ///
    /// A non-empty `token` parameter wins over `error`.
    ///
    /// # Errors
    ///
    /// Returns an error if `callback` is not an absolute URL.
    pub fn parse(callback: &str) -> Result<Self, Error> {
        let url = Url::parse(callback.trim()).map_err(|e| InvalidInputError::CallbackUrl {
            value: callback.to_string(),
            reason: e.to_string(),
        })?;

        let mut token = None;
        let mut error = None;
        for (key, value) in url.query_pairs() {
            match &*key {
                "token" if token.is_none() => token = BearerToken::new(&value).ok(),
                "error" if error.is_none() => error = Some(value.into_owned()),
                _ => {}
            }
        }

        Ok(match (token, error) {
            (Some(token), _) => CallbackOutcome::Token(token),
            (None, Some(reason)) => CallbackOutcome::Denied(reason),
            (None, None) => CallbackOutcome::Missing,
        })
    }

    /// Convert into the credential to log in with.
    ///
    /// # Errors
    ///
    /// [`AuthError::OAuthDenied`] or [`AuthError::MissingToken`].
    pub fn into_token(self) -> Result<BearerToken, Error> {
        match self {
            CallbackOutcome::Token(token) => Ok(token),
            CallbackOutcome::Denied(reason) => Err(AuthError::OAuthDenied { reason }.into()),
            CallbackOutcome::Missing => Err(AuthError::MissingToken.into()),
        }
    }

    /// The message a login screen shows for a failed callback.
    pub fn failure_message(&self) -> Option<String> {
        match self {
            CallbackOutcome::Token(_) => None,
            CallbackOutcome::Denied(reason) => Some(format!(
                "Authentication failed: {}. Please try again.",
                reason
            )),
            CallbackOutcome::Missing => {
                Some("Authentication callback failed. No token received.".to_string())
            }
        }
    }
}
