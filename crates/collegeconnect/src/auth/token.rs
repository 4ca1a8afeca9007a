//! Bearer credential type.

use std::fmt;

use crate::error::{Error, InvalidInputError};

/// The opaque bearer token proving identity to the backend.
///
/// Tokens are issued by the OAuth handoff and carry no expiry metadata the
/// client can see; expiry is discovered only through a 401 response.
///
/// # Security
///
/// - Never logged or displayed in Debug output
/// - Treat as opaque; do not parse or inspect
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    /// Create a token from its string form.
    ///
    /// Surrounding whitespace is trimmed.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is empty or contains characters that
    /// cannot appear in an HTTP header.
    pub fn new(token: impl AsRef<str>) -> Result<Self, Error> {
        let token = token.as_ref().trim();
        if token.is_empty() {
            return Err(InvalidInputError::Token {
                reason: "token is empty".to_string(),
            }
            .into());
        }
        if token.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(InvalidInputError::Token {
                reason: "token contains whitespace or control characters".to_string(),
            }
            .into());
        }
        Ok(Self(token.to_string()))
    }

    /// Returns the token value.
    ///
    /// # Security
    ///
    /// Use only when constructing authorization headers or persisting the
    /// credential.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Hide token value in Debug output
impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("BearerToken").field(&"[REDACTED]").finish()
    }
}
