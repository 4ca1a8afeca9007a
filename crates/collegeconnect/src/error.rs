//! Error types for the collegeconnect library.
//!
//! This module provides a unified error type with explicit variants for
//! transport, authentication, protocol, payload, input validation and
//! storage errors. [`Error::category`] projects every error onto the
//! taxonomy front ends use to pick a message.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Maximum length for error response bodies kept in error messages.
const MAX_ERROR_BODY_LENGTH: usize = 500;

/// The unified error type for collegeconnect operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Network transport errors: the request never got a response.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Authentication errors (expired credential, superseded login, OAuth denial).
    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),

    /// The server answered with a non-success status other than 401.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// The server answered 2xx but the payload does not have the expected shape.
    #[error("malformed response: {0}")]
    MalformedResponse(#[from] MalformedResponseError),

    /// Input rejected before any request was made.
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),

    /// Durable credential storage failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// No response reached the client.
    Network,
    /// HTTP 401: the credential is invalid or expired.
    Unauthorized,
    /// HTTP 403: valid credential, insufficient rights.
    Forbidden,
    /// HTTP 404.
    NotFound,
    /// Any other 4xx/5xx status.
    Server,
    /// 2xx with a payload of the wrong shape.
    Malformed,
    /// Client-side validation failure.
    InvalidInput,
    /// Credential storage failure.
    Storage,
    /// Session bookkeeping outcomes that are not HTTP failures.
    Session,
}

impl Error {
    /// Classify this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Transport(_) => ErrorCategory::Network,
            Error::Auth(AuthError::SessionExpired) => ErrorCategory::Unauthorized,
            Error::Auth(_) => ErrorCategory::Session,
            Error::Protocol(e) if e.is_forbidden() => ErrorCategory::Forbidden,
            Error::Protocol(e) if e.is_not_found() => ErrorCategory::NotFound,
            Error::Protocol(_) => ErrorCategory::Server,
            Error::MalformedResponse(_) => ErrorCategory::Malformed,
            Error::InvalidInput(_) => ErrorCategory::InvalidInput,
            Error::Storage(_) => ErrorCategory::Storage,
        }
    }

    /// Returns true if this error means the credential was rejected.
    pub fn is_unauthorized(&self) -> bool {
        self.category() == ErrorCategory::Unauthorized
    }
}

/// Transport-level errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// Request timed out.
    #[error("request timed out")]
    Timeout,

    /// Generic HTTP client error.
    #[error("HTTP error: {message}")]
    Http { message: String },
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout
        } else if err.is_connect() {
            TransportError::Connection {
                message: err.to_string(),
            }
        } else {
            TransportError::Http {
                message: err.to_string(),
            }
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Transport(TransportError::from(err))
    }
}

/// Authentication-related errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The server rejected the credential (HTTP 401).
    #[error("session expired")]
    SessionExpired,

    /// An operation needs a logged-in user and there is none.
    #[error("not logged in")]
    NotLoggedIn,

    /// A newer login or a logout happened while this login was in flight.
    #[error("login superseded by a newer session change")]
    Superseded,

    /// The OAuth provider redirected back with an error.
    #[error("authorization denied: {reason}")]
    OAuthDenied { reason: String },

    /// The OAuth callback carried neither a token nor an error.
    #[error("callback carried no token")]
    MissingToken,
}

/// A non-success HTTP response other than 401.
#[derive(Debug)]
pub struct ProtocolError {
    /// HTTP status code.
    pub status: u16,
    /// Error message from the server, if any.
    pub message: Option<String>,
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}", self.status)?;
        if let Some(ref message) = self.message {
            write!(f, ": {}", message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ProtocolError {}

impl ProtocolError {
    /// Create a new protocol error.
    pub fn new(status: u16, message: Option<String>) -> Self {
        Self { status, message }
    }

    /// Build a protocol error from a raw response body.
    ///
    /// JSON bodies carrying `message` or `error` keep that field; any other
    /// non-empty body is kept as text, truncated to a bounded length.
    pub fn from_body(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|value| {
                ["message", "error"].iter().find_map(|key| {
                    value
                        .get(key)
                        .and_then(|v| v.as_str())
                        .map(str::to_string)
                })
            })
            .or_else(|| {
                let trimmed = body.trim();
                (!trimmed.is_empty()).then(|| truncate_body(trimmed))
            });

        Self::new(status, message)
    }

    /// HTTP 403.
    pub fn is_forbidden(&self) -> bool {
        self.status == 403
    }

    /// HTTP 404.
    pub fn is_not_found(&self) -> bool {
        self.status == 404
    }
}

fn truncate_body(body: &str) -> String {
    if body.len() <= MAX_ERROR_BODY_LENGTH {
        return body.to_string();
    }
    let mut end = MAX_ERROR_BODY_LENGTH;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!(
        "{}... (truncated, {} total bytes)",
        &body[..end],
        body.len()
    )
}

/// A 2xx response whose payload failed the expected-shape check.
#[derive(Debug, Error)]
#[error("{endpoint}: {reason}")]
pub struct MalformedResponseError {
    /// Endpoint path the payload came from.
    pub endpoint: String,
    /// What was wrong with it.
    pub reason: String,
}

impl MalformedResponseError {
    pub fn new(endpoint: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            reason: reason.into(),
        }
    }
}

/// Input validation errors.
#[derive(Debug, Error)]
pub enum InvalidInputError {
    /// Invalid base URL.
    #[error("invalid API URL '{value}': {reason}")]
    ApiUrl { value: String, reason: String },

    /// Empty or malformed bearer token.
    #[error("invalid token: {reason}")]
    Token { reason: String },

    /// Invalid callback URL.
    #[error("invalid callback URL '{value}': {reason}")]
    CallbackUrl { value: String, reason: String },

    /// A required text field was empty.
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },
}

/// Credential storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the credential file failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The credential could not be serialized.
    #[error("failed to encode credential: {0}")]
    Encode(#[from] serde_json::Error),
}
