//! Typed REST operations.
//!
//! Each operation is a method on [`ApiClient`](crate::transport::ApiClient)
//! and goes through the same credential and 401 handling as every other
//! request. Text inputs are trimmed and required ones are checked before
//! any request is made.

mod comments;
mod posts;
mod users;

use crate::error::{Error, InvalidInputError};

/// Trim `value` and reject it if nothing is left.
fn required<'a>(value: &'a str, field: &'static str) -> Result<&'a str, Error> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(InvalidInputError::Empty { field }.into());
    }
    Ok(trimmed)
}

/// Percent-encode a value for use as a single path segment.
fn path_segment(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}
