//! The authenticated user's profile projection.

use serde::{Deserialize, Deserializer, Serialize};

use crate::types::UserId;

/// The profile returned by `GET /user/me` for a valid credential.
///
/// The session store replaces its identity wholesale on every successful
/// fetch and hands out shared references, so an `Identity` is never
/// mutated after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub id: UserId,
    /// Display name. The backend allows it to be unset; that reads as empty.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub profile_picture_url: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub study_year: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<String>,
    #[serde(default)]
    pub student_id: Option<String>,
    #[serde(default)]
    pub contact_number: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

impl Identity {
    /// Profile fields that are set, as `(label, value)` pairs in display order.
    pub fn profile_fields(&self) -> Vec<(&'static str, &str)> {
        [
            ("Email", &self.email),
            ("Department", &self.department),
            ("Year of Study", &self.study_year),
            ("Student ID", &self.student_id),
            ("Date of Birth", &self.date_of_birth),
            ("Contact Number", &self.contact_number),
            ("Address", &self.address),
        ]
        .into_iter()
        .filter_map(|(label, value)| {
            value
                .as_deref()
                .filter(|v| !v.trim().is_empty())
                .map(|v| (label, v))
        })
        .collect()
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
