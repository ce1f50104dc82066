//! Registered users.

use serde::{Deserialize, Serialize};

use crate::types::UserId;

/// A registered person.
///
/// Serializes as `{"username": ..., "_id": ...}`, which is the shape returned
/// by registration and by the user listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    /// Display name. Not unique.
    pub username: String,

    /// Store-assigned identifier.
    #[serde(rename = "_id")]
    pub id: UserId,
}

impl User {
    pub fn new(id: UserId, username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            id,
        }
    }
}
