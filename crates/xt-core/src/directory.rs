//! User registration and lookup.

use crate::error::ServiceError;
use crate::store::Store;
use crate::types::{UserId, ValidationError};
use crate::user::User;

/// Registers a new user.
///
/// The name is trimmed and must not be empty. Duplicate names are allowed.
pub fn register<S: Store + ?Sized>(store: &mut S, username: &str) -> Result<User, ServiceError> {
    let username = username.trim();
    if username.is_empty() {
        return Err(ValidationError::Empty { field: "username" }.into());
    }

    let id = store.insert_user(username)?;
    tracing::debug!(user_id = %id, username, "registered user");
    Ok(User::new(id, username))
}

/// Lists every registered user.
pub fn list_all<S: Store + ?Sized>(store: &S) -> Result<Vec<User>, ServiceError> {
    Ok(store.list_users()?)
}

/// Looks up a user by its raw identifier.
///
/// A blank identifier cannot match anything and is reported as absent.
pub fn find_by_id<S: Store + ?Sized>(store: &S, id: &str) -> Result<Option<User>, ServiceError> {
    let Ok(id) = UserId::new(id.trim()) else {
        return Ok(None);
    };
    Ok(store.find_user(&id)?)
}

/// Like [`find_by_id`], but a missing user is an error.
pub(crate) fn require<S: Store + ?Sized>(store: &S, id: &str) -> Result<User, ServiceError> {
    find_by_id(store, id)?.ok_or(ServiceError::UserNotFound)
}
