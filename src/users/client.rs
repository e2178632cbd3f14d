//! Client helpers for the `/api/user` resource. These functions keep the
//! endpoint path centralized; each one issues exactly one request.

use crate::{
    api::{ApiClient, TransportError},
    users::types::User,
};
use serde_json::json;

const USER_PATH: &str = "/api/user";

/// Fetches the full user list.
///
/// # Errors
/// Returns a [`TransportError`] if the request or decoding fails.
pub async fn list_users(api: &ApiClient) -> Result<Vec<User>, TransportError> {
    api.get_json(USER_PATH).await
}

/// Creates a user; any `id` on the record is dropped from the request body.
///
/// # Errors
/// Returns a [`TransportError`] if the request or decoding fails.
pub async fn create_user(api: &ApiClient, user: &User) -> Result<User, TransportError> {
    let draft = User {
        id: None,
        ..user.clone()
    };

    api.post_json(USER_PATH, &draft).await
}

/// Replaces a persisted user; the record must carry its id.
///
/// # Errors
/// Returns [`TransportError::Config`] for a record without id, otherwise any
/// request or decoding failure.
pub async fn update_user(api: &ApiClient, user: &User) -> Result<User, TransportError> {
    if user.id.is_none() {
        return Err(TransportError::Config("User id is required.".to_string()));
    }

    api.put_json(USER_PATH, user).await
}

/// Deletes a user by id. The response body has no defined contract and is
/// discarded.
///
/// # Errors
/// Returns a [`TransportError`] if the request fails.
pub async fn delete_user(api: &ApiClient, id: i64) -> Result<(), TransportError> {
    api.delete_json(USER_PATH, &json!({ "id": id })).await
}
