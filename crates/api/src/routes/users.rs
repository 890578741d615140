//! User endpoint handlers.

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use domain::models::User;
use persistence::repositories::UserRepository;

use crate::app::AppState;
use crate::error::ApiError;

/// List all registered users.
///
/// GET /api/v1/users
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, ApiError> {
    let repo = UserRepository::new(state.pool.clone());
    let users: Vec<User> = repo.list_all().await?.into_iter().map(Into::into).collect();

    Ok(Json(users))
}

/// Get a single user by ID.
///
/// GET /api/v1/users/:user_id
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<User>, ApiError> {
    // A malformed id is a client error, not a missing resource.
    let user_id = Uuid::parse_str(&user_id)
        .map_err(|_| ApiError::Validation("Invalid user id".to_string()))?;

    let repo = UserRepository::new(state.pool.clone());
    let entity = repo
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(entity.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_uuid_is_rejected() {
        assert!(Uuid::parse_str("not-a-uuid").is_err());
        assert!(Uuid::parse_str("550e8400-e29b-41d4-a716-446655440000").is_ok());
    }
}
