//! Profile endpoint handlers.
//!
//! The profile aggregates the account, its delivery history, and the event
//! participations that earned it points.

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use domain::models::delivery::DeliveryWithNames;
use domain::models::User;
use persistence::entities::EventParticipationEntity;
use persistence::repositories::{DeliveryRepository, LedgerRepository, UserRepository};
use shared::validation::{normalize_email, validate_email_format};
use tracing::info;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::auth::Identity;

/// One event participation in the profile view.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventParticipationResponse {
    pub id: Uuid,
    pub event_name: Option<String>,
    pub points: i32,
    pub created_at: DateTime<Utc>,
}

impl From<EventParticipationEntity> for EventParticipationResponse {
    fn from(entity: EventParticipationEntity) -> Self {
        Self {
            id: entity.id,
            event_name: entity.event_name,
            points: entity.points,
            created_at: entity.created_at,
        }
    }
}

/// Full profile response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub user: User,
    pub deliveries: Vec<DeliveryWithNames>,
    pub event_participations: Vec<EventParticipationResponse>,
}

/// Request body for updating the profile.
///
/// Password changes are deliberately not accepted on this endpoint.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[validate(length(max = 255, message = "Address too long"))]
    pub address: Option<String>,

    pub password: Option<String>,
}

/// Get the authenticated user's profile with history.
///
/// GET /api/v1/profile
pub async fn get_profile(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<Json<ProfileResponse>, ApiError> {
    let users = UserRepository::new(state.pool.clone());
    let deliveries = DeliveryRepository::new(state.pool.clone());
    let ledger = LedgerRepository::new(state.pool.clone());

    let entity = users
        .find_by_id(identity.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let (history, participations) = tokio::try_join!(
        deliveries.list_for_user(identity.user_id),
        ledger.list_event_participations(identity.user_id),
    )?;

    Ok(Json(ProfileResponse {
        user: entity.into(),
        deliveries: history.into_iter().map(Into::into).collect(),
        event_participations: participations.into_iter().map(Into::into).collect(),
    }))
}

/// Update the authenticated user's profile.
///
/// PUT /api/v1/profile
pub async fn update_profile(
    State(state): State<AppState>,
    identity: Identity,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<User>, ApiError> {
    request.validate()?;

    if request.password.is_some() {
        return Err(ApiError::Validation(
            "Password cannot be changed through the profile endpoint".to_string(),
        ));
    }

    let email = match request.email.as_deref() {
        Some(raw) => {
            let normalized = normalize_email(raw);
            validate_email_format(&normalized)
                .map_err(|_| ApiError::Validation("Invalid email address".to_string()))?;
            Some(normalized)
        }
        None => None,
    };

    let repo = UserRepository::new(state.pool.clone());
    let entity = repo
        .update_profile(
            identity.user_id,
            request.name.as_deref(),
            email.as_deref(),
            request.address.as_deref(),
        )
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    info!(user_id = %identity.user_id, "Profile updated");

    Ok(Json(entity.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_profile_request_partial() {
        let json = r#"{"name": "Ana Torres"}"#;
        let request: UpdateProfileRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.name, Some("Ana Torres".to_string()));
        assert!(request.email.is_none());
        assert!(request.password.is_none());
    }

    #[test]
    fn test_update_profile_request_invalid_email() {
        let request = UpdateProfileRequest {
            name: None,
            email: Some("nope".to_string()),
            address: None,
            password: None,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_update_profile_request_carries_password_field() {
        let json = r#"{"password": "new-secret"}"#;
        let request: UpdateProfileRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.password, Some("new-secret".to_string()));
    }

    #[test]
    fn test_event_participation_response_from_entity() {
        let entity = EventParticipationEntity {
            id: Uuid::new_v4(),
            event_name: Some("River cleanup".to_string()),
            points: 50,
            created_at: Utc::now(),
        };
        let response: EventParticipationResponse = entity.into();
        assert_eq!(response.event_name.as_deref(), Some("River cleanup"));
        assert_eq!(response.points, 50);
    }
}
