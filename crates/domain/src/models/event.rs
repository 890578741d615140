//! Environmental event domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A community environmental event (cleanup day, recycling drive, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EcoEvent {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub location: Option<String>,
    pub points_reward: Option<i32>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub created_at: DateTime<Utc>,
}

/// Request payload for creating an event.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    #[validate(length(min = 1, max = 150, message = "Name must be 1-150 characters"))]
    pub name: String,

    #[validate(length(max = 2000, message = "Description too long"))]
    pub description: Option<String>,

    pub starts_at: DateTime<Utc>,

    #[validate(length(max = 255, message = "Location too long"))]
    pub location: Option<String>,

    #[validate(range(min = 0, message = "Points reward must be non-negative"))]
    pub points_reward: Option<i32>,

    #[validate(custom(function = "shared::validation::validate_latitude"))]
    pub latitude: Option<f64>,

    #[validate(custom(function = "shared::validation::validate_longitude"))]
    pub longitude: Option<f64>,
}

/// Request payload for updating an event.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventRequest {
    #[validate(length(min = 1, max = 150, message = "Name must be 1-150 characters"))]
    pub name: Option<String>,

    #[validate(length(max = 2000, message = "Description too long"))]
    pub description: Option<String>,

    pub starts_at: Option<DateTime<Utc>>,

    #[validate(length(max = 255, message = "Location too long"))]
    pub location: Option<String>,

    #[validate(range(min = 0, message = "Points reward must be non-negative"))]
    pub points_reward: Option<i32>,

    #[validate(custom(function = "shared::validation::validate_latitude"))]
    pub latitude: Option<f64>,

    #[validate(custom(function = "shared::validation::validate_longitude"))]
    pub longitude: Option<f64>,
}

/// Request payload for awarding event points to a participant.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AwardEventPointsRequest {
    pub user_id: Uuid,

    #[validate(range(min = 1, message = "Points must be positive"))]
    pub points: i32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_create_event_request_valid() {
        let req = CreateEventRequest {
            name: "River cleanup".to_string(),
            description: Some("Bring gloves".to_string()),
            starts_at: Utc::now(),
            location: Some("Parque Central".to_string()),
            points_reward: Some(50),
            latitude: Some(-33.4),
            longitude: Some(-70.6),
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_create_event_request_negative_reward() {
        let req = CreateEventRequest {
            name: "River cleanup".to_string(),
            description: None,
            starts_at: Utc::now(),
            location: None,
            points_reward: Some(-5),
            latitude: None,
            longitude: None,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_award_points_request_zero_rejected() {
        let req = AwardEventPointsRequest {
            user_id: Uuid::new_v4(),
            points: 0,
        };
        assert!(req.validate().is_err());

        let req = AwardEventPointsRequest {
            user_id: Uuid::new_v4(),
            points: 25,
        };
        assert!(req.validate().is_ok());
    }
}
