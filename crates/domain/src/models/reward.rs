//! Reward catalog and redemption domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

/// An item users can redeem points for.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reward {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub cost_points: i32,
    pub stock: i32,
    pub created_at: DateTime<Utc>,
}

/// Fulfilment state of a redemption.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RedemptionStatus {
    Pending,
    Confirmed,
    Rejected,
}

impl RedemptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RedemptionStatus::Pending => "pending",
            RedemptionStatus::Confirmed => "confirmed",
            RedemptionStatus::Rejected => "rejected",
        }
    }
}

impl FromStr for RedemptionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(RedemptionStatus::Pending),
            "confirmed" => Ok(RedemptionStatus::Confirmed),
            "rejected" => Ok(RedemptionStatus::Rejected),
            _ => Err(format!("Invalid redemption status: {}", s)),
        }
    }
}

impl fmt::Display for RedemptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A completed points-for-reward exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Redemption {
    pub id: Uuid,
    pub user_id: Uuid,
    pub reward_id: Uuid,
    pub points_spent: i32,
    pub status: RedemptionStatus,
    pub redeemed_at: DateTime<Utc>,
}

/// Request payload for creating a reward.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateRewardRequest {
    #[validate(length(min = 1, max = 150, message = "Name must be 1-150 characters"))]
    pub name: String,

    #[validate(length(max = 2000, message = "Description too long"))]
    pub description: Option<String>,

    #[validate(range(min = 1, message = "Cost must be positive"))]
    pub cost_points: i32,

    #[validate(range(min = 0, message = "Stock must be non-negative"))]
    pub stock: i32,
}

/// Request payload for updating a reward.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRewardRequest {
    #[validate(length(min = 1, max = 150, message = "Name must be 1-150 characters"))]
    pub name: Option<String>,

    #[validate(length(max = 2000, message = "Description too long"))]
    pub description: Option<String>,

    #[validate(range(min = 1, message = "Cost must be positive"))]
    pub cost_points: Option<i32>,

    #[validate(range(min = 0, message = "Stock must be non-negative"))]
    pub stock: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_redemption_status_roundtrip() {
        for s in ["pending", "confirmed", "rejected"] {
            let status = RedemptionStatus::from_str(s).unwrap();
            assert_eq!(status.as_str(), s);
        }
        assert!(RedemptionStatus::from_str("shipped").is_err());
    }

    #[test]
    fn test_create_reward_request_validation() {
        let req = CreateRewardRequest {
            name: "Reusable bottle".to_string(),
            description: None,
            cost_points: 100,
            stock: 10,
        };
        assert!(req.validate().is_ok());

        let req = CreateRewardRequest {
            name: "Free item".to_string(),
            description: None,
            cost_points: 0,
            stock: 10,
        };
        assert!(req.validate().is_err());

        let req = CreateRewardRequest {
            name: "Bottle".to_string(),
            description: None,
            cost_points: 50,
            stock: -1,
        };
        assert!(req.validate().is_err());
    }
}
