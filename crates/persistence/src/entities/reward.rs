//! Reward and redemption entities (database row mappings).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use std::str::FromStr;
use uuid::Uuid;

use domain::models::reward::RedemptionStatus;
use domain::models::{Redemption, Reward};

/// Database row mapping for the rewards table.
#[derive(Debug, Clone, FromRow)]
pub struct RewardEntity {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub cost_points: i32,
    pub stock: i32,
    pub created_at: DateTime<Utc>,
}

impl From<RewardEntity> for Reward {
    fn from(entity: RewardEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            description: entity.description,
            cost_points: entity.cost_points,
            stock: entity.stock,
            created_at: entity.created_at,
        }
    }
}

/// Database row mapping for the redemptions table.
#[derive(Debug, Clone, FromRow)]
pub struct RedemptionEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub reward_id: Uuid,
    pub points_spent: i32,
    pub status: String,
    pub redeemed_at: DateTime<Utc>,
}

impl From<RedemptionEntity> for Redemption {
    fn from(entity: RedemptionEntity) -> Self {
        Self {
            id: entity.id,
            user_id: entity.user_id,
            reward_id: entity.reward_id,
            points_spent: entity.points_spent,
            status: RedemptionStatus::from_str(&entity.status)
                .unwrap_or(RedemptionStatus::Confirmed), // Default fallback
            redeemed_at: entity.redeemed_at,
        }
    }
}
