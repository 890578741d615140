//! Environmental event entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the eco_events table.
#[derive(Debug, Clone, FromRow)]
pub struct EcoEventEntity {
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

impl From<EcoEventEntity> for domain::models::EcoEvent {
    fn from(entity: EcoEventEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            description: entity.description,
            starts_at: entity.starts_at,
            location: entity.location,
            points_reward: entity.points_reward,
            latitude: entity.latitude,
            longitude: entity.longitude,
            created_at: entity.created_at,
        }
    }
}
