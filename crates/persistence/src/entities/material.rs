//! Material entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the materials table.
#[derive(Debug, Clone, FromRow)]
pub struct MaterialEntity {
    pub id: Uuid,
    pub name: String,
    pub points_per_kg: f64,
    pub created_at: DateTime<Utc>,
}

impl From<MaterialEntity> for domain::models::Material {
    fn from(entity: MaterialEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            points_per_kg: entity.points_per_kg,
            created_at: entity.created_at,
        }
    }
}
