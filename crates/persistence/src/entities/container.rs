//! Container entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the containers table.
#[derive(Debug, Clone, FromRow)]
pub struct ContainerEntity {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub accepted_materials: String,
    pub collection_schedule: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<ContainerEntity> for domain::models::Container {
    fn from(entity: ContainerEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            address: entity.address,
            latitude: entity.latitude,
            longitude: entity.longitude,
            accepted_materials: entity.accepted_materials,
            collection_schedule: entity.collection_schedule,
            created_at: entity.created_at,
        }
    }
}
