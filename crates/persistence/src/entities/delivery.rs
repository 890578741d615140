//! Delivery entities (database row mappings).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use std::str::FromStr;
use uuid::Uuid;

use domain::models::{Delivery, DeliveryStatus};

/// Database row mapping for the deliveries table.
#[derive(Debug, Clone, FromRow)]
pub struct DeliveryEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub container_id: Option<Uuid>,
    pub material_id: Option<Uuid>,
    pub material_details: Option<String>,
    pub packaging_type: Option<String>,
    pub preferred_time: Option<String>,
    pub address: Option<String>,
    pub weight_kg: f64,
    pub points_awarded: i32,
    pub status: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub requested_at: DateTime<Utc>,
    pub delivered_at: Option<DateTime<Utc>>,
}

impl From<DeliveryEntity> for Delivery {
    fn from(entity: DeliveryEntity) -> Self {
        Self {
            id: entity.id,
            user_id: entity.user_id,
            container_id: entity.container_id,
            material_id: entity.material_id,
            material_details: entity.material_details,
            packaging_type: entity.packaging_type,
            preferred_time: entity.preferred_time,
            address: entity.address,
            weight_kg: entity.weight_kg,
            points_awarded: entity.points_awarded,
            status: DeliveryStatus::from_str(&entity.status)
                .unwrap_or(DeliveryStatus::Pending), // Default fallback
            latitude: entity.latitude,
            longitude: entity.longitude,
            requested_at: entity.requested_at,
            delivered_at: entity.delivered_at,
        }
    }
}

/// Delivery row joined with material and container names for history views.
#[derive(Debug, Clone, FromRow)]
pub struct DeliveryWithNamesEntity {
    #[sqlx(flatten)]
    pub delivery: DeliveryEntity,
    pub material_name: Option<String>,
    pub container_name: Option<String>,
}

impl From<DeliveryWithNamesEntity> for domain::models::delivery::DeliveryWithNames {
    fn from(entity: DeliveryWithNamesEntity) -> Self {
        Self {
            delivery: entity.delivery.into(),
            material_name: entity.material_name,
            container_name: entity.container_name,
        }
    }
}
