//! Material delivery domain models.
//!
//! A delivery is either recorded directly at a container (confirmed on the
//! spot, points awarded immediately) or filed as a pickup request that an
//! operator later confirms or rejects.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

/// Lifecycle state of a delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStatus {
    Pending,
    Confirmed,
    Rejected,
}

impl DeliveryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryStatus::Pending => "pending",
            DeliveryStatus::Confirmed => "confirmed",
            DeliveryStatus::Rejected => "rejected",
        }
    }
}

impl FromStr for DeliveryStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(DeliveryStatus::Pending),
            "confirmed" => Ok(DeliveryStatus::Confirmed),
            "rejected" => Ok(DeliveryStatus::Rejected),
            _ => Err(format!("Invalid delivery status: {}", s)),
        }
    }
}

impl fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A material delivery record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Delivery {
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
    pub status: DeliveryStatus,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub requested_at: DateTime<Utc>,
    pub delivered_at: Option<DateTime<Utc>>,
}

/// A delivery joined with material and container names for history views.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryWithNames {
    #[serde(flatten)]
    pub delivery: Delivery,
    pub material_name: Option<String>,
    pub container_name: Option<String>,
}

/// Request payload for recording a delivery at a container.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateDeliveryRequest {
    /// Material name as listed in the catalog.
    #[validate(length(min = 1, max = 100, message = "Material must be 1-100 characters"))]
    pub material: String,

    #[validate(custom(function = "shared::validation::validate_weight_kg"))]
    pub weight_kg: f64,

    pub container_id: Option<Uuid>,

    #[validate(custom(function = "shared::validation::validate_latitude"))]
    pub latitude: Option<f64>,

    #[validate(custom(function = "shared::validation::validate_longitude"))]
    pub longitude: Option<f64>,
}

impl CreateDeliveryRequest {
    /// A delivery must be attributable to a place: a container or coordinates.
    pub fn has_location(&self) -> bool {
        self.container_id.is_some() || (self.latitude.is_some() && self.longitude.is_some())
    }
}

/// Request payload for filing a pickup request.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePickupRequest {
    #[validate(length(min = 1, max = 1000, message = "Details must be 1-1000 characters"))]
    pub material_details: String,

    #[validate(length(max = 100, message = "Packaging type too long"))]
    pub packaging_type: Option<String>,

    #[validate(length(max = 100, message = "Preferred time too long"))]
    pub preferred_time: Option<String>,

    #[validate(length(max = 255, message = "Address too long"))]
    pub address: Option<String>,

    #[validate(custom(function = "shared::validation::validate_latitude"))]
    pub latitude: Option<f64>,

    #[validate(custom(function = "shared::validation::validate_longitude"))]
    pub longitude: Option<f64>,
}

impl CreatePickupRequest {
    pub fn has_location(&self) -> bool {
        self.address.is_some() || (self.latitude.is_some() && self.longitude.is_some())
    }
}

/// Request payload for confirming a pickup with its actual weight.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmDeliveryRequest {
    #[validate(length(min = 1, max = 100, message = "Material must be 1-100 characters"))]
    pub material: String,

    #[validate(custom(function = "shared::validation::validate_weight_kg"))]
    pub weight_kg: f64,
}
