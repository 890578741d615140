//! Material catalog domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A recyclable material and its points-per-kilogram rate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    pub id: Uuid,
    pub name: String,
    pub points_per_kg: f64,
    pub created_at: DateTime<Utc>,
}

/// Request payload for creating a material.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateMaterialRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    #[validate(custom(function = "shared::validation::validate_points_rate"))]
    pub points_per_kg: f64,
}

/// Request payload for updating a material.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMaterialRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,

    #[validate(custom(function = "shared::validation::validate_points_rate"))]
    pub points_per_kg: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_create_material_request_valid() {
        let req = CreateMaterialRequest {
            name: "Plastic".to_string(),
            points_per_kg: 10.0,
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_create_material_request_negative_rate() {
        let req = CreateMaterialRequest {
            name: "Plastic".to_string(),
            points_per_kg: -1.0,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_create_material_request_empty_name() {
        let req = CreateMaterialRequest {
            name: String::new(),
            points_per_kg: 5.0,
        };
        assert!(req.validate().is_err());
    }
}
