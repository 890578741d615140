//! Material catalog endpoint handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use domain::models::material::{CreateMaterialRequest, UpdateMaterialRequest};
use domain::models::Material;
use persistence::repositories::MaterialRepository;

use crate::app::AppState;
use crate::error::ApiError;

/// List the material catalog.
///
/// GET /api/v1/materials
pub async fn list_materials(State(state): State<AppState>) -> Result<Json<Vec<Material>>, ApiError> {
    let repo = MaterialRepository::new(state.pool.clone());
    let materials: Vec<Material> = repo.list_all().await?.into_iter().map(Into::into).collect();

    Ok(Json(materials))
}

/// Create a new material.
///
/// POST /api/v1/materials
pub async fn create_material(
    State(state): State<AppState>,
    Json(request): Json<CreateMaterialRequest>,
) -> Result<(StatusCode, Json<Material>), ApiError> {
    request.validate()?;

    let repo = MaterialRepository::new(state.pool.clone());
    let entity = repo.create(&request.name, request.points_per_kg).await?;

    let material: Material = entity.into();
    info!(material_id = %material.id, name = %material.name, "Material created");

    Ok((StatusCode::CREATED, Json(material)))
}

/// Update a material (partial update).
///
/// PUT /api/v1/materials/:material_id
pub async fn update_material(
    State(state): State<AppState>,
    Path(material_id): Path<Uuid>,
    Json(request): Json<UpdateMaterialRequest>,
) -> Result<Json<Material>, ApiError> {
    request.validate()?;

    let repo = MaterialRepository::new(state.pool.clone());
    let entity = repo
        .update(material_id, request.name.as_deref(), request.points_per_kg)
        .await?
        .ok_or_else(|| ApiError::NotFound("Material not found".to_string()))?;

    info!(material_id = %material_id, "Material updated");

    Ok(Json(entity.into()))
}
