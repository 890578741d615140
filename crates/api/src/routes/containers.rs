//! Recycling container endpoint handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use domain::models::container::{CreateContainerRequest, NearbyContainer, UpdateContainerRequest};
use domain::models::Container;
use domain::services::haversine_distance_m;
use persistence::repositories::ContainerRepository;

use crate::app::AppState;
use crate::error::ApiError;

/// Default search radius for the nearby query, in meters.
const DEFAULT_NEARBY_RADIUS_M: f64 = 5_000.0;

/// Query parameters for the nearby containers endpoint.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NearbyQuery {
    #[validate(custom(function = "shared::validation::validate_latitude"))]
    pub lat: f64,

    #[validate(custom(function = "shared::validation::validate_longitude"))]
    pub lon: f64,

    // Accept both radiusM and radius_m on the wire
    #[serde(alias = "radius_m")]
    #[validate(range(min = 1.0, max = 100_000.0, message = "Radius must be 1-100000 meters"))]
    pub radius_m: Option<f64>,
}

/// List all containers.
///
/// GET /api/v1/containers
pub async fn list_containers(
    State(state): State<AppState>,
) -> Result<Json<Vec<Container>>, ApiError> {
    let repo = ContainerRepository::new(state.pool.clone());
    let containers: Vec<Container> = repo.list_all().await?.into_iter().map(Into::into).collect();

    Ok(Json(containers))
}

/// Find containers within a radius of a point, closest first.
///
/// GET /api/v1/containers/nearby?lat=<f64>&lon=<f64>&radiusM=<f64>
pub async fn nearby_containers(
    State(state): State<AppState>,
    Query(query): Query<NearbyQuery>,
) -> Result<Json<Vec<NearbyContainer>>, ApiError> {
    query.validate()?;
    let radius_m = query.radius_m.unwrap_or(DEFAULT_NEARBY_RADIUS_M);

    let repo = ContainerRepository::new(state.pool.clone());
    let mut nearby: Vec<NearbyContainer> = repo
        .list_all()
        .await?
        .into_iter()
        .map(|entity| {
            let container: Container = entity.into();
            let distance_m =
                haversine_distance_m(query.lat, query.lon, container.latitude, container.longitude);
            NearbyContainer {
                container,
                distance_m,
            }
        })
        .filter(|c| c.distance_m <= radius_m)
        .collect();

    nearby.sort_by(|a, b| a.distance_m.total_cmp(&b.distance_m));

    Ok(Json(nearby))
}

/// Get a single container by ID.
///
/// GET /api/v1/containers/:container_id
pub async fn get_container(
    State(state): State<AppState>,
    Path(container_id): Path<Uuid>,
) -> Result<Json<Container>, ApiError> {
    let repo = ContainerRepository::new(state.pool.clone());
    let entity = repo
        .find_by_id(container_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Container not found".to_string()))?;

    Ok(Json(entity.into()))
}

/// Create a new container.
///
/// POST /api/v1/containers
pub async fn create_container(
    State(state): State<AppState>,
    Json(request): Json<CreateContainerRequest>,
) -> Result<(StatusCode, Json<Container>), ApiError> {
    request.validate()?;

    let repo = ContainerRepository::new(state.pool.clone());
    let entity = repo
        .create(
            &request.name,
            &request.address,
            request.latitude,
            request.longitude,
            &request.accepted_materials,
            request.collection_schedule.as_deref(),
        )
        .await?;

    let container: Container = entity.into();
    info!(container_id = %container.id, name = %container.name, "Container created");

    Ok((StatusCode::CREATED, Json(container)))
}

/// Update a container (partial update).
///
/// PUT /api/v1/containers/:container_id
pub async fn update_container(
    State(state): State<AppState>,
    Path(container_id): Path<Uuid>,
    Json(request): Json<UpdateContainerRequest>,
) -> Result<Json<Container>, ApiError> {
    request.validate()?;

    let repo = ContainerRepository::new(state.pool.clone());
    let entity = repo
        .update(
            container_id,
            request.name.as_deref(),
            request.address.as_deref(),
            request.latitude,
            request.longitude,
            request.accepted_materials.as_deref(),
            request.collection_schedule.as_deref(),
        )
        .await?
        .ok_or_else(|| ApiError::NotFound("Container not found".to_string()))?;

    info!(container_id = %container_id, "Container updated");

    Ok(Json(entity.into()))
}

/// Delete a container.
///
/// DELETE /api/v1/containers/:container_id
pub async fn delete_container(
    State(state): State<AppState>,
    Path(container_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let repo = ContainerRepository::new(state.pool.clone());
    let deleted = repo.delete(container_id).await?;

    if !deleted {
        return Err(ApiError::NotFound("Container not found".to_string()));
    }

    info!(container_id = %container_id, "Container deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nearby_query_validation() {
        let query = NearbyQuery {
            lat: -33.45,
            lon: -70.66,
            radius_m: Some(2000.0),
        };
        assert!(query.validate().is_ok());

        let query = NearbyQuery {
            lat: 91.0,
            lon: -70.66,
            radius_m: None,
        };
        assert!(query.validate().is_err());

        let query = NearbyQuery {
            lat: -33.45,
            lon: -70.66,
            radius_m: Some(0.0),
        };
        assert!(query.validate().is_err());
    }

    #[test]
    fn test_nearby_query_deserialization() {
        let query: NearbyQuery =
            serde_json::from_str(r#"{"lat": -33.45, "lon": -70.66}"#).unwrap();
        assert!(query.radius_m.is_none());

        let query: NearbyQuery =
            serde_json::from_str(r#"{"lat": -33.45, "lon": -70.66, "radiusM": 500.0}"#).unwrap();
        assert_eq!(query.radius_m, Some(500.0));

        let query: NearbyQuery =
            serde_json::from_str(r#"{"lat": -33.45, "lon": -70.66, "radius_m": 750.0}"#).unwrap();
        assert_eq!(query.radius_m, Some(750.0));
    }

    #[test]
    fn test_nearby_ordering_is_closest_first() {
        let mut distances = [4_200.0_f64, 12.5, 830.0];
        distances.sort_by(|a, b| a.total_cmp(b));
        assert_eq!(distances[0], 12.5);
        assert_eq!(distances[2], 4_200.0);
    }
}
