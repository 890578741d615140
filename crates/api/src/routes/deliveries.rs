//! Material delivery endpoint handlers.
//!
//! Two intake paths exist: a delivery recorded at a container is confirmed
//! immediately and awards points on the spot, while a pickup request stays
//! pending until an operator confirms or rejects it.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use domain::models::delivery::{
    ConfirmDeliveryRequest, CreateDeliveryRequest, CreatePickupRequest, DeliveryWithNames,
};
use domain::models::Delivery;
use domain::services::points_for_delivery;
use persistence::repositories::{
    ConfirmedDeliveryInput, DeliveryRepository, MaterialRepository, PickupRequestInput,
};

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::auth::Identity;
use crate::middleware::metrics::{record_delivery_confirmed, record_points_awarded};

/// Record a delivery at a container and award points immediately.
///
/// POST /api/v1/deliveries
pub async fn create_delivery(
    State(state): State<AppState>,
    identity: Identity,
    Json(request): Json<CreateDeliveryRequest>,
) -> Result<(StatusCode, Json<Delivery>), ApiError> {
    request.validate()?;

    if !request.has_location() {
        return Err(ApiError::Validation(
            "A container or coordinates are required".to_string(),
        ));
    }

    let materials = MaterialRepository::new(state.pool.clone());
    let material = materials
        .find_by_name(&request.material)
        .await?
        .ok_or_else(|| ApiError::Validation("Unknown material".to_string()))?;

    let points = points_for_delivery(request.weight_kg, material.points_per_kg)?;

    let repo = DeliveryRepository::new(state.pool.clone());
    let entity = repo
        .record_confirmed(ConfirmedDeliveryInput {
            user_id: identity.user_id,
            container_id: request.container_id,
            material_id: material.id,
            weight_kg: request.weight_kg,
            points,
            latitude: request.latitude,
            longitude: request.longitude,
        })
        .await?;

    record_delivery_confirmed(request.weight_kg);
    record_points_awarded("delivery", points as i64);

    let delivery: Delivery = entity.into();
    info!(
        delivery_id = %delivery.id,
        user_id = %identity.user_id,
        points = points,
        "Delivery recorded"
    );

    Ok((StatusCode::CREATED, Json(delivery)))
}

/// List the authenticated user's deliveries, newest first.
///
/// GET /api/v1/deliveries/mine
pub async fn list_my_deliveries(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<Json<Vec<DeliveryWithNames>>, ApiError> {
    let repo = DeliveryRepository::new(state.pool.clone());
    let deliveries: Vec<DeliveryWithNames> = repo
        .list_for_user(identity.user_id)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    Ok(Json(deliveries))
}

/// List all deliveries, newest first.
///
/// GET /api/v1/deliveries
pub async fn list_all_deliveries(
    State(state): State<AppState>,
) -> Result<Json<Vec<DeliveryWithNames>>, ApiError> {
    let repo = DeliveryRepository::new(state.pool.clone());
    let deliveries: Vec<DeliveryWithNames> = repo
        .list_all()
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    Ok(Json(deliveries))
}

/// File a pickup request. No points are awarded until confirmation.
///
/// POST /api/v1/deliveries/requests
pub async fn create_pickup_request(
    State(state): State<AppState>,
    identity: Identity,
    Json(request): Json<CreatePickupRequest>,
) -> Result<(StatusCode, Json<Delivery>), ApiError> {
    request.validate()?;

    if !request.has_location() {
        return Err(ApiError::Validation(
            "An address or coordinates are required".to_string(),
        ));
    }

    let repo = DeliveryRepository::new(state.pool.clone());
    let entity = repo
        .create_pickup_request(PickupRequestInput {
            user_id: identity.user_id,
            material_details: request.material_details,
            packaging_type: request.packaging_type,
            preferred_time: request.preferred_time,
            address: request.address,
            latitude: request.latitude,
            longitude: request.longitude,
        })
        .await?;

    let delivery: Delivery = entity.into();
    info!(
        delivery_id = %delivery.id,
        user_id = %identity.user_id,
        "Pickup request filed"
    );

    Ok((StatusCode::CREATED, Json(delivery)))
}

/// Confirm a pending pickup with its actual material and weight.
///
/// POST /api/v1/deliveries/:delivery_id/confirm
pub async fn confirm_pickup(
    State(state): State<AppState>,
    identity: Identity,
    Path(delivery_id): Path<Uuid>,
    Json(request): Json<ConfirmDeliveryRequest>,
) -> Result<Json<Delivery>, ApiError> {
    request.validate()?;

    let materials = MaterialRepository::new(state.pool.clone());
    let material = materials
        .find_by_name(&request.material)
        .await?
        .ok_or_else(|| ApiError::Validation("Unknown material".to_string()))?;

    let points = points_for_delivery(request.weight_kg, material.points_per_kg)?;

    let repo = DeliveryRepository::new(state.pool.clone());
    let entity = repo
        .confirm_pickup(delivery_id, material.id, request.weight_kg, points)
        .await?;

    record_delivery_confirmed(request.weight_kg);
    record_points_awarded("delivery", points as i64);

    let delivery: Delivery = entity.into();
    info!(
        delivery_id = %delivery_id,
        operator_id = %identity.user_id,
        points = points,
        "Pickup confirmed"
    );

    Ok(Json(delivery))
}

/// Reject a pending pickup.
///
/// POST /api/v1/deliveries/:delivery_id/reject
pub async fn reject_pickup(
    State(state): State<AppState>,
    identity: Identity,
    Path(delivery_id): Path<Uuid>,
) -> Result<Json<Delivery>, ApiError> {
    let repo = DeliveryRepository::new(state.pool.clone());
    let entity = repo.reject_pickup(delivery_id).await?;

    let delivery: Delivery = entity.into();
    info!(
        delivery_id = %delivery_id,
        operator_id = %identity.user_id,
        "Pickup rejected"
    );

    Ok(Json(delivery))
}
