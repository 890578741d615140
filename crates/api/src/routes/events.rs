//! Environmental event endpoint handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use domain::models::event::{AwardEventPointsRequest, CreateEventRequest, UpdateEventRequest};
use domain::models::{EcoEvent, LedgerEntry};
use persistence::repositories::{EventInput, EventRepository, LedgerRepository};

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::metrics::record_points_awarded;

/// Query parameters for the event list.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListEventsQuery {
    /// When true, only events that have not started yet, soonest first.
    #[serde(default)]
    pub upcoming: bool,
}

/// List events.
///
/// GET /api/v1/events?upcoming=true
pub async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<ListEventsQuery>,
) -> Result<Json<Vec<EcoEvent>>, ApiError> {
    let repo = EventRepository::new(state.pool.clone());
    let events: Vec<EcoEvent> = repo
        .list(query.upcoming)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    Ok(Json(events))
}

/// Get a single event by ID.
///
/// GET /api/v1/events/:event_id
pub async fn get_event(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> Result<Json<EcoEvent>, ApiError> {
    let repo = EventRepository::new(state.pool.clone());
    let entity = repo
        .find_by_id(event_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Event not found".to_string()))?;

    Ok(Json(entity.into()))
}

/// Create a new event.
///
/// POST /api/v1/events
pub async fn create_event(
    State(state): State<AppState>,
    Json(request): Json<CreateEventRequest>,
) -> Result<(StatusCode, Json<EcoEvent>), ApiError> {
    request.validate()?;

    let repo = EventRepository::new(state.pool.clone());
    let entity = repo
        .create(EventInput {
            name: request.name,
            description: request.description,
            starts_at: request.starts_at,
            location: request.location,
            points_reward: request.points_reward,
            latitude: request.latitude,
            longitude: request.longitude,
        })
        .await?;

    let event: EcoEvent = entity.into();
    info!(event_id = %event.id, name = %event.name, "Event created");

    Ok((StatusCode::CREATED, Json(event)))
}

/// Update an event (partial update).
///
/// PUT /api/v1/events/:event_id
pub async fn update_event(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
    Json(request): Json<UpdateEventRequest>,
) -> Result<Json<EcoEvent>, ApiError> {
    request.validate()?;

    let repo = EventRepository::new(state.pool.clone());
    let entity = repo
        .update(
            event_id,
            request.name.as_deref(),
            request.description.as_deref(),
            request.starts_at,
            request.location.as_deref(),
            request.points_reward,
            request.latitude,
            request.longitude,
        )
        .await?
        .ok_or_else(|| ApiError::NotFound("Event not found".to_string()))?;

    info!(event_id = %event_id, "Event updated");

    Ok(Json(entity.into()))
}

/// Delete an event.
///
/// DELETE /api/v1/events/:event_id
pub async fn delete_event(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let repo = EventRepository::new(state.pool.clone());
    let deleted = repo.delete(event_id).await?;

    if !deleted {
        return Err(ApiError::NotFound("Event not found".to_string()));
    }

    info!(event_id = %event_id, "Event deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Award points to a participant of an event.
///
/// POST /api/v1/events/:event_id/points
pub async fn award_points(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
    Json(request): Json<AwardEventPointsRequest>,
) -> Result<(StatusCode, Json<LedgerEntry>), ApiError> {
    request.validate()?;

    let events = EventRepository::new(state.pool.clone());
    events
        .find_by_id(event_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Event not found".to_string()))?;

    let ledger = LedgerRepository::new(state.pool.clone());
    let entry = ledger
        .award_event_points(request.user_id, event_id, request.points)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => ApiError::NotFound("User not found".to_string()),
            _ => e.into(),
        })?;

    record_points_awarded("event", request.points as i64);

    info!(
        event_id = %event_id,
        user_id = %request.user_id,
        points = request.points,
        "Event points awarded"
    );

    Ok((StatusCode::CREATED, Json(entry.into())))
}
