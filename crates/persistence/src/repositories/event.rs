//! Environmental event repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::EcoEventEntity;
use crate::metrics::QueryTimer;

/// Input for creating an event.
#[derive(Debug, Clone)]
pub struct EventInput {
    pub name: String,
    pub description: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub location: Option<String>,
    pub points_reward: Option<i32>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Repository for environmental event operations.
#[derive(Clone)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    /// Creates a new EventRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List events. With `upcoming_only`, returns only events that have not
    /// started yet, soonest first; otherwise all events, newest first.
    pub async fn list(&self, upcoming_only: bool) -> Result<Vec<EcoEventEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_events");
        let result = if upcoming_only {
            sqlx::query_as::<_, EcoEventEntity>(
                r#"
                SELECT id, name, description, starts_at, location, points_reward,
                       latitude, longitude, created_at
                FROM eco_events
                WHERE starts_at >= NOW()
                ORDER BY starts_at ASC
                "#,
            )
            .fetch_all(&self.pool)
            .await
        } else {
            sqlx::query_as::<_, EcoEventEntity>(
                r#"
                SELECT id, name, description, starts_at, location, points_reward,
                       latitude, longitude, created_at
                FROM eco_events
                ORDER BY starts_at DESC
                "#,
            )
            .fetch_all(&self.pool)
            .await
        };
        timer.record();
        result
    }

    /// Find an event by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<EcoEventEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_event_by_id");
        let result = sqlx::query_as::<_, EcoEventEntity>(
            r#"
            SELECT id, name, description, starts_at, location, points_reward,
                   latitude, longitude, created_at
            FROM eco_events
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Create a new event.
    pub async fn create(&self, input: EventInput) -> Result<EcoEventEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_event");
        let result = sqlx::query_as::<_, EcoEventEntity>(
            r#"
            INSERT INTO eco_events (name, description, starts_at, location, points_reward,
                                    latitude, longitude)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, name, description, starts_at, location, points_reward,
                      latitude, longitude, created_at
            "#,
        )
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.starts_at)
        .bind(&input.location)
        .bind(input.points_reward)
        .bind(input.latitude)
        .bind(input.longitude)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Update an event. Passing None leaves a field unchanged.
    #[allow(clippy::too_many_arguments)]
    pub async fn update(
        &self,
        id: Uuid,
        name: Option<&str>,
        description: Option<&str>,
        starts_at: Option<DateTime<Utc>>,
        location: Option<&str>,
        points_reward: Option<i32>,
        latitude: Option<f64>,
        longitude: Option<f64>,
    ) -> Result<Option<EcoEventEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_event");
        let result = sqlx::query_as::<_, EcoEventEntity>(
            r#"
            UPDATE eco_events
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                starts_at = COALESCE($4, starts_at),
                location = COALESCE($5, location),
                points_reward = COALESCE($6, points_reward),
                latitude = COALESCE($7, latitude),
                longitude = COALESCE($8, longitude)
            WHERE id = $1
            RETURNING id, name, description, starts_at, location, points_reward,
                      latitude, longitude, created_at
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(description)
        .bind(starts_at)
        .bind(location)
        .bind(points_reward)
        .bind(latitude)
        .bind(longitude)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Delete an event. Returns true when a row was removed.
    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_event");
        let result = sqlx::query("DELETE FROM eco_events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        timer.record();
        Ok(result.rows_affected() > 0)
    }
}
