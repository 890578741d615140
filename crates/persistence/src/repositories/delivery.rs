//! Delivery repository, including the transactional write paths.
//!
//! Every path that awards points performs the delivery write, the ledger
//! insert, and the balance increment inside one transaction.

use chrono::Utc;
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::entities::{DeliveryEntity, DeliveryWithNamesEntity};
use crate::metrics::QueryTimer;

/// Input for recording a delivery confirmed at a container.
#[derive(Debug, Clone)]
pub struct ConfirmedDeliveryInput {
    pub user_id: Uuid,
    pub container_id: Option<Uuid>,
    pub material_id: Uuid,
    pub weight_kg: f64,
    pub points: i32,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Input for filing a pickup request.
#[derive(Debug, Clone)]
pub struct PickupRequestInput {
    pub user_id: Uuid,
    pub material_details: String,
    pub packaging_type: Option<String>,
    pub preferred_time: Option<String>,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Error type for pickup confirmation.
#[derive(Debug, Error)]
pub enum ConfirmError {
    #[error("Delivery not found")]
    NotFound,

    #[error("Delivery is not pending")]
    NotPending,

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Repository for delivery operations.
#[derive(Clone)]
pub struct DeliveryRepository {
    pool: PgPool,
}

impl DeliveryRepository {
    /// Creates a new DeliveryRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a delivery by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<DeliveryEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_delivery_by_id");
        let result = sqlx::query_as::<_, DeliveryEntity>(
            r#"
            SELECT id, user_id, container_id, material_id, material_details, packaging_type,
                   preferred_time, address, weight_kg, points_awarded, status, latitude,
                   longitude, requested_at, delivered_at
            FROM deliveries
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List a user's deliveries with material and container names, newest first.
    pub async fn list_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<DeliveryWithNamesEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_deliveries_for_user");
        let result = sqlx::query_as::<_, DeliveryWithNamesEntity>(
            r#"
            SELECT d.id, d.user_id, d.container_id, d.material_id, d.material_details,
                   d.packaging_type, d.preferred_time, d.address, d.weight_kg,
                   d.points_awarded, d.status, d.latitude, d.longitude, d.requested_at,
                   d.delivered_at,
                   m.name AS material_name, c.name AS container_name
            FROM deliveries d
            LEFT JOIN materials m ON m.id = d.material_id
            LEFT JOIN containers c ON c.id = d.container_id
            WHERE d.user_id = $1
            ORDER BY d.requested_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List all deliveries with material and container names, newest first.
    pub async fn list_all(&self) -> Result<Vec<DeliveryWithNamesEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_all_deliveries");
        let result = sqlx::query_as::<_, DeliveryWithNamesEntity>(
            r#"
            SELECT d.id, d.user_id, d.container_id, d.material_id, d.material_details,
                   d.packaging_type, d.preferred_time, d.address, d.weight_kg,
                   d.points_awarded, d.status, d.latitude, d.longitude, d.requested_at,
                   d.delivered_at,
                   m.name AS material_name, c.name AS container_name
            FROM deliveries d
            LEFT JOIN materials m ON m.id = d.material_id
            LEFT JOIN containers c ON c.id = d.container_id
            ORDER BY d.requested_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Record a delivery confirmed at a container.
    ///
    /// Inserts the delivery, the ledger entry pointing at it, and the
    /// balance increment atomically. Rolls back on any failure.
    pub async fn record_confirmed(
        &self,
        input: ConfirmedDeliveryInput,
    ) -> Result<DeliveryEntity, sqlx::Error> {
        let timer = QueryTimer::new("record_confirmed_delivery");
        let mut tx = self.pool.begin().await?;

        let now = Utc::now();
        let delivery = sqlx::query_as::<_, DeliveryEntity>(
            r#"
            INSERT INTO deliveries (user_id, container_id, material_id, weight_kg,
                                    points_awarded, status, latitude, longitude, delivered_at)
            VALUES ($1, $2, $3, $4, $5, 'confirmed', $6, $7, $8)
            RETURNING id, user_id, container_id, material_id, material_details, packaging_type,
                      preferred_time, address, weight_kg, points_awarded, status, latitude,
                      longitude, requested_at, delivered_at
            "#,
        )
        .bind(input.user_id)
        .bind(input.container_id)
        .bind(input.material_id)
        .bind(input.weight_kg)
        .bind(input.points)
        .bind(input.latitude)
        .bind(input.longitude)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO ledger_entries (user_id, entry_type, points, reference_id)
            VALUES ($1, 'delivery', $2, $3)
            "#,
        )
        .bind(input.user_id)
        .bind(input.points)
        .bind(delivery.id)
        .execute(&mut *tx)
        .await?;

        sqlx::query("UPDATE users SET points_balance = points_balance + $1 WHERE id = $2")
            .bind(input.points)
            .bind(input.user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        timer.record();
        Ok(delivery)
    }

    /// File a pickup request. No points move until an operator confirms it.
    pub async fn create_pickup_request(
        &self,
        input: PickupRequestInput,
    ) -> Result<DeliveryEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_pickup_request");
        let result = sqlx::query_as::<_, DeliveryEntity>(
            r#"
            INSERT INTO deliveries (user_id, material_details, packaging_type, preferred_time,
                                    address, weight_kg, points_awarded, status, latitude, longitude)
            VALUES ($1, $2, $3, $4, $5, 0, 0, 'pending', $6, $7)
            RETURNING id, user_id, container_id, material_id, material_details, packaging_type,
                      preferred_time, address, weight_kg, points_awarded, status, latitude,
                      longitude, requested_at, delivered_at
            "#,
        )
        .bind(input.user_id)
        .bind(&input.material_details)
        .bind(&input.packaging_type)
        .bind(&input.preferred_time)
        .bind(&input.address)
        .bind(input.latitude)
        .bind(input.longitude)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Confirm a pending pickup with the weighed material.
    ///
    /// The delivery row is locked for the duration of the transaction so
    /// concurrent confirmations of the same request serialize; the second
    /// one sees a non-pending status and fails without side effects.
    pub async fn confirm_pickup(
        &self,
        delivery_id: Uuid,
        material_id: Uuid,
        weight_kg: f64,
        points: i32,
    ) -> Result<DeliveryEntity, ConfirmError> {
        let timer = QueryTimer::new("confirm_pickup");
        let mut tx = self.pool.begin().await?;

        let current = sqlx::query_as::<_, DeliveryEntity>(
            r#"
            SELECT id, user_id, container_id, material_id, material_details, packaging_type,
                   preferred_time, address, weight_kg, points_awarded, status, latitude,
                   longitude, requested_at, delivered_at
            FROM deliveries
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(delivery_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(ConfirmError::NotFound)?;

        if current.status != "pending" {
            return Err(ConfirmError::NotPending);
        }

        let now = Utc::now();
        let delivery = sqlx::query_as::<_, DeliveryEntity>(
            r#"
            UPDATE deliveries
            SET material_id = $2, weight_kg = $3, points_awarded = $4,
                status = 'confirmed', delivered_at = $5
            WHERE id = $1
            RETURNING id, user_id, container_id, material_id, material_details, packaging_type,
                      preferred_time, address, weight_kg, points_awarded, status, latitude,
                      longitude, requested_at, delivered_at
            "#,
        )
        .bind(delivery_id)
        .bind(material_id)
        .bind(weight_kg)
        .bind(points)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO ledger_entries (user_id, entry_type, points, reference_id)
            VALUES ($1, 'delivery', $2, $3)
            "#,
        )
        .bind(delivery.user_id)
        .bind(points)
        .bind(delivery.id)
        .execute(&mut *tx)
        .await?;

        sqlx::query("UPDATE users SET points_balance = points_balance + $1 WHERE id = $2")
            .bind(points)
            .bind(delivery.user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        timer.record();
        Ok(delivery)
    }

    /// Reject a pending pickup. No points move.
    pub async fn reject_pickup(&self, delivery_id: Uuid) -> Result<DeliveryEntity, ConfirmError> {
        let timer = QueryTimer::new("reject_pickup");
        let mut tx = self.pool.begin().await?;

        let current = sqlx::query_as::<_, DeliveryEntity>(
            r#"
            SELECT id, user_id, container_id, material_id, material_details, packaging_type,
                   preferred_time, address, weight_kg, points_awarded, status, latitude,
                   longitude, requested_at, delivered_at
            FROM deliveries
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(delivery_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(ConfirmError::NotFound)?;

        if current.status != "pending" {
            return Err(ConfirmError::NotPending);
        }

        let delivery = sqlx::query_as::<_, DeliveryEntity>(
            r#"
            UPDATE deliveries
            SET status = 'rejected'
            WHERE id = $1
            RETURNING id, user_id, container_id, material_id, material_details, packaging_type,
                      preferred_time, address, weight_kg, points_awarded, status, latitude,
                      longitude, requested_at, delivered_at
            "#,
        )
        .bind(delivery_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.record();
        Ok(delivery)
    }
}
