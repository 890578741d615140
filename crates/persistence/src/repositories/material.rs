//! Material catalog repository.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::MaterialEntity;
use crate::metrics::QueryTimer;

/// Repository for material catalog operations.
#[derive(Clone)]
pub struct MaterialRepository {
    pool: PgPool,
}

impl MaterialRepository {
    /// Creates a new MaterialRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List all materials, alphabetical.
    pub async fn list_all(&self) -> Result<Vec<MaterialEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_materials");
        let result = sqlx::query_as::<_, MaterialEntity>(
            r#"
            SELECT id, name, points_per_kg, created_at
            FROM materials
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a material by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<MaterialEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_material_by_id");
        let result = sqlx::query_as::<_, MaterialEntity>(
            r#"
            SELECT id, name, points_per_kg, created_at
            FROM materials
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a material by name, case-insensitive.
    pub async fn find_by_name(&self, name: &str) -> Result<Option<MaterialEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_material_by_name");
        let result = sqlx::query_as::<_, MaterialEntity>(
            r#"
            SELECT id, name, points_per_kg, created_at
            FROM materials
            WHERE LOWER(name) = LOWER($1)
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Create a new material.
    pub async fn create(
        &self,
        name: &str,
        points_per_kg: f64,
    ) -> Result<MaterialEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_material");
        let result = sqlx::query_as::<_, MaterialEntity>(
            r#"
            INSERT INTO materials (name, points_per_kg)
            VALUES ($1, $2)
            RETURNING id, name, points_per_kg, created_at
            "#,
        )
        .bind(name)
        .bind(points_per_kg)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Update a material. Passing None leaves a field unchanged.
    pub async fn update(
        &self,
        id: Uuid,
        name: Option<&str>,
        points_per_kg: Option<f64>,
    ) -> Result<Option<MaterialEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_material");
        let result = sqlx::query_as::<_, MaterialEntity>(
            r#"
            UPDATE materials
            SET name = COALESCE($2, name),
                points_per_kg = COALESCE($3, points_per_kg)
            WHERE id = $1
            RETURNING id, name, points_per_kg, created_at
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(points_per_kg)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }
}
