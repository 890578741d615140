//! Container repository.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::ContainerEntity;
use crate::metrics::QueryTimer;

/// Repository for container operations.
#[derive(Clone)]
pub struct ContainerRepository {
    pool: PgPool,
}

impl ContainerRepository {
    /// Creates a new ContainerRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List all containers, alphabetical.
    pub async fn list_all(&self) -> Result<Vec<ContainerEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_containers");
        let result = sqlx::query_as::<_, ContainerEntity>(
            r#"
            SELECT id, name, address, latitude, longitude, accepted_materials,
                   collection_schedule, created_at
            FROM containers
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a container by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<ContainerEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_container_by_id");
        let result = sqlx::query_as::<_, ContainerEntity>(
            r#"
            SELECT id, name, address, latitude, longitude, accepted_materials,
                   collection_schedule, created_at
            FROM containers
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Create a new container.
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        name: &str,
        address: &str,
        latitude: f64,
        longitude: f64,
        accepted_materials: &str,
        collection_schedule: Option<&str>,
    ) -> Result<ContainerEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_container");
        let result = sqlx::query_as::<_, ContainerEntity>(
            r#"
            INSERT INTO containers (name, address, latitude, longitude, accepted_materials,
                                    collection_schedule)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, address, latitude, longitude, accepted_materials,
                      collection_schedule, created_at
            "#,
        )
        .bind(name)
        .bind(address)
        .bind(latitude)
        .bind(longitude)
        .bind(accepted_materials)
        .bind(collection_schedule)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Update a container. Passing None leaves a field unchanged.
    #[allow(clippy::too_many_arguments)]
    pub async fn update(
        &self,
        id: Uuid,
        name: Option<&str>,
        address: Option<&str>,
        latitude: Option<f64>,
        longitude: Option<f64>,
        accepted_materials: Option<&str>,
        collection_schedule: Option<&str>,
    ) -> Result<Option<ContainerEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_container");
        let result = sqlx::query_as::<_, ContainerEntity>(
            r#"
            UPDATE containers
            SET name = COALESCE($2, name),
                address = COALESCE($3, address),
                latitude = COALESCE($4, latitude),
                longitude = COALESCE($5, longitude),
                accepted_materials = COALESCE($6, accepted_materials),
                collection_schedule = COALESCE($7, collection_schedule)
            WHERE id = $1
            RETURNING id, name, address, latitude, longitude, accepted_materials,
                      collection_schedule, created_at
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(address)
        .bind(latitude)
        .bind(longitude)
        .bind(accepted_materials)
        .bind(collection_schedule)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Delete a container. Returns true when a row was removed.
    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_container");
        let result = sqlx::query("DELETE FROM containers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        timer.record();
        Ok(result.rows_affected() > 0)
    }
}
