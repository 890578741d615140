//! Reward catalog and redemption repository.

use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::entities::{RedemptionEntity, RewardEntity};
use crate::metrics::QueryTimer;

/// Error type for redemption.
#[derive(Debug, Error)]
pub enum RedeemError {
    #[error("Reward not found")]
    RewardNotFound,

    #[error("User not found")]
    UserNotFound,

    #[error("Reward is out of stock")]
    OutOfStock,

    #[error("Insufficient points balance")]
    InsufficientPoints,

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Repository for reward and redemption operations.
#[derive(Clone)]
pub struct RewardRepository {
    pool: PgPool,
}

impl RewardRepository {
    /// Creates a new RewardRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List all rewards, cheapest first.
    pub async fn list_all(&self) -> Result<Vec<RewardEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_rewards");
        let result = sqlx::query_as::<_, RewardEntity>(
            r#"
            SELECT id, name, description, cost_points, stock, created_at
            FROM rewards
            ORDER BY cost_points ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a reward by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<RewardEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_reward_by_id");
        let result = sqlx::query_as::<_, RewardEntity>(
            r#"
            SELECT id, name, description, cost_points, stock, created_at
            FROM rewards
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Create a new reward.
    pub async fn create(
        &self,
        name: &str,
        description: Option<&str>,
        cost_points: i32,
        stock: i32,
    ) -> Result<RewardEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_reward");
        let result = sqlx::query_as::<_, RewardEntity>(
            r#"
            INSERT INTO rewards (name, description, cost_points, stock)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, description, cost_points, stock, created_at
            "#,
        )
        .bind(name)
        .bind(description)
        .bind(cost_points)
        .bind(stock)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Update a reward. Passing None leaves a field unchanged.
    pub async fn update(
        &self,
        id: Uuid,
        name: Option<&str>,
        description: Option<&str>,
        cost_points: Option<i32>,
        stock: Option<i32>,
    ) -> Result<Option<RewardEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_reward");
        let result = sqlx::query_as::<_, RewardEntity>(
            r#"
            UPDATE rewards
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                cost_points = COALESCE($4, cost_points),
                stock = COALESCE($5, stock)
            WHERE id = $1
            RETURNING id, name, description, cost_points, stock, created_at
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(description)
        .bind(cost_points)
        .bind(stock)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List a user's redemptions, newest first.
    pub async fn list_redemptions_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<RedemptionEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_redemptions_for_user");
        let result = sqlx::query_as::<_, RedemptionEntity>(
            r#"
            SELECT id, user_id, reward_id, points_spent, status, redeemed_at
            FROM redemptions
            WHERE user_id = $1
            ORDER BY redeemed_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Redeem a reward for a user.
    ///
    /// Locks the reward row and the user row so that concurrent redemptions
    /// serialize; stock and balance checks happen under the locks. Decrements
    /// stock, inserts the redemption, appends the negative ledger entry, and
    /// decrements the balance in one transaction.
    pub async fn redeem(
        &self,
        user_id: Uuid,
        reward_id: Uuid,
    ) -> Result<RedemptionEntity, RedeemError> {
        let timer = QueryTimer::new("redeem_reward");
        let mut tx = self.pool.begin().await?;

        let reward = sqlx::query_as::<_, RewardEntity>(
            r#"
            SELECT id, name, description, cost_points, stock, created_at
            FROM rewards
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(reward_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(RedeemError::RewardNotFound)?;

        if reward.stock <= 0 {
            return Err(RedeemError::OutOfStock);
        }

        let balance: Option<(i32,)> =
            sqlx::query_as("SELECT points_balance FROM users WHERE id = $1 FOR UPDATE")
                .bind(user_id)
                .fetch_optional(&mut *tx)
                .await?;
        let (balance,) = balance.ok_or(RedeemError::UserNotFound)?;

        if balance < reward.cost_points {
            return Err(RedeemError::InsufficientPoints);
        }

        sqlx::query("UPDATE rewards SET stock = stock - 1 WHERE id = $1")
            .bind(reward_id)
            .execute(&mut *tx)
            .await?;

        let redemption = sqlx::query_as::<_, RedemptionEntity>(
            r#"
            INSERT INTO redemptions (user_id, reward_id, points_spent, status)
            VALUES ($1, $2, $3, 'confirmed')
            RETURNING id, user_id, reward_id, points_spent, status, redeemed_at
            "#,
        )
        .bind(user_id)
        .bind(reward_id)
        .bind(reward.cost_points)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO ledger_entries (user_id, entry_type, points, reference_id)
            VALUES ($1, 'redemption', $2, $3)
            "#,
        )
        .bind(user_id)
        .bind(-reward.cost_points)
        .bind(redemption.id)
        .execute(&mut *tx)
        .await?;

        sqlx::query("UPDATE users SET points_balance = points_balance - $1 WHERE id = $2")
            .bind(reward.cost_points)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        timer.record();
        Ok(redemption)
    }
}
