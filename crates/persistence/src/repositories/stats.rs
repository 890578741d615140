//! Aggregate queries backing the operational dashboard.

use chrono::{DateTime, Datelike, TimeZone, Utc};
use sqlx::PgPool;

use crate::metrics::QueryTimer;

/// Repository for dashboard aggregates.
#[derive(Clone)]
pub struct StatsRepository {
    pool: PgPool,
}

impl StatsRepository {
    /// Creates a new StatsRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Total registered users.
    pub async fn count_users(&self) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_users");
        let result: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        timer.record();
        Ok(result.0)
    }

    /// Total containers.
    pub async fn count_containers(&self) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_containers");
        let result: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM containers")
            .fetch_one(&self.pool)
            .await?;
        timer.record();
        Ok(result.0)
    }

    /// Total kilograms across all confirmed deliveries.
    pub async fn total_kg(&self) -> Result<f64, sqlx::Error> {
        let timer = QueryTimer::new("total_kg");
        let result: (f64,) = sqlx::query_as(
            "SELECT COALESCE(SUM(weight_kg), 0) FROM deliveries WHERE status = 'confirmed'",
        )
        .fetch_one(&self.pool)
        .await?;
        timer.record();
        Ok(result.0)
    }

    /// Kilograms confirmed in the half-open interval [from, to).
    pub async fn kg_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<f64, sqlx::Error> {
        let timer = QueryTimer::new("kg_between");
        let result: (f64,) = sqlx::query_as(
            r#"
            SELECT COALESCE(SUM(weight_kg), 0)
            FROM deliveries
            WHERE status = 'confirmed' AND delivered_at >= $1 AND delivered_at < $2
            "#,
        )
        .bind(from)
        .bind(to)
        .fetch_one(&self.pool)
        .await?;
        timer.record();
        Ok(result.0)
    }

    /// Distinct users with a confirmed delivery in [from, to).
    pub async fn active_users_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("active_users_between");
        let result: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(DISTINCT user_id)
            FROM deliveries
            WHERE status = 'confirmed' AND delivered_at >= $1 AND delivered_at < $2
            "#,
        )
        .bind(from)
        .bind(to)
        .fetch_one(&self.pool)
        .await?;
        timer.record();
        Ok(result.0)
    }
}

/// Start of the month containing `now`, in UTC.
pub fn month_start(now: DateTime<Utc>) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(now.year(), now.month(), 1, 0, 0, 0)
        .single()
        .unwrap_or(now)
}

/// Start of the month before the one containing `now`, in UTC.
pub fn previous_month_start(now: DateTime<Utc>) -> DateTime<Utc> {
    let (year, month) = if now.month() == 1 {
        (now.year() - 1, 12)
    } else {
        (now.year(), now.month() - 1)
    };
    Utc.with_ymd_and_hms(year, month, 1, 0, 0, 0)
        .single()
        .unwrap_or(now)
}
