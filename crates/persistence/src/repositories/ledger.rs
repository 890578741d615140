//! Points ledger repository.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{EventParticipationEntity, LedgerEntryEntity};
use crate::metrics::QueryTimer;

/// Repository for ledger operations.
#[derive(Clone)]
pub struct LedgerRepository {
    pool: PgPool,
}

impl LedgerRepository {
    /// Creates a new LedgerRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List a user's ledger entries, newest first.
    pub async fn list_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<LedgerEntryEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_ledger_for_user");
        let result = sqlx::query_as::<_, LedgerEntryEntity>(
            r#"
            SELECT id, user_id, entry_type, points, reference_id, created_at
            FROM ledger_entries
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List a user's event participations with event names, newest first.
    pub async fn list_event_participations(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<EventParticipationEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_event_participations");
        let result = sqlx::query_as::<_, EventParticipationEntity>(
            r#"
            SELECT l.id, l.points, e.name AS event_name, l.created_at
            FROM ledger_entries l
            LEFT JOIN eco_events e ON e.id = l.reference_id
            WHERE l.user_id = $1 AND l.entry_type = 'event'
            ORDER BY l.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Award event points to a participant.
    ///
    /// Inserts the ledger entry and increments the balance atomically.
    /// Returns RowNotFound when the user does not exist.
    pub async fn award_event_points(
        &self,
        user_id: Uuid,
        event_id: Uuid,
        points: i32,
    ) -> Result<LedgerEntryEntity, sqlx::Error> {
        let timer = QueryTimer::new("award_event_points");
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query("UPDATE users SET points_balance = points_balance + $1 WHERE id = $2")
            .bind(points)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        if updated.rows_affected() == 0 {
            return Err(sqlx::Error::RowNotFound);
        }

        let entry = sqlx::query_as::<_, LedgerEntryEntity>(
            r#"
            INSERT INTO ledger_entries (user_id, entry_type, points, reference_id)
            VALUES ($1, 'event', $2, $3)
            RETURNING id, user_id, entry_type, points, reference_id, created_at
            "#,
        )
        .bind(user_id)
        .bind(points)
        .bind(event_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.record();
        Ok(entry)
    }

    /// Signed sum of a user's ledger entries.
    pub async fn balance_from_ledger(&self, user_id: Uuid) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("balance_from_ledger");
        let result: (i64,) = sqlx::query_as(
            "SELECT COALESCE(SUM(points), 0) FROM ledger_entries WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        timer.record();
        Ok(result.0)
    }
}
