//! Ledger entities (database row mappings).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use std::str::FromStr;
use uuid::Uuid;

use domain::models::{LedgerEntry, LedgerEntryType};

/// Database row mapping for the ledger_entries table.
#[derive(Debug, Clone, FromRow)]
pub struct LedgerEntryEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub entry_type: String,
    pub points: i32,
    pub reference_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl From<LedgerEntryEntity> for LedgerEntry {
    fn from(entity: LedgerEntryEntity) -> Self {
        Self {
            id: entity.id,
            user_id: entity.user_id,
            entry_type: LedgerEntryType::from_str(&entity.entry_type)
                .unwrap_or(LedgerEntryType::Delivery), // Default fallback
            points: entity.points,
            reference_id: entity.reference_id,
            created_at: entity.created_at,
        }
    }
}

/// Ledger entry of type event joined with the event name.
#[derive(Debug, Clone, FromRow)]
pub struct EventParticipationEntity {
    pub id: Uuid,
    pub points: i32,
    pub event_name: Option<String>,
    pub created_at: DateTime<Utc>,
}
