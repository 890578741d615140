//! Points ledger domain models.
//!
//! The ledger is append-only. A user's balance is the signed sum of their
//! entries; the denormalized counter on the user row is updated in the same
//! transaction as every ledger insert.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// What produced a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LedgerEntryType {
    Delivery,
    Event,
    Redemption,
}

impl LedgerEntryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LedgerEntryType::Delivery => "delivery",
            LedgerEntryType::Event => "event",
            LedgerEntryType::Redemption => "redemption",
        }
    }
}

impl FromStr for LedgerEntryType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "delivery" => Ok(LedgerEntryType::Delivery),
            "event" => Ok(LedgerEntryType::Event),
            "redemption" => Ok(LedgerEntryType::Redemption),
            _ => Err(format!("Invalid ledger entry type: {}", s)),
        }
    }
}

impl fmt::Display for LedgerEntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One signed points movement.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub entry_type: LedgerEntryType,
    /// Positive for awards, negative for redemptions.
    pub points: i32,
    /// Id of the originating delivery, event, or redemption row.
    pub reference_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}
