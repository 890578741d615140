//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod container;
pub mod delivery;
pub mod event;
pub mod ledger;
pub mod material;
pub mod reward;
pub mod user;

pub use container::ContainerEntity;
pub use delivery::{DeliveryEntity, DeliveryWithNamesEntity};
pub use event::EcoEventEntity;
pub use ledger::{EventParticipationEntity, LedgerEntryEntity};
pub use material::MaterialEntity;
pub use reward::{RedemptionEntity, RewardEntity};
pub use user::{SessionEntity, UserEntity};
