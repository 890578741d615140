//! Domain models for EcoRewards.

pub mod container;
pub mod dashboard;
pub mod delivery;
pub mod event;
pub mod ledger;
pub mod material;
pub mod reward;
pub mod user;

pub use container::Container;
pub use delivery::{Delivery, DeliveryStatus};
pub use event::EcoEvent;
pub use ledger::{LedgerEntry, LedgerEntryType};
pub use material::Material;
pub use reward::{Redemption, Reward};
pub use user::{Role, Session, User};
