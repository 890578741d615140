//! Repository implementations for database operations.

pub mod container;
pub mod delivery;
pub mod event;
pub mod ledger;
pub mod material;
pub mod reward;
pub mod stats;
pub mod user;

pub use container::ContainerRepository;
pub use delivery::{
    ConfirmError, ConfirmedDeliveryInput, DeliveryRepository, PickupRequestInput,
};
pub use event::{EventInput, EventRepository};
pub use ledger::LedgerRepository;
pub use material::MaterialRepository;
pub use reward::{RedeemError, RewardRepository};
pub use stats::StatsRepository;
pub use user::UserRepository;
