//! Domain services for EcoRewards.
//!
//! Services contain business logic that operates on domain models.

pub mod distance;
pub mod points;

pub use distance::haversine_distance_m;
pub use points::{points_for_delivery, PointsError};
