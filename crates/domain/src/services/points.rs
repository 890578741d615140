//! Points computation for material deliveries.

use thiserror::Error;

/// Error type for points computation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PointsError {
    #[error("Material has no points rate configured")]
    RateNotConfigured,

    #[error("Weight must be greater than zero")]
    InvalidWeight,

    #[error("Weight too small to earn points")]
    InsufficientWeight,
}

/// Computes the points awarded for a delivery.
///
/// Points are the floor of weight times the material rate. A zero result is
/// rejected so that no confirmed delivery exists without a ledger movement.
pub fn points_for_delivery(weight_kg: f64, points_per_kg: f64) -> Result<i32, PointsError> {
    if !(weight_kg > 0.0) || !weight_kg.is_finite() {
        return Err(PointsError::InvalidWeight);
    }
    if !(points_per_kg > 0.0) || !points_per_kg.is_finite() {
        return Err(PointsError::RateNotConfigured);
    }

    let points = (weight_kg * points_per_kg).floor();
    if points < 1.0 {
        return Err(PointsError::InsufficientWeight);
    }
    // i32::MAX as f64 is exact; anything larger is clamped
    if points > i32::MAX as f64 {
        return Ok(i32::MAX);
    }

    Ok(points as i32)
}
