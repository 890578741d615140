//! Operational dashboard domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Recycling volume figures.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecyclingMetrics {
    pub total_kg: f64,
    pub kg_this_month: f64,
    pub kg_previous_month: f64,
    /// Month-over-month change in percent. 100 when the previous month had
    /// no volume and this month does; 0 when neither month has volume.
    pub monthly_trend_percent: f64,
}

/// Community participation figures.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipationMetrics {
    pub total_users: i64,
    pub active_users_this_month: i64,
    pub participation_percent: f64,
}

/// Complete dashboard response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    pub recycling: RecyclingMetrics,
    pub participation: ParticipationMetrics,
    pub total_containers: i64,
    pub generated_at: DateTime<Utc>,
}

impl DashboardMetrics {
    /// Create a new DashboardMetrics with the current timestamp.
    pub fn new() -> Self {
        Self {
            generated_at: Utc::now(),
            ..Default::default()
        }
    }
}

/// Computes the month-over-month trend percentage.
pub fn monthly_trend_percent(current_kg: f64, previous_kg: f64) -> f64 {
    if previous_kg > 0.0 {
        ((current_kg - previous_kg) / previous_kg) * 100.0
    } else if current_kg > 0.0 {
        100.0
    } else {
        0.0
    }
}

/// Computes the share of registered users active this month, in percent.
pub fn participation_percent(active_users: i64, total_users: i64) -> f64 {
    if total_users > 0 {
        (active_users as f64 / total_users as f64) * 100.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monthly_trend_growth() {
        assert_eq!(monthly_trend_percent(150.0, 100.0), 50.0);
    }

    #[test]
    fn test_monthly_trend_decline() {
        assert_eq!(monthly_trend_percent(50.0, 100.0), -50.0);
    }

    #[test]
    fn test_monthly_trend_no_previous_volume() {
        assert_eq!(monthly_trend_percent(10.0, 0.0), 100.0);
    }

    #[test]
    fn test_monthly_trend_no_volume_at_all() {
        assert_eq!(monthly_trend_percent(0.0, 0.0), 0.0);
    }

    #[test]
    fn test_participation_percent() {
        assert_eq!(participation_percent(25, 100), 25.0);
        assert_eq!(participation_percent(0, 100), 0.0);
        assert_eq!(participation_percent(0, 0), 0.0);
    }

    #[test]
    fn test_dashboard_metrics_serialization() {
        let metrics = DashboardMetrics::new();
        let json = serde_json::to_string(&metrics).unwrap();
        assert!(json.contains("recycling"));
        assert!(json.contains("participation"));
        assert!(json.contains("totalContainers"));
        assert!(json.contains("generatedAt"));
    }
}
