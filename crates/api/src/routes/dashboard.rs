//! Operational dashboard endpoint handler.

use axum::{extract::State, Json};
use chrono::Utc;

use domain::models::dashboard::{
    monthly_trend_percent, participation_percent, DashboardMetrics, ParticipationMetrics,
    RecyclingMetrics,
};
use persistence::repositories::stats::{month_start, previous_month_start};
use persistence::repositories::StatsRepository;

use crate::app::AppState;
use crate::error::ApiError;

/// Aggregate platform metrics for administrators.
///
/// GET /api/v1/dashboard
pub async fn dashboard(State(state): State<AppState>) -> Result<Json<DashboardMetrics>, ApiError> {
    let repo = StatsRepository::new(state.pool.clone());

    let now = Utc::now();
    let this_month = month_start(now);
    let prev_month = previous_month_start(now);

    let (total_users, total_containers, total_kg, kg_this_month, kg_previous_month, active_users) =
        tokio::try_join!(
            repo.count_users(),
            repo.count_containers(),
            repo.total_kg(),
            repo.kg_between(this_month, now),
            repo.kg_between(prev_month, this_month),
            repo.active_users_between(this_month, now),
        )?;

    let metrics = DashboardMetrics {
        recycling: RecyclingMetrics {
            total_kg,
            kg_this_month,
            kg_previous_month,
            monthly_trend_percent: monthly_trend_percent(kg_this_month, kg_previous_month),
        },
        participation: ParticipationMetrics {
            total_users,
            active_users_this_month: active_users,
            participation_percent: participation_percent(active_users, total_users),
        },
        total_containers,
        generated_at: now,
    };

    Ok(Json(metrics))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dashboard_metrics_assembly() {
        let metrics = DashboardMetrics {
            recycling: RecyclingMetrics {
                total_kg: 320.0,
                kg_this_month: 150.0,
                kg_previous_month: 100.0,
                monthly_trend_percent: monthly_trend_percent(150.0, 100.0),
            },
            participation: ParticipationMetrics {
                total_users: 200,
                active_users_this_month: 50,
                participation_percent: participation_percent(50, 200),
            },
            total_containers: 12,
            generated_at: Utc::now(),
        };

        assert_eq!(metrics.recycling.monthly_trend_percent, 50.0);
        assert_eq!(metrics.participation.participation_percent, 25.0);
    }

    #[test]
    fn test_month_boundaries_are_ordered() {
        let now = Utc::now();
        let this_month = month_start(now);
        let prev_month = previous_month_start(now);
        assert!(prev_month < this_month);
        assert!(this_month <= now);
    }
}
