//! Reward catalog and redemption endpoint handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use domain::models::reward::{CreateRewardRequest, UpdateRewardRequest};
use domain::models::{Redemption, Reward};
use persistence::repositories::RewardRepository;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::auth::Identity;
use crate::middleware::metrics::record_reward_redeemed;

/// List the reward catalog, cheapest first.
///
/// GET /api/v1/rewards
pub async fn list_rewards(State(state): State<AppState>) -> Result<Json<Vec<Reward>>, ApiError> {
    let repo = RewardRepository::new(state.pool.clone());
    let rewards: Vec<Reward> = repo.list_all().await?.into_iter().map(Into::into).collect();

    Ok(Json(rewards))
}

/// Get a single reward by ID.
///
/// GET /api/v1/rewards/:reward_id
pub async fn get_reward(
    State(state): State<AppState>,
    Path(reward_id): Path<Uuid>,
) -> Result<Json<Reward>, ApiError> {
    let repo = RewardRepository::new(state.pool.clone());
    let entity = repo
        .find_by_id(reward_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Reward not found".to_string()))?;

    Ok(Json(entity.into()))
}

/// Create a new reward.
///
/// POST /api/v1/rewards
pub async fn create_reward(
    State(state): State<AppState>,
    Json(request): Json<CreateRewardRequest>,
) -> Result<(StatusCode, Json<Reward>), ApiError> {
    request.validate()?;

    let repo = RewardRepository::new(state.pool.clone());
    let entity = repo
        .create(
            &request.name,
            request.description.as_deref(),
            request.cost_points,
            request.stock,
        )
        .await?;

    let reward: Reward = entity.into();
    info!(reward_id = %reward.id, name = %reward.name, "Reward created");

    Ok((StatusCode::CREATED, Json(reward)))
}

/// Update a reward (partial update).
///
/// PUT /api/v1/rewards/:reward_id
pub async fn update_reward(
    State(state): State<AppState>,
    Path(reward_id): Path<Uuid>,
    Json(request): Json<UpdateRewardRequest>,
) -> Result<Json<Reward>, ApiError> {
    request.validate()?;

    let repo = RewardRepository::new(state.pool.clone());
    let entity = repo
        .update(
            reward_id,
            request.name.as_deref(),
            request.description.as_deref(),
            request.cost_points,
            request.stock,
        )
        .await?
        .ok_or_else(|| ApiError::NotFound("Reward not found".to_string()))?;

    info!(reward_id = %reward_id, "Reward updated");

    Ok(Json(entity.into()))
}

/// Redeem a reward for the authenticated user.
///
/// POST /api/v1/rewards/:reward_id/redeem
pub async fn redeem_reward(
    State(state): State<AppState>,
    identity: Identity,
    Path(reward_id): Path<Uuid>,
) -> Result<(StatusCode, Json<Redemption>), ApiError> {
    let repo = RewardRepository::new(state.pool.clone());
    let entity = repo.redeem(identity.user_id, reward_id).await?;

    record_reward_redeemed();

    let redemption: Redemption = entity.into();
    info!(
        redemption_id = %redemption.id,
        user_id = %identity.user_id,
        reward_id = %reward_id,
        points_spent = redemption.points_spent,
        "Reward redeemed"
    );

    Ok((StatusCode::CREATED, Json(redemption)))
}

/// List the authenticated user's redemptions, newest first.
///
/// GET /api/v1/rewards/redemptions/mine
pub async fn list_my_redemptions(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<Json<Vec<Redemption>>, ApiError> {
    let repo = RewardRepository::new(state.pool.clone());
    let redemptions: Vec<Redemption> = repo
        .list_redemptions_for_user(identity.user_id)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    Ok(Json(redemptions))
}
