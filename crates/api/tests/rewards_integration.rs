//! Integration tests for the reward catalog and redemptions.
//!
//! These tests require a running PostgreSQL instance.
//! Set TEST_DATABASE_URL environment variable or use docker-compose.

mod common;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use common::{cleanup_test_data, create_test_pool, run_migrations, test_config, TestUser};
use ecorewards_api::config::Config;
use serde_json::{json, Value};
use sqlx::PgPool;
use tower::ServiceExt;

async fn parse_response_body(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap_or(Value::Null)
}

/// Register a standard user and return its auth cookie pair.
async fn register_user(config: &Config, pool: &PgPool, user: &TestUser) -> String {
    let app = common::create_test_app(config.clone(), pool.clone());
    let response = app
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/v1/auth/register")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    serde_json::to_string(&json!({
                        "name": user.name,
                        "email": user.email,
                        "password": user.password
                    }))
                    .unwrap(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|c| c.starts_with("auth_token="))
        .map(|c| c.split(';').next().unwrap().to_string())
        .expect("registration should set the auth cookie")
}

async fn seed_reward(pool: &PgPool, name: &str, cost_points: i32, stock: i32) -> uuid::Uuid {
    sqlx::query_scalar(
        "INSERT INTO rewards (name, cost_points, stock) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(name)
    .bind(cost_points)
    .bind(stock)
    .fetch_one(pool)
    .await
    .expect("Failed to seed reward")
}

#[tokio::test]
#[ignore = "requires a PostgreSQL test database"]
async fn test_reward_catalog_is_public_and_cheapest_first() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    cleanup_test_data(&pool).await;

    seed_reward(&pool, "Tote bag", 200, 5).await;
    seed_reward(&pool, "Sticker", 50, 100).await;

    let app = common::create_test_app(test_config(), pool.clone());
    let response = app
        .oneshot(
            Request::builder()
                .method(Method::GET)
                .uri("/api/v1/rewards")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = parse_response_body(response).await;
    let rewards = body.as_array().unwrap();
    assert_eq!(rewards.len(), 2);
    assert_eq!(rewards[0]["name"], "Sticker");
    assert_eq!(rewards[1]["name"], "Tote bag");

    cleanup_test_data(&pool).await;
}

#[tokio::test]
#[ignore = "requires a PostgreSQL test database"]
async fn test_redeem_deducts_points_and_stock() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    cleanup_test_data(&pool).await;

    let config = test_config();
    let user = TestUser::new();
    let cookie = register_user(&config, &pool, &user).await;
    common::set_user_points(&pool, &user.email, 300).await;

    let reward_id = seed_reward(&pool, "Reusable bottle", 100, 2).await;

    let app = common::create_test_app(config, pool.clone());
    let response = app
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri(format!("/api/v1/rewards/{}/redeem", reward_id))
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = parse_response_body(response).await;
    assert_eq!(body["pointsSpent"], 100);

    let balance: i32 = sqlx::query_scalar("SELECT points_balance FROM users WHERE email = $1")
        .bind(&user.email)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(balance, 200);

    let stock: i32 = sqlx::query_scalar("SELECT stock FROM rewards WHERE id = $1")
        .bind(reward_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(stock, 1);

    cleanup_test_data(&pool).await;
}

#[tokio::test]
#[ignore = "requires a PostgreSQL test database"]
async fn test_redeem_with_insufficient_points_conflicts() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    cleanup_test_data(&pool).await;

    let config = test_config();
    let user = TestUser::new();
    let cookie = register_user(&config, &pool, &user).await;

    let reward_id = seed_reward(&pool, "Expensive thing", 1000, 3).await;

    let app = common::create_test_app(config, pool.clone());
    let response = app
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri(format!("/api/v1/rewards/{}/redeem", reward_id))
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    cleanup_test_data(&pool).await;
}

#[tokio::test]
#[ignore = "requires a PostgreSQL test database"]
async fn test_redeem_out_of_stock_conflicts() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    cleanup_test_data(&pool).await;

    let config = test_config();
    let user = TestUser::new();
    let cookie = register_user(&config, &pool, &user).await;
    common::set_user_points(&pool, &user.email, 500).await;

    let reward_id = seed_reward(&pool, "Sold out", 100, 0).await;

    let app = common::create_test_app(config, pool.clone());
    let response = app
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri(format!("/api/v1/rewards/{}/redeem", reward_id))
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    cleanup_test_data(&pool).await;
}

#[tokio::test]
#[ignore = "requires a PostgreSQL test database"]
async fn test_redemption_history_lists_newest_first() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    cleanup_test_data(&pool).await;

    let config = test_config();
    let user = TestUser::new();
    let cookie = register_user(&config, &pool, &user).await;
    common::set_user_points(&pool, &user.email, 500).await;

    let reward_id = seed_reward(&pool, "Sticker", 50, 10).await;

    for _ in 0..2 {
        let app = common::create_test_app(config.clone(), pool.clone());
        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri(format!("/api/v1/rewards/{}/redeem", reward_id))
                    .header(header::COOKIE, &cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let app = common::create_test_app(config, pool.clone());
    let response = app
        .oneshot(
            Request::builder()
                .method(Method::GET)
                .uri("/api/v1/rewards/redemptions/mine")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = parse_response_body(response).await;
    assert_eq!(body.as_array().unwrap().len(), 2);

    cleanup_test_data(&pool).await;
}
