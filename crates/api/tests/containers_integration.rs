//! Integration tests for container management and the nearby search.
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

/// Register an elevated user and return its session cookie pair.
async fn session_cookie_for(config: &Config, pool: &PgPool, role: &str) -> String {
    let user = TestUser::new();

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

    common::set_user_role(pool, &user.email, role).await;

    let app = common::create_test_app(config.clone(), pool.clone());
    let response = app
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/v1/auth/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    serde_json::to_string(&json!({
                        "email": user.email,
                        "password": user.password
                    }))
                    .unwrap(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|c| c.starts_with("session_token="))
        .map(|c| c.split(';').next().unwrap().to_string())
        .expect("elevated login should set a session cookie")
}

async fn seed_container(pool: &PgPool, name: &str, lat: f64, lon: f64) {
    sqlx::query(
        "INSERT INTO containers (name, address, latitude, longitude, accepted_materials)
         VALUES ($1, 'Test address', $2, $3, 'plastic, glass')",
    )
    .bind(name)
    .bind(lat)
    .bind(lon)
    .execute(pool)
    .await
    .expect("Failed to seed container");
}

#[tokio::test]
#[ignore = "requires a PostgreSQL test database"]
async fn test_container_list_is_public() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    cleanup_test_data(&pool).await;

    seed_container(&pool, "Plaza Norte", -33.45, -70.66).await;

    let app = common::create_test_app(test_config(), pool.clone());
    let response = app
        .oneshot(
            Request::builder()
                .method(Method::GET)
                .uri("/api/v1/containers")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = parse_response_body(response).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["name"], "Plaza Norte");

    cleanup_test_data(&pool).await;
}

#[tokio::test]
#[ignore = "requires a PostgreSQL test database"]
async fn test_nearby_orders_by_distance_and_filters_radius() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    cleanup_test_data(&pool).await;

    // Roughly 0m, 1.1km and 111km from the query point.
    seed_container(&pool, "Here", -33.4500, -70.6600).await;
    seed_container(&pool, "Near", -33.4600, -70.6600).await;
    seed_container(&pool, "Far", -34.4500, -70.6600).await;

    let app = common::create_test_app(test_config(), pool.clone());
    let response = app
        .oneshot(
            Request::builder()
                .method(Method::GET)
                .uri("/api/v1/containers/nearby?lat=-33.45&lon=-70.66&radiusM=5000")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = parse_response_body(response).await;
    let results = body.as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["name"], "Here");
    assert_eq!(results[1]["name"], "Near");
    assert!(results[0]["distanceM"].as_f64().unwrap() < results[1]["distanceM"].as_f64().unwrap());

    cleanup_test_data(&pool).await;
}

#[tokio::test]
#[ignore = "requires a PostgreSQL test database"]
async fn test_nearby_rejects_bad_coordinates() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    cleanup_test_data(&pool).await;

    let app = common::create_test_app(test_config(), pool.clone());
    let response = app
        .oneshot(
            Request::builder()
                .method(Method::GET)
                .uri("/api/v1/containers/nearby?lat=91.0&lon=-70.66")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    cleanup_test_data(&pool).await;
}

#[tokio::test]
#[ignore = "requires a PostgreSQL test database"]
async fn test_container_create_requires_elevated_role() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    cleanup_test_data(&pool).await;

    let config = test_config();
    let payload = json!({
        "name": "Nuevo punto limpio",
        "address": "Calle Falsa 123",
        "latitude": -33.44,
        "longitude": -70.65,
        "acceptedMaterials": "plastic"
    });

    // Anonymous create is refused
    let app = common::create_test_app(config.clone(), pool.clone());
    let response = app
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/v1/containers")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_string(&payload).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // An operator session succeeds
    let cookie = session_cookie_for(&config, &pool, "operator").await;
    let app = common::create_test_app(config, pool.clone());
    let response = app
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/v1/containers")
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::COOKIE, cookie)
                .body(Body::from(serde_json::to_string(&payload).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    cleanup_test_data(&pool).await;
}

#[tokio::test]
#[ignore = "requires a PostgreSQL test database"]
async fn test_container_delete_is_admin_only() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    cleanup_test_data(&pool).await;

    let config = test_config();
    seed_container(&pool, "Doomed", -33.45, -70.66).await;

    let container_id: uuid::Uuid =
        sqlx::query_scalar("SELECT id FROM containers WHERE name = 'Doomed'")
            .fetch_one(&pool)
            .await
            .unwrap();

    // An operator may not delete
    let operator_cookie = session_cookie_for(&config, &pool, "operator").await;
    let app = common::create_test_app(config.clone(), pool.clone());
    let response = app
        .oneshot(
            Request::builder()
                .method(Method::DELETE)
                .uri(format!("/api/v1/containers/{}", container_id))
                .header(header::COOKIE, operator_cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // An administrator may
    let admin_cookie = session_cookie_for(&config, &pool, "administrator").await;
    let app = common::create_test_app(config, pool.clone());
    let response = app
        .oneshot(
            Request::builder()
                .method(Method::DELETE)
                .uri(format!("/api/v1/containers/{}", container_id))
                .header(header::COOKIE, admin_cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    cleanup_test_data(&pool).await;
}
